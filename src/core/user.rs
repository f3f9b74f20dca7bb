//! User business logic - Account owners.

use crate::{
    entities::{Account, User, account, user},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Creates a new user after trimming and validating the inputs.
pub async fn create_user<C>(
    db: &C,
    name: &str,
    email: &str,
    created_at: DateTime<Utc>,
) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() {
        return Err(Error::EmptyField { field: "User name" });
    }

    let model = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(created_at),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    info!("Created user {} ({})", created.id, created.name);
    Ok(created)
}

/// Retrieves a user by ID, failing with `NotFound` if absent.
pub async fn get_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "User",
            id: user_id,
        })
}

/// Retrieves all users ordered by ID.
pub async fn list_users<C>(db: &C) -> Result<Vec<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a user who owns no accounts.
///
/// Users with accounts are refused with `UserHasAccounts`; their accounts
/// must be deleted explicitly first.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let user = get_user(db, user_id).await?;

    let accounts = Account::find()
        .filter(account::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    if accounts > 0 {
        return Err(Error::UserHasAccounts {
            id: user_id,
            accounts,
        });
    }

    user.delete(db).await?;
    info!("Deleted user {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::account::{create_account, delete_account};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_user_trims_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_user(&db, "  Mei  ", " mei@example.com ", test_now()).await?;
        assert_eq!(user.name, "Mei");
        assert_eq!(user.email, "mei@example.com");
        assert_eq!(get_user(&db, user.id).await?, user);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_rejects_empty_name() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_user(&db, "   ", "x@example.com", test_now()).await;
        assert!(matches!(result, Err(Error::EmptyField { .. })));
        assert!(list_users(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_users() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "A").await?;
        create_test_user(&db, "B").await?;
        let names: Vec<String> = list_users(&db).await?.into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_with_accounts_is_refused() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let account = create_account(&db, &sample_new_account(user.id), test_now()).await?;

        let result = delete_user(&db, user.id).await;
        assert!(matches!(
            result,
            Err(Error::UserHasAccounts { accounts: 1, .. })
        ));
        assert!(get_user(&db, user.id).await.is_ok());

        delete_account(&db, account.id).await?;
        delete_user(&db, user.id).await?;
        assert!(matches!(
            get_user(&db, user.id).await,
            Err(Error::NotFound { entity: "User", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_user() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(matches!(
            delete_user(&db, 5).await,
            Err(Error::NotFound { id: 5, .. })
        ));
        Ok(())
    }
}
