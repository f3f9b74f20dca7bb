//! Autocomplete handlers for Discord slash command parameters.

use crate::{bot::BotData, errors::Error};

const PAYOUT_CYCLES: [&str; 3] = ["monthly", "quarterly", "annually"];

/// Provides autocomplete suggestions for payout cycles.
///
/// Only `monthly` accrues interest; the other cycles are offered because
/// accounts may still be stored with them.
pub async fn autocomplete_payout_cycle(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_cycles(partial)
}

fn matching_cycles(partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();

    PAYOUT_CYCLES
        .iter()
        .filter(|cycle| cycle.starts_with(&partial_lower))
        .map(|&cycle| cycle.to_string())
        .collect()
}
