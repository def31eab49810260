//! The one orchestration every front-end shares:
//! check exists -> fetch -> sanitize -> persist.
//!
//! The HTTP handler, the CLI batch runner, and the menu all call
//! [`fetch_and_store`] (or [`fetch_many`] around it) and only differ in how
//! they gather input and render the outcome.

use crate::error::ScoutError;
use crate::fetch::PokemonSource;
use crate::models::PokemonRecord;
use crate::sanitize::sanitize_pokemon;
use crate::store::Store;
use crate::utils::capitalize;

/// Names fetched by `--default` and the menu's default-list action.
pub const DEFAULT_POKEMON: [&str; 6] = [
    "pikachu",
    "dhelmise",
    "charizard",
    "parasect",
    "aerodactyl",
    "kingler",
];

/// Terminal states of one fetch-one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The record was already stored; no outbound request was made.
    AlreadyStored(PokemonRecord),
    /// Fetched, sanitized, and committed.
    Stored(PokemonRecord),
    /// Upstream has no such record, or the request failed (see logs).
    NotFound,
}

/// Fetch one pokemon by name and store it if it is not already present.
///
/// The existence check short-circuits the whole pipeline: a stored name is
/// returned as-is without touching the network. A sanitize failure or a
/// persistence failure surfaces as `Err`; persistence is attempted at most
/// once and rolls back in full on failure.
pub async fn fetch_and_store(
    store: &Store,
    source: &dyn PokemonSource,
    name: &str,
) -> Result<FetchOutcome, ScoutError> {
    let display_name = capitalize(name.trim());

    if let Some(existing) = store.find_by_name(&display_name).await? {
        return Ok(FetchOutcome::AlreadyStored(existing));
    }

    let Some(raw) = source.get_pokemon(name).await else {
        return Ok(FetchOutcome::NotFound);
    };

    let Some(sanitized) = sanitize_pokemon(Some(&raw)) else {
        tracing::error!("could not sanitize payload for '{}'", display_name);
        return Err(ScoutError::MalformedPayload);
    };

    let record = store.insert(&sanitized).await?;
    tracing::info!("stored {} (#{})", record.name, record.pokedex_number);
    Ok(FetchOutcome::Stored(record))
}

/// Per-item result inside a batch, carrying only what the front-ends print.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemStatus {
    Stored,
    AlreadyStored,
    NotFound,
    Failed(String),
}

/// Outcome of a sequential batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Display name and status, in input order.
    pub items: Vec<(String, ItemStatus)>,
    /// Number of records actually committed by this run.
    pub stored: usize,
    pub total: usize,
}

/// Fetch a list of names one after another. Items are isolated: a failure
/// (including a rolled-back insert) is recorded and the loop moves on.
pub async fn fetch_many(store: &Store, source: &dyn PokemonSource, names: &[String]) -> BatchReport {
    let mut items = Vec::with_capacity(names.len());
    let mut stored = 0;

    for name in names {
        let display_name = capitalize(name.trim());
        let status = match fetch_and_store(store, source, name).await {
            Ok(FetchOutcome::Stored(_)) => {
                stored += 1;
                ItemStatus::Stored
            }
            Ok(FetchOutcome::AlreadyStored(_)) => ItemStatus::AlreadyStored,
            Ok(FetchOutcome::NotFound) => ItemStatus::NotFound,
            Err(e) => {
                tracing::error!("error storing {}: {}", display_name, e);
                ItemStatus::Failed(e.to_string())
            }
        };
        items.push((display_name, status));
    }

    BatchReport {
        stored,
        total: names.len(),
        items,
    }
}
