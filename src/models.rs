//! Record types: the stored rows, the sanitized pre-insert form, and the
//! serialized shape shared by HTTP bodies and the JSON export.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Root row from the `pokemon` table, without its children.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct PokemonRow {
    pub id: i64,
    pub name: String,
    pub pokedex_number: i64,
    #[serde(default)]
    pub height: i64,
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub base_experience: i64,
    #[serde(default)]
    pub sprite_url: String,
}

/// One type tag owned by a record. `slot` is a display ordinal, not a key.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct TypeTag {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub slot: i64,
}

/// One ability owned by a record, with the upstream "hidden" flag.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct AbilityTag {
    #[serde(rename = "ability")]
    pub ability_name: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: i64,
}

/// One base stat owned by a record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct StatEntry {
    #[serde(rename = "stat")]
    pub stat_name: String,
    pub base_stat: i64,
    #[serde(default)]
    pub effort: i64,
}

/// A full record with its three child collections attached. This is the
/// shape returned by the store, serialized in API responses, and written by
/// the JSON export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PokemonRecord {
    pub id: i64,
    pub name: String,
    pub pokedex_number: i64,
    pub height: i64,
    pub weight: i64,
    pub base_experience: i64,
    pub sprite_url: String,
    pub types: Vec<TypeTag>,
    pub abilities: Vec<AbilityTag>,
    pub stats: Vec<StatEntry>,
}

impl PokemonRecord {
    pub fn from_parts(
        row: PokemonRow,
        types: Vec<TypeTag>,
        abilities: Vec<AbilityTag>,
        stats: Vec<StatEntry>,
    ) -> Self {
        Self {
            id: row.id,
            name: row.name,
            pokedex_number: row.pokedex_number,
            height: row.height,
            weight: row.weight,
            base_experience: row.base_experience,
            sprite_url: row.sprite_url,
            types,
            abilities,
            stats,
        }
    }
}

/// Sanitizer output: a record as extracted from the API, before it has a
/// row id. Children reuse the stored tag types, which carry no ids.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPokemon {
    pub name: String,
    pub pokedex_number: i64,
    pub height: i64,
    pub weight: i64,
    pub base_experience: i64,
    pub sprite_url: String,
    pub types: Vec<TypeTag>,
    pub abilities: Vec<AbilityTag>,
    pub stats: Vec<StatEntry>,
}

/// Top-level shape of the JSON export file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportFile {
    pub count: usize,
    pub pokemon: Vec<PokemonRecord>,
}

/// Per-type record count, ordered by count descending in statistics output.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct TypeCount {
    pub type_name: String,
    pub count: i64,
}

/// Aggregates over the whole store, shown by the menu's statistics view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DbStatistics {
    pub total: i64,
    pub type_counts: Vec<TypeCount>,
    pub avg_height: f64,
    pub avg_weight: f64,
    pub avg_base_experience: f64,
}
