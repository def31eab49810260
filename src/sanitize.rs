//! Defensive extraction of the fields we keep from a raw PokeAPI payload.
//!
//! The transform is total: it never fails on a missing or malformed field.
//! Missing strings become empty, missing numbers become 0, and a payload
//! that is not a JSON object at all yields no record rather than a partial
//! one.

use serde_json::Value;

use crate::models::{AbilityTag, NewPokemon, StatEntry, TypeTag};
use crate::utils::{capitalize, format_name, stat_case};

/// Map a raw API payload onto the normalized record shape.
///
/// Returns `None` only when there is no usable input: the payload is absent
/// or is not an object.
pub fn sanitize_pokemon(raw: Option<&Value>) -> Option<NewPokemon> {
    let obj = raw?.as_object()?;

    Some(NewPokemon {
        name: capitalize(obj.get("name").and_then(|v| v.as_str()).unwrap_or("")),
        pokedex_number: obj.get("id").and_then(|v| v.as_i64()).unwrap_or(0),
        height: obj.get("height").and_then(|v| v.as_i64()).unwrap_or(0),
        weight: obj.get("weight").and_then(|v| v.as_i64()).unwrap_or(0),
        base_experience: obj
            .get("base_experience")
            .and_then(|v| v.as_i64())
            .unwrap_or(0),
        sprite_url: extract_sprite(obj.get("sprites")),
        types: extract_types(obj.get("types")),
        abilities: extract_abilities(obj.get("abilities")),
        stats: extract_stats(obj.get("stats")),
    })
}

/// Pick the best sprite available: official artwork first, the plain front
/// sprite second, empty string last. Strict priority, not a merge.
fn extract_sprite(sprites: Option<&Value>) -> String {
    let Some(sprites) = sprites else {
        return String::new();
    };
    sprites
        .get("other")
        .and_then(|o| o.get("official-artwork"))
        .and_then(|a| a.get("front_default"))
        .and_then(|u| u.as_str())
        .filter(|s| !s.is_empty())
        .or_else(|| sprites.get("front_default").and_then(|u| u.as_str()))
        .unwrap_or("")
        .to_string()
}

fn extract_types(types: Option<&Value>) -> Vec<TypeTag> {
    types
        .and_then(|t| t.as_array())
        .map(|arr| {
            arr.iter()
                .map(|entry| TypeTag {
                    type_name: capitalize(
                        entry
                            .get("type")
                            .and_then(|t| t.get("name"))
                            .and_then(|n| n.as_str())
                            .unwrap_or(""),
                    ),
                    slot: entry.get("slot").and_then(|v| v.as_i64()).unwrap_or(0),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn extract_abilities(abilities: Option<&Value>) -> Vec<AbilityTag> {
    abilities
        .and_then(|a| a.as_array())
        .map(|arr| {
            arr.iter()
                .map(|entry| AbilityTag {
                    // "lightning-rod" becomes "Lightning Rod"
                    ability_name: format_name(
                        entry
                            .get("ability")
                            .and_then(|a| a.get("name"))
                            .and_then(|n| n.as_str())
                            .unwrap_or(""),
                    ),
                    is_hidden: entry
                        .get("is_hidden")
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false),
                    slot: entry.get("slot").and_then(|v| v.as_i64()).unwrap_or(0),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn extract_stats(stats: Option<&Value>) -> Vec<StatEntry> {
    stats
        .and_then(|s| s.as_array())
        .map(|arr| {
            arr.iter()
                .map(|entry| StatEntry {
                    stat_name: stat_case(
                        entry
                            .get("stat")
                            .and_then(|s| s.get("name"))
                            .and_then(|n| n.as_str())
                            .unwrap_or(""),
                    ),
                    base_stat: entry.get("base_stat").and_then(|v| v.as_i64()).unwrap_or(0),
                    effort: entry.get("effort").and_then(|v| v.as_i64()).unwrap_or(0),
                })
                .collect()
        })
        .unwrap_or_default()
}
