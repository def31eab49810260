//! Outbound PokeAPI client.
//!
//! One GET per lookup, fixed timeout, no retries. A 404 and any other
//! transport or HTTP failure both collapse to `None` for the caller; the
//! distinction survives only in the log line.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CLIENT_USER_AGENT: &str = "Pokemon-Scout-App/1.0";

/// Seam between the pipeline and the upstream API. Front-end orchestration
/// is written against this trait so tests can substitute a canned source.
#[async_trait]
pub trait PokemonSource: Send + Sync {
    /// Fetch the raw record for `name` (lower-cased and trimmed before the
    /// request). `None` covers both "no such pokemon" and request failure.
    async fn get_pokemon(&self, name: &str) -> Option<Value>;

    /// Fetch the species record for a catalog id, same error collapsing.
    async fn get_species(&self, id: i64) -> Option<Value>;
}

/// Production client for the public PokeAPI.
pub struct PokeApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(CLIENT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn get_json(&self, url: &str, what: &str) -> Option<Value> {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!("error fetching {}: {}", what, e);
                return None;
            }
        };

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::info!("{} not found upstream", what);
            return None;
        }

        let resp = match resp.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!("http error fetching {}: {}", what, e);
                return None;
            }
        };

        match resp.json::<Value>().await {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::error!("failed to decode {}: {}", what, e);
                None
            }
        }
    }
}

#[async_trait]
impl PokemonSource for PokeApiClient {
    async fn get_pokemon(&self, name: &str) -> Option<Value> {
        let name = name.trim().to_lowercase();
        let url = format!("{}/pokemon/{}", self.base_url, name);
        self.get_json(&url, &format!("pokemon '{}'", name)).await
    }

    async fn get_species(&self, id: i64) -> Option<Value> {
        let url = format!("{}/pokemon-species/{}", self.base_url, id);
        self.get_json(&url, &format!("species {}", id)).await
    }
}

/// Pull the English flavor text out of a species payload, cleaned of the
/// newline and form-feed characters the API embeds.
pub fn english_flavor_text(species: Option<&Value>) -> String {
    if let Some(entries) = species
        .and_then(|s| s.get("flavor_text_entries"))
        .and_then(|e| e.as_array())
    {
        for ent in entries {
            if ent
                .get("language")
                .and_then(|l| l.get("name"))
                .and_then(|n| n.as_str())
                == Some("en")
            {
                if let Some(ft) = ent.get("flavor_text").and_then(|f| f.as_str()) {
                    return ft.replace('\n', " ").replace('\u{c}', " ");
                }
            }
        }
    }
    "No description available.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flavor_text_prefers_english_and_cleans_it() {
        let species = json!({
            "flavor_text_entries": [
                {"flavor_text": "Quand il dort...", "language": {"name": "fr"}},
                {"flavor_text": "When it\nsleeps,\u{c}it dreams.", "language": {"name": "en"}}
            ]
        });
        assert_eq!(
            english_flavor_text(Some(&species)),
            "When it sleeps, it dreams."
        );
    }

    #[test]
    fn flavor_text_falls_back_when_missing() {
        assert_eq!(english_flavor_text(None), "No description available.");
        let species = json!({"flavor_text_entries": []});
        assert_eq!(
            english_flavor_text(Some(&species)),
            "No description available."
        );
    }
}
