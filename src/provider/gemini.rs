//! Gemini content provider
//!
//! Calls the Generative Language `generateContent` endpoint with Google
//! Search grounding and a JSON response schema, and returns the parsed
//! payload together with the grounding pages.
//!
//! Error mapping:
//! - no API key: `CredentialMissing`, without touching the network
//! - HTTP 429: `QuotaExceeded`
//! - any other failure: `Dispatch`

use crate::config::defaults::DEFAULT_TIMEOUT_SECS;
use crate::config::Config;
use crate::constants::api::{GEMINI_BASE_URL, GEMINI_MODEL};
use crate::constants::region::REGION_NAMES;
use crate::error::{Error, Result};
use crate::provider::{
    parse_payload, CandidateSource, ContentProvider, ContentRequest, LocationType, ProviderResponse,
};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("latvia-explorer/", env!("CARGO_PKG_VERSION"));

/// Environment variables checked for an API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

const SYSTEM_INSTRUCTION: &str = "Role: Expert cartographer and local guide for Latvia.
Task: Identify the nearest SPECIFIC tourism object and provide its EXACT real-world coordinates and OFFICIAL WEBSITE.

COORDINATES:
1. The input coordinates are random and approximate. They are only a search center.
2. Identify a specific named place (e.g. \"Skrundas muiža\", \"Ventas rumba\", \"Zvārtes iezis\").
3. Use Google Search to find the exact GPS coordinates of that named place.
4. 'exactCoordinates' must be the coordinates of the place found, NOT the input coordinates.

OFFICIAL WEBSITE:
- Only fill 'website' with the official link shown for the place on Google Maps.
- Do not use generic info pages (latvia.travel, tripadvisor, facebook) unless that is the only official presence.
- Do not guess. Without a Maps 'Website' link, leave 'website' null.

CONTENT (Latvian):
- Title: official name in Latvian.
- Description: one engaging sentence in Latvian.
- Facts: 3-5 interesting facts, each with the 'sourceUrl' where it can be verified.
";

/// Gemini-backed content provider
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a provider against the public endpoint
    ///
    /// An empty key is treated as missing.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, GEMINI_BASE_URL, GEMINI_MODEL, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a provider with explicit endpoint, model and timeout
    pub fn with_options(
        api_key: Option<String>,
        base_url: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Create a provider from configuration
    ///
    /// `GEMINI_API_KEY` (or `API_KEY`) in the environment overrides the
    /// configured key.
    pub fn from_config(config: &Config) -> Result<Self> {
        let env_key = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .filter(|k| !k.trim().is_empty());
        let api_key = env_key.or_else(|| Some(config.api_keys.gemini.clone()));

        Self::with_options(
            api_key,
            &config.provider.base_url,
            &config.provider.model,
            config.provider.timeout_secs,
        )
    }

    /// Whether an API key is available
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Request body for `generateContent`
    fn request_body(&self, request: &ContentRequest) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": build_prompt(request) }] }],
            "tools": [{ "googleSearch": {} }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
                "thinkingConfig": { "thinkingBudget": 0 }
            }
        })
    }
}

impl ContentProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn fetch(&self, request: &ContentRequest) -> Result<ProviderResponse> {
        let api_key = self.api_key.as_deref().ok_or(Error::CredentialMissing)?;

        debug!(
            lat = request.seed.lat,
            lng = request.seed.lng,
            target = request.target_name.as_deref().unwrap_or("-"),
            "Requesting location details"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| Error::Dispatch(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = api_error_message(&body).unwrap_or_else(|| status.to_string());
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                Error::QuotaExceeded(detail)
            } else {
                Error::Dispatch(format!("Gemini API error: {}", detail))
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Dispatch(format!("Failed to parse Gemini response: {}", e)))?;

        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::Dispatch("Gemini returned no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        let payload = parse_payload(&text)?;

        let sources = candidate
            .grounding_metadata
            .map(|m| {
                m.grounding_chunks
                    .into_iter()
                    .map(GroundingChunk::into_candidate)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ProviderResponse { payload, sources })
    }
}

/// User prompt for one request
pub fn build_prompt(request: &ContentRequest) -> String {
    let mut prompt = format!(
        "Input coordinates (approximate search center): {}, {}.\n",
        request.seed.lat, request.seed.lng
    );

    match &request.target_name {
        Some(name) => prompt.push_str(&format!(
            "Target object: \"{}\" (find its EXACT real-world location).\n",
            name
        )),
        None => prompt.push_str("Find the closest specific tourism object.\n"),
    }

    let regions = request.region_filters();
    if let Some(first) = regions.first() {
        prompt.push_str(&format!(
            "MANDATORY REGION: the object must be strictly within {}. If the input coordinates are not in this region, find the nearest appropriate object INSIDE {}.\n",
            regions.join(" or "),
            first
        ));
    }

    let categories = request.category_filters();
    if !categories.is_empty() {
        prompt.push_str(&format!("Prefer category: {}.\n", categories.join(", ")));
    }

    prompt.push_str(
        "Output JSON. Ensure 'exactCoordinates' matches the real-world location on Google Maps. \
         Only set 'isOfficialGoogleMapsWebsite' to true if you are certain the website is the official one.",
    );
    prompt
}

/// JSON schema the model must answer with
pub fn response_schema() -> Value {
    let coordinates = json!({
        "type": "OBJECT",
        "properties": { "lat": { "type": "NUMBER" }, "lng": { "type": "NUMBER" } },
        "required": ["lat", "lng"]
    });
    let types: Vec<String> = LocationType::ALL.iter().map(|t| t.to_string()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "facts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": { "type": "STRING" },
                        "sourceUrl": { "type": "STRING", "description": "The specific URL where this fact was found." }
                    },
                    "required": ["text"]
                }
            },
            "exactCoordinates": coordinates,
            "nearbyPlaces": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "type": { "type": "STRING" },
                        "distance": { "type": "STRING" },
                        "coordinates": coordinates
                    },
                    "required": ["name", "type", "distance", "coordinates"]
                }
            },
            "type": { "type": "STRING", "enum": types },
            "region": { "type": "STRING", "enum": REGION_NAMES },
            "website": {
                "type": "STRING",
                "description": "Official website URL of the location. DO NOT guess."
            },
            "isOfficialGoogleMapsWebsite": {
                "type": "BOOLEAN",
                "description": "TRUE only if this URL is the 'Website' link on the Google Maps entry for this place."
            }
        },
        "required": ["title", "description", "facts", "nearbyPlaces", "type", "exactCoordinates", "region"]
    })
}

/// Pull `error.message` out of an API error body
fn api_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<GroundingRef>,
    #[serde(default)]
    maps: Option<GroundingRef>,
}

#[derive(Debug, Deserialize)]
struct GroundingRef {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl GroundingChunk {
    fn into_candidate(self) -> CandidateSource {
        let (web_uri, web_title) = self.web.map(|r| (r.uri, r.title)).unwrap_or_default();
        let (maps_uri, maps_title) = self.maps.map(|r| (r.uri, r.title)).unwrap_or_default();

        CandidateSource {
            uri: web_uri.or(maps_uri),
            title: web_title.or(maps_title),
        }
    }
}
