//! Content providers
//!
//! A content provider takes a search seed and answers with an untrusted
//! description of the nearest interesting place. Nothing here is validated
//! beyond structural parsing; reconciliation happens in `explorer`.

pub mod gemini;

use crate::constants::region::REGION_NAMES;
use crate::coord::validate::RawCoordinates;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Category of a described place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    Lake,
    River,
    Sea,
    Forest,
    Nature,
    Field,
    City,
    Village,
    Castle,
    Manor,
    Ruins,
    Museum,
    Church,
    Tower,
    Trail,
    Hill,
    Cafe,
    Other,
}

impl LocationType {
    /// All categories, in schema order
    pub const ALL: [LocationType; 18] = [
        Self::Lake,
        Self::River,
        Self::Sea,
        Self::Forest,
        Self::Nature,
        Self::Field,
        Self::City,
        Self::Village,
        Self::Castle,
        Self::Manor,
        Self::Ruins,
        Self::Museum,
        Self::Church,
        Self::Tower,
        Self::Trail,
        Self::Hill,
        Self::Cafe,
        Self::Other,
    ];

    /// Latvian display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lake => "Ezers",
            Self::River => "Upe",
            Self::Sea => "Jūra",
            Self::Forest => "Mežs",
            Self::Nature => "Daba",
            Self::Field => "Lauks",
            Self::City => "Pilsēta",
            Self::Village => "Ciemats",
            Self::Castle => "Pils",
            Self::Manor => "Muiža",
            Self::Ruins => "Drupas",
            Self::Museum => "Muzejs",
            Self::Church => "Baznīca",
            Self::Tower => "Tornis",
            Self::Trail => "Taka",
            Self::Hill => "Kalns",
            Self::Cafe => "Kafejnīca",
            Self::Other => "Cits",
        }
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Latvian cultural-historical region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Kurzeme,
    Vidzeme,
    Latgale,
    Zemgale,
    #[serde(rename = "Sēlija")]
    Selija,
    #[serde(rename = "Rīga")]
    Riga,
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Kurzeme => "Kurzeme",
            Self::Vidzeme => "Vidzeme",
            Self::Latgale => "Latgale",
            Self::Zemgale => "Zemgale",
            Self::Selija => "Sēlija",
            Self::Riga => "Rīga",
        };
        f.write_str(name)
    }
}

/// A fact about a place, optionally with the page it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// A cited web page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// A web page the provider says it consulted; either field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

/// A nearby place exactly as the provider sent it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNearbyPlace {
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: String,
    /// Computed by the provider against an unknown anchor; never displayed
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub coordinates: Option<RawCoordinates>,
}

/// The structured part of a provider answer
///
/// Required fields missing from the wire make the whole answer unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    pub title: String,
    pub description: String,
    pub facts: Vec<Fact>,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub exact_coordinates: Option<RawCoordinates>,
    pub nearby_places: Vec<RawNearbyPlace>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, rename = "isOfficialGoogleMapsWebsite")]
    pub is_official_website: Option<bool>,
}

/// Everything a provider returns for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub payload: LocationPayload,
    /// Pages used to ground the answer, in provider order
    pub sources: Vec<CandidateSource>,
}

/// One request to a content provider
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRequest {
    /// Approximate search center; the provider is expected to refine it
    pub seed: Coordinates,
    /// A specific place to look up instead of "whatever is nearest"
    pub target_name: Option<String>,
    /// Region and category filters chosen by the user
    pub filters: Vec<String>,
}

impl ContentRequest {
    pub fn new(seed: Coordinates) -> Self {
        Self {
            seed,
            target_name: None,
            filters: Vec::new(),
        }
    }

    /// Filters naming one of the six regions
    pub fn region_filters(&self) -> Vec<&str> {
        self.filters
            .iter()
            .map(String::as_str)
            .filter(|f| is_region_name(f))
            .collect()
    }

    /// Every other filter, treated as a category preference
    pub fn category_filters(&self) -> Vec<&str> {
        self.filters
            .iter()
            .map(String::as_str)
            .filter(|f| !is_region_name(f))
            .collect()
    }
}

/// Whether a filter names one of the regions
pub fn is_region_name(filter: &str) -> bool {
    REGION_NAMES.iter().any(|r| *r == filter)
}

/// Trait for content provider backends
///
/// Implementations must be thread-safe (Send + Sync) to work with async server.
pub trait ContentProvider: Send + Sync {
    /// Returns the provider name (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Describe the place nearest to (or named by) the request
    ///
    /// Fails with `CredentialMissing` before any I/O when unconfigured,
    /// `QuotaExceeded` on rate limiting, and `Dispatch` for everything else.
    fn fetch(
        &self,
        request: &ContentRequest,
    ) -> impl std::future::Future<Output = Result<ProviderResponse>> + Send;
}

/// Strip a surrounding Markdown code fence from model output
pub fn clean_json_text(text: &str) -> &str {
    let cleaned = text.trim();
    let cleaned = cleaned
        .strip_prefix("```json")
        .or_else(|| cleaned.strip_prefix("```"))
        .unwrap_or(cleaned);
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned);
    cleaned.trim()
}

/// Parse model output into a payload
///
/// Malformed JSON and schema violations are both dispatch failures.
pub fn parse_payload(text: &str) -> Result<LocationPayload> {
    serde_json::from_str(clean_json_text(text))
        .map_err(|e| Error::Dispatch(format!("Malformed location payload: {}", e)))
}
