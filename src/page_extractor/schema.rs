use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Column order of every record file
pub const RECORD_COLUMNS: [&str; 8] = [
    "identifier",
    "title",
    "licenseCode",
    "hostName",
    "hostProfileRef",
    "hostRating",
    "hostListingCount",
    "hostJoinedDate",
];

/// Canonical, query-stripped item URL. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Wrap a canonical URL; `None` if it is blank
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == value.len() {
            Some(Self(value))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "identifier must not be empty".to_string())
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One harvested item. Missing fields are empty strings, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub identifier: Identifier,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub license_code: String,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub host_profile_ref: String,
    /// Decimal text as found on the page, not parsed
    #[serde(default)]
    pub host_rating: String,
    #[serde(default)]
    pub host_listing_count: String,
    #[serde(default)]
    pub host_joined_date: String,
}

impl ItemRecord {
    /// Record with every field but the identifier empty
    #[must_use]
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            title: String::new(),
            license_code: String::new(),
            host_name: String::new(),
            host_profile_ref: String::new(),
            host_rating: String::new(),
            host_listing_count: String::new(),
            host_joined_date: String::new(),
        }
    }

    pub fn apply_profile(&mut self, profile: HostProfile) {
        self.host_rating = profile.rating;
        self.host_listing_count = profile.listing_count;
        self.host_joined_date = profile.joined_date;
    }
}

/// Link to the host found on a detail page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostLink {
    pub name: String,
    pub profile_ref: String,
}

/// Fields scraped from a host profile page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostProfile {
    pub rating: String,
    pub listing_count: String,
    pub joined_date: String,
}

/// A field that could not be extracted.
///
/// Never propagated as a failure: [`settle`] logs it and turns it into an
/// empty field when the record is assembled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionMiss {
    #[error("{field}: no element matched {locator}")]
    ElementNotFound { field: &'static str, locator: String },

    #[error("{field}: element had no readable text")]
    EmptyText { field: &'static str },

    #[error("{field}: no pattern matched")]
    NoPatternMatch { field: &'static str },
}

impl ExtractionMiss {
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::ElementNotFound { field, .. }
            | Self::EmptyText { field }
            | Self::NoPatternMatch { field } => field,
        }
    }
}

/// Outcome of one field extraction
pub type FieldResult<T = String> = Result<T, ExtractionMiss>;

/// Record-assembly boundary: keep the value or log the miss and go empty.
pub fn settle<T: Default>(result: FieldResult<T>, identifier: &str) -> T {
    result.unwrap_or_else(|miss| {
        debug!(%identifier, "{miss}");
        T::default()
    })
}
