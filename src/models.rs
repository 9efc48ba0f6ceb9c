use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned record identifier. The API hands out integers today, but
/// nothing here relies on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as a single URL path segment, or `None` when it could not be
    /// one (empty, a dot segment, or containing a slash).
    pub fn as_segment(&self) -> Option<&str> {
        match self.0.as_str() {
            "" | "." | ".." => None,
            id if id.contains('/') => None,
            id => Some(id),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(value) => RecordId(value.to_string()),
            Raw::Str(value) => RecordId(value),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default, alias = "time")]
    pub record_time: Option<String>,
    #[serde(default)]
    pub contributor: Option<Contributor>,
    #[serde(default)]
    pub contributor_name: Option<String>,
    pub points: i64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Record {
    /// Display name of the credited contributor, whichever shape the API used.
    pub fn contributor_display(&self) -> &str {
        self.contributor
            .as_ref()
            .map(|contributor| contributor.name.as_str())
            .or(self.contributor_name.as_deref())
            .unwrap_or("")
    }

    pub fn stored_image(&self) -> Option<&str> {
        self.image.as_deref().filter(|path| !path.trim().is_empty())
    }
}

/// Collection envelope. Older list endpoints returned a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Paged { results } => results,
            Listing::Bare(items) => items,
        }
    }
}
