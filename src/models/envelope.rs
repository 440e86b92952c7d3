//! Envelope of v2 stream payloads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::tweet::Tweet;

/// A v2 stream payload: the record plus the objects its expansions pulled in.
///
/// ```
/// use tweetstream_rs::models::StreamRecord;
///
/// let json = r#"{"data": {"id": "1", "text": "hi"}, "includes": {"users": []}}"#;
/// let record: StreamRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.data.text, "hi");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + Default"))]
pub struct StreamRecord<T = Tweet> {
    /// The record itself
    #[serde(default)]
    pub data: T,
    /// Expanded objects (`users`, `media`, `places`, `polls`, `tweets`)
    #[serde(default)]
    pub includes: Option<serde_json::Value>,
    /// Rules of a filtered stream that matched this record
    #[serde(default)]
    pub matching_rules: Vec<MatchingRule>,
    /// Partial errors reported alongside the record
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

/// A filter rule that matched a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingRule {
    /// Rule ID
    pub id: String,
    /// Rule tag, if one was set
    pub tag: Option<String>,
}

impl<T> StreamRecord<T> {
    /// Returns `true` if the provider attached partial errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
