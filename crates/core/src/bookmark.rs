//! Readeck bookmark and annotation records.
//!
//! These mirror the JSON returned by `/api/bookmarks/{id}` and
//! `/api/bookmarks/{id}/annotations`. Only the fields the note formatter
//! needs are kept; unknown fields are ignored and `null` lists read as empty.

use serde::{Deserialize, Deserializer, Serialize};

/// Bookmark metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    /// ISO 8601 publication timestamp
    #[serde(default)]
    pub published: Option<String>,
}

/// An annotation as returned by the annotations endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAnnotation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// An annotation ready to be written into a note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteAnnotation {
    /// Markdown (or plain) text of the highlight
    pub text: String,
    pub color: Option<String>,
}

impl From<RemoteAnnotation> for NoteAnnotation {
    fn from(remote: RemoteAnnotation) -> Self {
        Self { text: remote.text, color: remote.color.filter(|c| !c.is_empty()) }
    }
}

/// A bookmark together with its rendered annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleNote {
    pub bookmark: Bookmark,
    pub annotations: Vec<NoteAnnotation>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
