use serde::Serialize;

use crate::Result;
use crate::bookmark::ArticleNote;
use crate::extract::ExtractedAnnotation;

/// Configuration for JSON output
#[derive(Debug, Clone)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

/// Serialize exported articles with their annotations
pub fn notes_to_json(notes: &[ArticleNote], config: &JsonConfig) -> Result<String> {
    to_json(notes, config.pretty)
}

/// Serialize raw extraction results as `[{ "id", "color", "text" }]`
pub fn annotations_to_json(annotations: &[ExtractedAnnotation], config: &JsonConfig) -> Result<String> {
    to_json(annotations, config.pretty)
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn notes(&self, notes: &[ArticleNote]) -> Result<String> {
        notes_to_json(notes, &self.config)
    }

    pub fn annotations(&self, annotations: &[ExtractedAnnotation]) -> Result<String> {
        annotations_to_json(annotations, &self.config)
    }
}
