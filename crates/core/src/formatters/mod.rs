pub mod json;
pub mod logseq;
pub mod markdown;

pub use json::{JsonConfig, JsonFormatter, annotations_to_json, notes_to_json};
pub use logseq::{LogseqConfig, LogseqFormatter, format_date, render_annotation, render_article, render_articles};
pub use markdown::{
    BulletMarker, HeadingStyle, MarkdownConfig, MarkdownFormatter, annotations_to_notes, html_to_markdown, notes_to_markdown,
};
