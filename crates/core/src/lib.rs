pub mod bookmark;
pub mod config;
pub mod element;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod tokenizer;

pub use bookmark::{ArticleNote, Bookmark, NoteAnnotation, RemoteAnnotation};
pub use config::{AnnotationSource, ExportConfig, ExportConfigBuilder, readeck_url, slash_join};
#[doc(hidden)]
pub use element::{Attribute, Element};
pub use error::{ExportError, Result};
#[cfg(feature = "fetch")]
pub use export::Exporter;
pub use export::{logseq_config, notes_from_html};
pub use extract::{AnnotationExtractor, ExtractIssue, ExtractedAnnotation, Extraction};
pub use extract::{ExtractorConfig, ExtractorConfigBuilder, extract_annotations, extract_annotations_with_config};
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::ReadeckClient;
pub use fetch::{fetch_file, fetch_stdin};
pub use formatters::{JsonConfig, JsonFormatter, LogseqConfig, LogseqFormatter, MarkdownConfig, MarkdownFormatter};
pub use formatters::{annotations_to_json, annotations_to_notes, format_date, html_to_markdown, notes_to_json, notes_to_markdown};
pub use formatters::{render_annotation, render_article, render_articles};
