//! Bookmark export pipeline.
//!
//! For every bookmark id the [`Exporter`] fetches the bookmark metadata and
//! its annotations, then renders the result as a Logseq outline. Annotations
//! either come from the article HTML, where the highlight markup is
//! reconstructed and converted to Markdown, or from the plain text stored by
//! the annotations endpoint.
//!
//! # Example
//!
//! ```rust,no_run
//! use readeck_export_core::{ExportConfig, Exporter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = Exporter::new(ExportConfig::from_env()?)?;
//! let notes = exporter.export(&["Xb7kQ2".to_string()]).await?;
//! println!("{notes}");
//! # Ok(())
//! # }
//! ```

use tracing::info;

use crate::Result;
use crate::bookmark::NoteAnnotation;
use crate::config::ExportConfig;
use crate::extract::extract_annotations_with_config;
use crate::formatters::{LogseqConfig, annotations_to_notes};

#[cfg(feature = "fetch")]
use crate::bookmark::ArticleNote;
#[cfg(feature = "fetch")]
use crate::config::AnnotationSource;
#[cfg(feature = "fetch")]
use crate::fetch::ReadeckClient;
#[cfg(feature = "fetch")]
use crate::formatters::render_articles;

/// Extracts the annotations of an article page and renders them as notes.
pub fn notes_from_html(html: &str, config: &ExportConfig) -> Result<Vec<NoteAnnotation>> {
    let extraction = extract_annotations_with_config(html, &config.extractor);
    if !extraction.issues.is_empty() {
        info!(issues = extraction.issues.len(), "article markup had recoverable issues");
    }
    annotations_to_notes(&extraction.annotations, &config.markdown)
}

/// Logseq settings matching an export configuration.
pub fn logseq_config(config: &ExportConfig) -> LogseqConfig {
    LogseqConfig { base_url: config.base_url.clone(), ..Default::default() }
}

/// Fetches bookmarks from Readeck and turns them into notes.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct Exporter {
    client: ReadeckClient,
    config: ExportConfig,
}

#[cfg(feature = "fetch")]
impl Exporter {
    pub fn new(config: ExportConfig) -> Result<Self> {
        let client = ReadeckClient::new(&config)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Annotations of one bookmark, from the configured source.
    pub async fn annotations(&self, id: &str) -> Result<Vec<NoteAnnotation>> {
        match self.config.source {
            AnnotationSource::Article => {
                let html = self.client.article_html(id).await?;
                notes_from_html(&html, &self.config)
            }
            AnnotationSource::Api => {
                let remote = self.client.annotations(id).await?;
                Ok(remote.into_iter().map(NoteAnnotation::from).collect())
            }
        }
    }

    /// Bookmark metadata plus annotations.
    pub async fn article(&self, id: &str) -> Result<ArticleNote> {
        let bookmark = self.client.bookmark(id).await?;
        let annotations = self.annotations(id).await?;
        info!(id, title = %bookmark.title, annotations = annotations.len(), "exported bookmark");
        Ok(ArticleNote { bookmark, annotations })
    }

    /// Exports bookmarks one after another, keeping the order of `ids`.
    pub async fn articles(&self, ids: &[String]) -> Result<Vec<ArticleNote>> {
        let mut notes = Vec::with_capacity(ids.len());
        for id in ids {
            notes.push(self.article(id).await?);
        }
        Ok(notes)
    }

    /// Exports bookmarks as a Logseq document.
    pub async fn export(&self, ids: &[String]) -> Result<String> {
        let notes = self.articles(ids).await?;
        render_articles(&notes, &logseq_config(&self.config))
    }
}
