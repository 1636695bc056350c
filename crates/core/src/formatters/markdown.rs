use std::sync::LazyLock;

use regex::Regex;

use crate::Result;
use crate::bookmark::{ArticleNote, NoteAnnotation};
use crate::extract::ExtractedAnnotation;

#[cfg(feature = "markdown")]
use crate::ExportError;

static BLANK_LINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap());

/// Heading syntax for converted headings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// `# Heading`
    #[default]
    Atx,
    /// Underlined with `===` / `---`
    Setext,
}

/// Marker used for unordered list items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletMarker {
    #[default]
    Asterisk,
    Dash,
}

/// Configuration for Markdown conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownConfig {
    pub heading_style: HeadingStyle,
    pub bullet_marker: BulletMarker,
}

/// Convert an HTML fragment to trimmed Markdown
pub fn html_to_markdown(html: &str, config: &MarkdownConfig) -> Result<String> {
    let markdown = convert(html, config)?;
    Ok(BLANK_LINE_RUNS.replace_all(markdown.trim(), "\n\n").into_owned())
}

/// Convert HTML to Markdown using htmd crate
#[cfg(feature = "markdown")]
fn convert(html: &str, config: &MarkdownConfig) -> Result<String> {
    use htmd::HtmlToMarkdown;
    use htmd::options::{BulletListMarker, Options};

    let options = Options {
        heading_style: match config.heading_style {
            HeadingStyle::Atx => htmd::options::HeadingStyle::Atx,
            HeadingStyle::Setext => htmd::options::HeadingStyle::Setex,
        },
        bullet_list_marker: match config.bullet_marker {
            BulletMarker::Asterisk => BulletListMarker::Asterisk,
            BulletMarker::Dash => BulletListMarker::Dash,
        },
        ..Default::default()
    };

    HtmlToMarkdown::builder()
        .options(options)
        .build()
        .convert(html)
        .map_err(|e| ExportError::MarkdownError(e.to_string()))
}

/// Fallback HTML to text conversion when markdown feature is disabled
#[cfg(not(feature = "markdown"))]
fn convert(html: &str, _config: &MarkdownConfig) -> Result<String> {
    let fragment = scraper::Html::parse_fragment(html);
    Ok(fragment.root_element().text().collect::<String>())
}

/// Render extracted annotations as note annotations with Markdown text
pub fn annotations_to_notes(annotations: &[ExtractedAnnotation], config: &MarkdownConfig) -> Result<Vec<NoteAnnotation>> {
    annotations
        .iter()
        .map(|annotation| {
            Ok(NoteAnnotation { text: html_to_markdown(&annotation.text, config)?, color: annotation.color.clone() })
        })
        .collect()
}

/// Render exported articles as a Markdown document, one section per article
pub fn notes_to_markdown(notes: &[ArticleNote]) -> String {
    let mut sections = Vec::with_capacity(notes.len());
    for note in notes {
        let bookmark = &note.bookmark;
        let mut section = format!("## [{}]({})", bookmark.title, bookmark.url);
        for annotation in &note.annotations {
            section.push_str("\n\n");
            section.push_str(&quote(&annotation.text));
        }
        sections.push(section);
    }
    sections.join("\n\n")
}

fn quote(text: &str) -> String {
    text.lines().map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") }).collect::<Vec<_>>().join("\n")
}

/// Markdown formatter with configurable options
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, html: &str) -> Result<String> {
        html_to_markdown(html, &self.config)
    }
}
