//! Logseq outline rendering for exported bookmarks.
//!
//! Each bookmark becomes a collapsed block carrying page properties, with one
//! child block per annotation quoted underneath.

use time::Date;
use time::macros::format_description;

use crate::bookmark::{ArticleNote, Bookmark, NoteAnnotation};
use crate::config::{DEFAULT_BASE_URL, readeck_url};
use crate::{ExportError, Result};

/// Configuration for Logseq output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogseqConfig {
    /// First line of the document
    pub heading: String,
    /// Page every article links back to
    pub link_page: String,
    /// Readeck base URL used for the article links
    pub base_url: String,
}

impl Default for LogseqConfig {
    fn default() -> Self {
        Self {
            heading: "- ## 🔖 Articles".to_string(),
            link_page: "Readeck".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Formats an ISO 8601 date or timestamp as a Logseq journal link,
/// e.g. `2024-01-05T10:00:00Z` becomes `[[Jan 5th, 2024]]`.
pub fn format_date(iso: &str) -> Result<String> {
    let day = iso.split('T').next().unwrap_or_default().trim();
    let date = Date::parse(day, format_description!("[year]-[month]-[day]"))
        .map_err(|_| ExportError::InvalidDate(iso.to_string()))?;

    let month = date.month().to_string();
    let n = date.day();
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };

    Ok(format!("[[{} {}{}, {}]]", &month[..3], n, suffix, date.year()))
}

fn wiki_link(page: &str) -> String {
    format!("[[{page}]]")
}

/// Renders one annotation block, quoting every line of its text.
pub fn render_annotation(annotation: &NoteAnnotation) -> String {
    let mut out = String::from("\t\t-");
    if let Some(color) = annotation.color.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&format!(" background-color:: {color}"));
    }
    out.push('\n');

    let lines = annotation.text.split('\n');
    if annotation.text.contains("```") {
        // Logseq cannot render fenced code inside `>` quotes
        out.push_str("\t\t  #+BEGIN_QUOTE\n");
        for line in lines {
            out.push_str(&format!("\t\t  {line}\n"));
        }
        out.push_str("\t\t  #+END_QUOTE\n");
    } else {
        for line in lines {
            out.push_str(&format!("\t\t  > {line}\n"));
        }
    }
    out
}

/// Renders the property lines of an article block.
fn properties(bookmark: &Bookmark, config: &LogseqConfig) -> Result<Vec<String>> {
    let mut props = vec!["collapsed:: true".to_string(), "type:: [[Article]]".to_string(), format!("url:: {}", bookmark.url)];

    if !bookmark.authors.is_empty() {
        let authors: Vec<String> = bookmark.authors.iter().map(|a| wiki_link(a)).collect();
        props.push(format!("author:: {}", authors.join(", ")));
    }

    let mut links = vec![wiki_link(&config.link_page)];
    links.extend(bookmark.labels.iter().map(|l| wiki_link(l)));
    if let Some(site) = bookmark.site_name.as_deref().filter(|s| !s.is_empty()) {
        links.push(wiki_link(site));
    }
    props.push(format!("links:: {}", links.join(", ")));

    if let Some(published) = bookmark.published.as_deref().filter(|p| !p.is_empty()) {
        props.push(format!("date-published:: {}", format_date(published)?));
    }

    Ok(props)
}

/// Renders an article block followed by its annotation blocks.
pub fn render_article(note: &ArticleNote, config: &LogseqConfig) -> Result<String> {
    let bookmark = &note.bookmark;
    let link = readeck_url(&config.base_url, &["bookmarks", &bookmark.id]);

    let mut out = format!("\t- [{}]({})\n", bookmark.title, link);
    for prop in properties(bookmark, config)? {
        out.push_str(&format!("\t  {prop}\n"));
    }
    for annotation in &note.annotations {
        out.push_str(&render_annotation(annotation));
    }
    Ok(out)
}

/// Renders the whole document: heading line then every article.
pub fn render_articles(notes: &[ArticleNote], config: &LogseqConfig) -> Result<String> {
    let mut out = format!("{}\n", config.heading);
    for note in notes {
        out.push_str(&render_article(note, config)?);
    }
    Ok(out)
}

/// Logseq formatter with configurable options
pub struct LogseqFormatter {
    config: LogseqConfig,
}

impl LogseqFormatter {
    pub fn new(config: LogseqConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, notes: &[ArticleNote]) -> Result<String> {
        render_articles(notes, &self.config)
    }
}
