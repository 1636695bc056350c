//! Annotation extraction from Readeck article HTML.
//!
//! Readeck marks highlighted passages by wrapping text runs in
//! `<rd-annotation>` elements. A single highlight that crosses element
//! boundaries becomes several marker spans sharing one
//! `data-annotation-id-value`. The extractor walks the token stream once,
//! keeps the open-element stack, and rebuilds for every identifier the
//! smallest markup fragment its text lives in.
//!
//! Tags opened between two spans of the same highlight are held as *pending
//! opens* until a later span of that highlight proves they are shared
//! wrapping markup, or until they close again and are dropped. Committed
//! wrappers that close are likewise held as *pending closes* so that a
//! wrapper closed and reopened identically between two spans stays a single
//! wrapper.
//!
//! The merge assumes spans of one highlight are contiguous in the document.
//! Spans of different highlights interleaving inside the same ancestor chain
//! are not handled specially.
//!
//! # Example
//!
//! ```rust
//! use readeck_export_core::extract_annotations;
//!
//! let html = r#"<section><div><p><rd-annotation data-annotation-id-value="a1"
//!     data-annotation-color="yellow">Hello</rd-annotation></p></div></section>"#;
//! let annotations = extract_annotations(html);
//! assert_eq!(annotations[0].text, "<div><p>Hello</p></div>");
//! assert_eq!(annotations[0].color.as_deref(), Some("yellow"));
//! ```

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::element::Element;
use crate::tokenizer::{Token, Tokenizer};

/// Configuration for annotation extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Tag name of the marker element
    pub marker_tag: String,
    /// Attribute holding the annotation identifier
    pub id_attribute: String,
    /// Attribute holding the highlight color
    pub color_attribute: String,
    /// Ancestor tag that bounds reconstructed markup
    pub boundary_tag: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            marker_tag: "rd-annotation".to_string(),
            id_attribute: "data-annotation-id-value".to_string(),
            color_attribute: "data-annotation-color".to_string(),
            boundary_tag: "section".to_string(),
        }
    }
}

impl ExtractorConfig {
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }
}

/// Builder for [`ExtractorConfig`]
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    pub fn marker_tag(mut self, value: impl Into<String>) -> Self {
        self.config.marker_tag = value.into().to_ascii_lowercase();
        self
    }

    pub fn id_attribute(mut self, value: impl Into<String>) -> Self {
        self.config.id_attribute = value.into().to_ascii_lowercase();
        self
    }

    pub fn color_attribute(mut self, value: impl Into<String>) -> Self {
        self.config.color_attribute = value.into().to_ascii_lowercase();
        self
    }

    pub fn boundary_tag(mut self, value: impl Into<String>) -> Self {
        self.config.boundary_tag = value.into().to_ascii_lowercase();
        self
    }

    pub fn build(self) -> ExtractorConfig {
        self.config
    }
}

/// One highlight, with all of its spans merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedAnnotation {
    /// Value of the identifier attribute
    pub id: String,
    /// Highlight color, if any span carried one
    pub color: Option<String>,
    /// Well-formed HTML fragment with the highlighted text
    pub text: String,
}

/// A recoverable problem found while extracting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractIssue {
    /// A marker without an identifier; the span was dropped.
    #[error("<{tag}> without a {attribute} attribute was ignored")]
    MissingIdentifier { tag: String, attribute: String },

    /// A tag opened inside a marker; its text is kept, its markup is not.
    #[error("<{tag}> opened inside annotation {id}")]
    UnexpectedNesting { tag: String, id: String },

    /// An end tag that does not close the current element.
    #[error("</{tag}> does not match open element {}", describe_open(.open))]
    MismatchedEndTag { tag: String, open: Option<String> },

    /// A marker end tag while no marker span is active.
    #[error("</{tag}> outside of any annotation")]
    StrayMarkerClose { tag: String },
}

fn describe_open(open: &Option<String>) -> String {
    open.as_deref().map_or_else(|| "(none)".to_string(), |tag| format!("<{tag}>"))
}

/// Everything one extraction pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Annotations in order of first appearance
    pub annotations: Vec<ExtractedAnnotation>,
    /// Recoverable issues in document order
    pub issues: Vec<ExtractIssue>,
}

/// Per-identifier merge state.
#[derive(Debug)]
struct AnnotationState {
    id: String,
    color: Option<String>,
    text: String,
    /// Wrappers open in `text` and owed a close
    context: Vec<Element>,
    /// Opened since the last span, not yet known to be shared
    pending_open: Vec<Element>,
    /// Closed since the last span, closing tag not yet written
    pending_close: Vec<Element>,
    /// Top of `context` restored from `pending_close` after a full unwind
    reopened: usize,
}

impl AnnotationState {
    fn new(id: &str, baseline: &[Element], boundary: &str) -> Self {
        let trimmed_start = baseline
            .iter()
            .rposition(|el| el.name == boundary)
            .map_or(0, |index| index + 1);

        let mut text = String::new();
        for el in &baseline[trimmed_start..] {
            el.write_open_tag(&mut text);
        }

        Self {
            id: id.to_string(),
            color: None,
            text,
            context: baseline.to_vec(),
            pending_open: Vec::new(),
            pending_close: Vec::new(),
            reopened: 0,
        }
    }

    /// Number of `context` entries above the innermost boundary element.
    fn wrapper_depth(&self, boundary: &str) -> usize {
        let floor = self.context.iter().rposition(|el| el.name == boundary).map_or(0, |index| index + 1);
        self.context.len() - floor
    }

    /// A non-marker tag opened outside any span.
    ///
    /// Once every wrapper has closed, reopening the same chain identically
    /// restores it instead of closing and reopening it in the output.
    fn speculate_open(&mut self, element: &Element, boundary: &str) {
        if self.pending_open.is_empty()
            && self.pending_close.last() == Some(element)
            && self.wrapper_depth(boundary) == self.reopened
        {
            if let Some(restored) = self.pending_close.pop() {
                self.context.push(restored);
                self.reopened += 1;
            }
            return;
        }

        self.commit_closes();
        if element.name != boundary {
            self.pending_open.push(element.clone());
        }
    }

    /// An end tag outside any span.
    fn speculate_close(&mut self, tag: &str, boundary: &str) {
        if let Some(last) = self.pending_open.last() {
            if last.name == tag {
                self.pending_open.pop();
            }
            return;
        }

        if tag != boundary
            && self.context.last().is_some_and(|el| el.name == tag)
            && let Some(closed) = self.context.pop()
        {
            self.reopened = self.reopened.saturating_sub(1);
            self.pending_close.push(closed);
        }
    }

    /// Writes the closing tags of wrappers that were not reopened.
    fn commit_closes(&mut self) {
        self.reopened = 0;
        for el in self.pending_close.drain(..) {
            el.write_close_tag(&mut self.text);
        }
    }

    /// Promotes pending opens to shared context.
    fn flush_pending_open(&mut self) {
        self.reopened = 0;
        for el in &self.pending_open {
            el.write_open_tag(&mut self.text);
        }
        self.context.append(&mut self.pending_open);
    }

    fn finish(mut self, boundary: &str) -> ExtractedAnnotation {
        self.commit_closes();
        for el in self.context.iter().rev() {
            if el.name == boundary {
                break;
            }
            el.write_close_tag(&mut self.text);
        }
        ExtractedAnnotation { id: self.id, color: self.color, text: self.text }
    }
}

#[derive(Debug)]
enum State {
    Outside,
    InsideMarker { annotation: usize, occurrence: String },
}

/// Single-pass annotation extractor.
///
/// Create one per document; [`AnnotationExtractor::extract`] consumes it.
///
/// ```rust
/// use readeck_export_core::{AnnotationExtractor, ExtractorConfig};
///
/// let extraction = AnnotationExtractor::new(ExtractorConfig::default())
///     .extract(r#"<rd-annotation>orphan</rd-annotation>"#);
/// assert!(extraction.annotations.is_empty());
/// assert_eq!(extraction.issues.len(), 2);
/// ```
#[derive(Debug)]
pub struct AnnotationExtractor {
    config: ExtractorConfig,
    open_elements: Vec<Element>,
    annotations: Vec<AnnotationState>,
    by_id: HashMap<String, usize>,
    /// Most recently created annotation, target of speculative context
    latest: Option<usize>,
    state: State,
    issues: Vec<ExtractIssue>,
}

impl Default for AnnotationExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl AnnotationExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            open_elements: Vec::new(),
            annotations: Vec::new(),
            by_id: HashMap::new(),
            latest: None,
            state: State::Outside,
            issues: Vec::new(),
        }
    }

    /// Runs the extractor over `html` and returns the merged annotations.
    pub fn extract(mut self, html: &str) -> Extraction {
        for token in Tokenizer::new(html) {
            self.handle_token(token);
        }
        self.finish()
    }

    fn handle_token(&mut self, token: Token<'_>) {
        match token {
            Token::StartTag { element, self_closing } => {
                let closes_immediately = self_closing || element.is_void();
                let name = closes_immediately.then(|| element.name.clone());
                self.start_tag(element);
                if let Some(name) = name {
                    self.end_tag(&name);
                }
            }
            Token::EndTag(name) => self.end_tag(&name),
            Token::Text(raw) | Token::EntityRef(raw) | Token::CharRef(raw) => {
                if let State::InsideMarker { occurrence, .. } = &mut self.state {
                    occurrence.push_str(raw);
                }
            }
            Token::Comment(_) | Token::Declaration(_) => {}
        }
    }

    fn start_tag(&mut self, element: Element) {
        self.open_elements.push(element.clone());

        if element.name == self.config.marker_tag {
            self.enter_marker(&element);
        } else if let State::InsideMarker { annotation, .. } = &self.state {
            let id = self.annotations[*annotation].id.clone();
            warn!(tag = %element.name, %id, "tag opened inside an annotation");
            self.issues.push(ExtractIssue::UnexpectedNesting { tag: element.name, id });
        } else if let Some(latest) = self.latest {
            self.annotations[latest].speculate_open(&element, &self.config.boundary_tag);
        }
    }

    fn enter_marker(&mut self, marker: &Element) {
        let Some(id) = marker.attr(&self.config.id_attribute) else {
            error!(tag = %marker.name, "annotation marker without identifier; ignoring it");
            self.issues.push(ExtractIssue::MissingIdentifier {
                tag: marker.name.clone(),
                attribute: self.config.id_attribute.clone(),
            });
            return;
        };
        let color = marker.attr(&self.config.color_attribute);

        // The enclosing span ends where the nested one starts.
        if let State::InsideMarker { annotation, occurrence } = std::mem::replace(&mut self.state, State::Outside) {
            let outer = &mut self.annotations[annotation];
            warn!(%id, outer = %outer.id, "annotation opened inside another annotation");
            outer.text.push_str(&occurrence);
        }

        if let Some(latest) = self.latest {
            self.annotations[latest].commit_closes();
        }

        let index = match self.by_id.get(id) {
            Some(index) => *index,
            None => {
                let marker_tag = &self.config.marker_tag;
                let baseline: Vec<Element> = self.open_elements[..self.open_elements.len() - 1]
                    .iter()
                    .filter(|el| el.name != *marker_tag)
                    .cloned()
                    .collect();
                debug!(%id, depth = baseline.len(), "new annotation");
                self.annotations.push(AnnotationState::new(id, &baseline, &self.config.boundary_tag));
                let index = self.annotations.len() - 1;
                self.by_id.insert(id.to_string(), index);
                self.latest = Some(index);
                index
            }
        };

        let annotation = &mut self.annotations[index];
        if annotation.color.is_none() {
            annotation.color = color.map(str::to_string);
        }
        annotation.flush_pending_open();

        self.state = State::InsideMarker { annotation: index, occurrence: String::new() };
    }

    fn end_tag(&mut self, tag: &str) {
        let open = self.open_elements.last().map(|el| el.name.as_str());
        if open != Some(tag) {
            warn!(%tag, open = open.unwrap_or("(none)"), "mismatched end tag ignored");
            self.issues
                .push(ExtractIssue::MismatchedEndTag { tag: tag.to_string(), open: open.map(str::to_string) });
            return;
        }
        self.open_elements.pop();

        if matches!(self.state, State::Outside)
            && let Some(latest) = self.latest
        {
            self.annotations[latest].speculate_close(tag, &self.config.boundary_tag);
        }

        if tag == self.config.marker_tag {
            match std::mem::replace(&mut self.state, State::Outside) {
                State::InsideMarker { annotation, occurrence } => {
                    self.annotations[annotation].text.push_str(&occurrence);
                }
                State::Outside => {
                    warn!(%tag, "annotation end tag outside of any annotation");
                    self.issues.push(ExtractIssue::StrayMarkerClose { tag: tag.to_string() });
                }
            }
        }
    }

    fn finish(mut self) -> Extraction {
        if let State::InsideMarker { annotation, occurrence } = std::mem::replace(&mut self.state, State::Outside) {
            let id = &self.annotations[annotation].id;
            warn!(%id, "input ended inside an annotation");
            self.annotations[annotation].text.push_str(&occurrence);
        }

        let boundary = self.config.boundary_tag.as_str();
        let annotations: Vec<ExtractedAnnotation> =
            self.annotations.into_iter().map(|state| state.finish(boundary)).collect();
        debug!(count = annotations.len(), issues = self.issues.len(), "extraction finished");
        Extraction { annotations, issues: self.issues }
    }
}

/// Extracts annotations with the default configuration.
///
/// Issues are logged and dropped; use [`AnnotationExtractor`] to inspect them.
pub fn extract_annotations(html: &str) -> Vec<ExtractedAnnotation> {
    AnnotationExtractor::default().extract(html).annotations
}

/// Extracts annotations with a custom configuration.
pub fn extract_annotations_with_config(html: &str, config: &ExtractorConfig) -> Extraction {
    AnnotationExtractor::new(config.clone()).extract(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn marker(id: &str, text: &str) -> String {
        format!(r#"<rd-annotation data-annotation-id-value="{id}">{text}</rd-annotation>"#)
    }

    fn texts(html: &str) -> Vec<String> {
        extract_annotations(html).into_iter().map(|a| a.text).collect()
    }

    #[test]
    fn test_extractor_config_default() {
        let config = ExtractorConfig::default();
        assert_eq!(config.marker_tag, "rd-annotation");
        assert_eq!(config.id_attribute, "data-annotation-id-value");
        assert_eq!(config.color_attribute, "data-annotation-color");
        assert_eq!(config.boundary_tag, "section");
    }

    #[test]
    fn test_extractor_config_builder() {
        let config = ExtractorConfig::builder().marker_tag("X-Mark").boundary_tag("article").build();
        assert_eq!(config.marker_tag, "x-mark");
        assert_eq!(config.boundary_tag, "article");
        assert_eq!(config.id_attribute, "data-annotation-id-value");
    }

    #[rstest]
    #[case("")]
    #[case("<p>No highlights here &amp; nothing else.</p>")]
    #[case("<!-- <rd-annotation data-annotation-id-value=\"x\">hidden</rd-annotation> -->")]
    fn test_no_markers_yields_nothing(#[case] html: &str) {
        assert!(extract_annotations(html).is_empty());
    }

    #[test]
    fn test_single_marker_plain_text() {
        assert_eq!(texts(&marker("id1", "hello")), vec!["hello"]);
    }

    #[test]
    fn test_entities_and_charrefs_preserved() {
        assert_eq!(texts(&marker("e1", "&amp; &#169; &#x2014;")), vec!["&amp; &#169; &#x2014;"]);
    }

    #[test]
    fn test_section_ancestor_is_trimmed() {
        let html = format!("<section><div><p>{}</p></div></section>", marker("id2", "A"));
        assert_eq!(texts(&html), vec!["<div><p>A</p></div>"]);
    }

    #[test]
    fn test_last_section_wins() {
        let html = format!(
            "<body><section><div><section><p>{}</p></section></div></section></body>",
            marker("id", "deep")
        );
        assert_eq!(texts(&html), vec!["<p>deep</p>"]);
    }

    #[test]
    fn test_whole_chain_without_section() {
        let html = format!("<article><div class=\"c\"><p>{}</p></div></article>", marker("x", "t"));
        assert_eq!(texts(&html), vec![r#"<article><div class="c"><p>t</p></div></article>"#]);
    }

    #[test]
    fn test_occurrences_in_reopened_wrappers_merge() {
        let html = format!(
            "<section><div><p>{}</p></div></section><div><p>{}</p></div>",
            marker("same", "one"),
            marker("same", "two")
        );
        assert_eq!(texts(&html), vec!["<div><p>onetwo</p></div>"]);
    }

    #[test]
    fn test_reopened_wrapper_needs_identical_attributes() {
        let html = format!(
            "<section><p class=\"a\">{}</p><p class=\"b\">{}</p></section>",
            marker("x", "one"),
            marker("x", "two")
        );
        assert_eq!(texts(&html), vec![r#"<p class="a">one</p><p class="b">two</p>"#]);
    }

    #[test]
    fn test_inline_wrapper_between_occurrences_becomes_shared() {
        let html = format!(
            "<section><p>{}<a href=\"/x\">{}</a>{}</p></section>",
            marker("h", "see "),
            marker("h", "this link"),
            marker("h", " now")
        );
        assert_eq!(texts(&html), vec![r#"<p>see <a href="/x">this link</a> now</p>"#]);
    }

    #[test]
    fn test_wrapper_closed_before_next_occurrence_is_dropped() {
        let html = format!(
            "<section><p>{}<em>not highlighted</em>{}</p></section>",
            marker("h", "start "),
            marker("h", "end")
        );
        assert_eq!(texts(&html), vec!["<p>start end</p>"]);
    }

    #[test]
    fn test_partially_shared_parent() {
        let html = format!(
            "<section><div><p>{}</p><h2 id=\"t\">{}</h2></div></section>",
            marker("m", "para"),
            marker("m", "title")
        );
        assert_eq!(texts(&html), vec![r#"<div><p>para</p><h2 id="t">title</h2></div>"#]);
    }

    #[test]
    fn test_list_items_across_occurrences() {
        let html = format!(
            "<section><div><ul><li>{}</li><li>{}</li></ul></div></section>",
            marker("l", "first"),
            marker("l", "second")
        );
        assert_eq!(texts(&html), vec!["<div><ul><li>first</li><li>second</li></ul></div>"]);
    }

    #[test]
    fn test_order_by_first_seen() {
        let html = format!("{}{}", marker("b", "B"), marker("a", "A"));
        let annotations = extract_annotations(&html);
        let ids: Vec<&str> = annotations.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(annotations[0].text, "B");
        assert_eq!(annotations[1].text, "A");
    }

    #[test]
    fn test_separate_annotations_in_sibling_paragraphs() {
        let html = format!(
            "<section><div><p>{}</p><p>{}</p></div></section>",
            marker("one", "first"),
            marker("two", "second")
        );
        assert_eq!(texts(&html), vec!["<div><p>first</p></div>", "<div><p>second</p></div>"]);
    }

    #[test]
    fn test_color_is_set_once() {
        let html = concat!(
            r#"<rd-annotation data-annotation-id-value="c">a</rd-annotation>"#,
            r#"<rd-annotation data-annotation-id-value="c" data-annotation-color="green">b</rd-annotation>"#,
            r#"<rd-annotation data-annotation-id-value="c" data-annotation-color="red">c</rd-annotation>"#,
        );
        let annotations = extract_annotations(html);
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].color.as_deref(), Some("green"));
        assert_eq!(annotations[0].text, "abc");
    }

    #[test]
    fn test_empty_color_is_absent() {
        let html = r#"<rd-annotation data-annotation-id-value="c" data-annotation-color="">a</rd-annotation>"#;
        assert_eq!(extract_annotations(html)[0].color, None);
    }

    #[rstest]
    #[case(r#"<rd-annotation>no id</rd-annotation>"#)]
    #[case(r#"<rd-annotation data-annotation-id-value="">empty id</rd-annotation>"#)]
    #[case(r#"<rd-annotation data-annotation-id-value>bare id</rd-annotation>"#)]
    fn test_missing_identifier_is_dropped(#[case] html: &str) {
        let extraction = AnnotationExtractor::default().extract(html);
        assert!(extraction.annotations.is_empty());
        assert!(matches!(extraction.issues[0], ExtractIssue::MissingIdentifier { .. }));
        assert!(matches!(extraction.issues[1], ExtractIssue::StrayMarkerClose { .. }));
    }

    #[test]
    fn test_missing_identifier_does_not_stop_extraction() {
        let html = format!("<rd-annotation>lost</rd-annotation>{}", marker("ok", "kept"));
        assert_eq!(texts(&html), vec!["kept"]);
    }

    #[test]
    fn test_nested_tag_inside_marker_keeps_text_only() {
        let html = r#"<p><rd-annotation data-annotation-id-value="n">a <b>bold</b> c</rd-annotation></p>"#;
        let extraction = AnnotationExtractor::default().extract(html);
        assert_eq!(extraction.annotations[0].text, "<p>a bold c</p>");
        assert_eq!(
            extraction.issues,
            vec![ExtractIssue::UnexpectedNesting { tag: "b".to_string(), id: "n".to_string() }]
        );
    }

    #[test]
    fn test_void_element_inside_marker() {
        let html = r#"<rd-annotation data-annotation-id-value="v">line<br>next</rd-annotation>"#;
        let extraction = AnnotationExtractor::default().extract(html);
        assert_eq!(extraction.annotations[0].text, "linenext");
        assert_eq!(extraction.issues.len(), 1);
    }

    #[test]
    fn test_void_elements_between_occurrences() {
        let html = format!("<section><p>{}<br><img src=\"x.png\">{}</p></section>", marker("v", "a"), marker("v", "b"));
        assert_eq!(texts(&html), vec!["<p>ab</p>"]);
    }

    #[test]
    fn test_mismatched_end_tag_is_tolerated() {
        let html = format!("<section><div><p>{}</span></p></div></section>", marker("m", "text"));
        let extraction = AnnotationExtractor::default().extract(&html);
        assert_eq!(extraction.annotations[0].text, "<div><p>text</p></div>");
        assert_eq!(
            extraction.issues,
            vec![ExtractIssue::MismatchedEndTag { tag: "span".to_string(), open: Some("p".to_string()) }]
        );
    }

    #[test]
    fn test_unclosed_input_is_closed_at_finish() {
        let html = r#"<div><p><rd-annotation data-annotation-id-value="u">open"#;
        assert_eq!(texts(html), vec!["<div><p>open</p></div>"]);
    }

    #[test]
    fn test_marker_inside_marker_starts_new_annotation() {
        let html = concat!(
            r#"<rd-annotation data-annotation-id-value="o">outer "#,
            r#"<rd-annotation data-annotation-id-value="i">inner</rd-annotation>"#,
            r#"</rd-annotation>"#
        );
        let extraction = AnnotationExtractor::default().extract(html);
        let ids: Vec<&str> = extraction.annotations.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["o", "i"]);
        assert_eq!(extraction.annotations[0].text, "outer ");
        assert_eq!(extraction.annotations[1].text, "inner");
        assert_eq!(extraction.issues, vec![ExtractIssue::StrayMarkerClose { tag: "rd-annotation".to_string() }]);
    }

    #[test]
    fn test_nested_marker_keeps_shared_context() {
        let html = concat!(
            r#"<section><p><rd-annotation data-annotation-id-value="o" data-annotation-color="red">outer "#,
            r#"<rd-annotation data-annotation-id-value="i" data-annotation-color="blue">inner</rd-annotation>"#,
            r#"</rd-annotation></p></section>"#
        );
        let annotations = extract_annotations(html);
        assert_eq!(annotations[0].text, "<p>outer </p>");
        assert_eq!(annotations[0].color.as_deref(), Some("red"));
        assert_eq!(annotations[1].text, "<p>inner</p>");
        assert_eq!(annotations[1].color.as_deref(), Some("blue"));
    }

    #[test]
    fn test_empty_duplicate_identifier_is_skipped() {
        let html = r#"<rd-annotation data-annotation-id-value="" data-annotation-id-value="x">text</rd-annotation>"#;
        let extraction = AnnotationExtractor::default().extract(html);
        assert_eq!(extraction.annotations[0].id, "x");
        assert_eq!(extraction.annotations[0].text, "text");
        assert!(extraction.issues.is_empty());
    }

    #[test]
    fn test_attributes_reproduced_verbatim() {
        let html = format!(
            r#"<section><div><pre tabindex="0"><code>{}</code></pre></div></section>"#,
            marker("code", "x &lt; y")
        );
        assert_eq!(texts(&html), vec![r#"<div><pre tabindex="0"><code>x &lt; y</code></pre></div>"#]);
    }

    #[test]
    fn test_comments_inside_marker_ignored() {
        assert_eq!(texts(&marker("c", "a<!-- note -->b")), vec!["ab"]);
    }

    #[test]
    fn test_custom_marker_configuration() {
        let config = ExtractorConfig::builder()
            .marker_tag("mark")
            .id_attribute("data-id")
            .color_attribute("data-color")
            .boundary_tag("article")
            .build();
        let html = r#"<article><p><mark data-id="1" data-color="blue">hi</mark></p></article>"#;
        let extraction = extract_annotations_with_config(html, &config);
        assert_eq!(
            extraction.annotations,
            vec![ExtractedAnnotation { id: "1".to_string(), color: Some("blue".to_string()), text: "<p>hi</p>".to_string() }]
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let html = format!(
            "<section><div><p>{}<a href=\"/\">{}</a></p></div></section><p>{}</p>",
            marker("x", "a"),
            marker("x", "b"),
            marker("y", "c")
        );
        assert_eq!(extract_annotations(&html), extract_annotations(&html));
    }

    #[test]
    fn test_issue_display() {
        let issue = ExtractIssue::MismatchedEndTag { tag: "p".to_string(), open: None };
        assert_eq!(issue.to_string(), "</p> does not match open element (none)");
        let issue = ExtractIssue::UnexpectedNesting { tag: "b".to_string(), id: "n".to_string() };
        assert!(issue.to_string().contains("annotation n"));
    }
}
