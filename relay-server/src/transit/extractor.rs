//! Next-departure extraction from a transit search result page.
//!
//! The print view of a route search shows the next departure as
//!
//! ```html
//! <div id="srline">
//!   <ul>
//!     <li class="time"><span>19:34発→</span>...</li>
//!   </ul>
//! </div>
//! ```
//!
//! [`TimetableExtractor`] is a forward-only state machine over start tags
//! and text. It never rewinds: the first container, the first item inside
//! it and the first span after that are the only candidates considered.

use scraper::{Html, Node};

/// Where the scan currently is in the container → item → span nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScanState {
    SeekingContainer,
    SeekingItem,
    SeekingTimeSpan,
    Done,
}

/// A single markup token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    /// An opening tag with its attributes in source order.
    StartTag {
        name: &'a str,
        attrs: Vec<(&'a str, &'a str)>,
    },
    /// A run of character data.
    Text(&'a str),
}

impl<'a> MarkupEvent<'a> {
    /// Build a start tag event.
    pub fn start_tag(name: &'a str, attrs: &[(&'a str, &'a str)]) -> Self {
        MarkupEvent::StartTag {
            name,
            attrs: attrs.to_vec(),
        }
    }

    /// Whether this is a start tag named `tag` carrying exactly `key="value"`.
    fn is_tag_with(&self, tag: &str, key: &str, value: &str) -> bool {
        match self {
            MarkupEvent::StartTag { name, attrs } => {
                *name == tag && attrs.iter().any(|&(k, v)| k == key && v == value)
            }
            MarkupEvent::Text(_) => false,
        }
    }

    fn is_tag(&self, tag: &str) -> bool {
        matches!(self, MarkupEvent::StartTag { name, .. } if *name == tag)
    }
}

/// The three-level nesting that holds the departure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupPattern {
    pub container_tag: &'static str,
    /// Identifying attribute of the container, matched exactly.
    pub container_attr: (&'static str, &'static str),
    pub item_tag: &'static str,
    /// Class attribute of the item, matched exactly (not as a class list).
    pub item_class: &'static str,
    /// The first tag of this name inside the item holds the time.
    pub span_tag: &'static str,
}

/// Layout of the transit search print page.
pub const PRINT_PAGE_PATTERN: MarkupPattern = MarkupPattern {
    container_tag: "div",
    container_attr: ("id", "srline"),
    item_tag: "li",
    item_class: "time",
    span_tag: "span",
};

impl Default for MarkupPattern {
    fn default() -> Self {
        PRINT_PAGE_PATTERN
    }
}

/// Single-pass extractor for the next departure time.
#[derive(Debug, Clone)]
pub struct TimetableExtractor {
    pattern: MarkupPattern,
    state: ScanState,
    capture: bool,
    extracted: String,
}

impl Default for TimetableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TimetableExtractor {
    /// Create an extractor for the print page layout.
    pub fn new() -> Self {
        Self::with_pattern(PRINT_PAGE_PATTERN)
    }

    /// Create an extractor for a custom layout.
    pub fn with_pattern(pattern: MarkupPattern) -> Self {
        Self {
            pattern,
            state: ScanState::SeekingContainer,
            capture: false,
            extracted: String::new(),
        }
    }

    /// Current scan state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// The captured text, empty if nothing has been found.
    pub fn extracted(&self) -> &str {
        &self.extracted
    }

    /// Consume the extractor and return the captured text.
    pub fn into_extracted(self) -> String {
        self.extracted
    }

    /// Whether further events can no longer change the result.
    pub fn is_finished(&self) -> bool {
        self.state == ScanState::Done && !self.capture
    }

    /// Advance the state machine by one event.
    pub fn feed(&mut self, event: &MarkupEvent<'_>) {
        let pattern = self.pattern;
        match (self.state, event) {
            (ScanState::SeekingContainer, MarkupEvent::StartTag { .. }) => {
                let (key, value) = pattern.container_attr;
                if event.is_tag_with(pattern.container_tag, key, value) {
                    self.state = ScanState::SeekingItem;
                }
            }
            (ScanState::SeekingItem, MarkupEvent::StartTag { .. }) => {
                if event.is_tag_with(pattern.item_tag, "class", pattern.item_class) {
                    self.state = ScanState::SeekingTimeSpan;
                }
            }
            (ScanState::SeekingTimeSpan, MarkupEvent::StartTag { .. }) => {
                if event.is_tag(pattern.span_tag) {
                    self.capture = true;
                    self.state = ScanState::Done;
                }
            }
            (_, MarkupEvent::Text(text)) if self.capture => {
                self.extracted = (*text).to_string();
                self.capture = false;
            }
            _ => {}
        }
    }

    /// Tokenize an HTML document and feed it through the state machine.
    ///
    /// Nodes are visited in document order; the walk stops as soon as the
    /// result is fixed.
    pub fn scan_html(&mut self, html: &str) {
        let document = Html::parse_document(html);

        for node in document.tree.root().descendants() {
            if self.is_finished() {
                break;
            }
            let event = match node.value() {
                Node::Element(element) => MarkupEvent::StartTag {
                    name: element.name(),
                    attrs: element.attrs().collect(),
                },
                Node::Text(text) => MarkupEvent::Text(&**text),
                _ => continue,
            };
            self.feed(&event);
        }
    }

    /// Extract the raw departure text from an HTML document using the
    /// print page layout. Returns an empty string when it is absent.
    pub fn extract_from_html(html: &str) -> String {
        let mut extractor = Self::new();
        extractor.scan_html(html);
        extractor.into_extracted()
    }
}
