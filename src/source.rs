//! Listing-source seam: the pipeline consumes opaque blocks through these
//! traits, so a live browser session, a saved page, or an in-memory fake all
//! plug in the same way.

use std::collections::HashMap;
use std::path::Path;

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScanError};
use crate::config::Selectors;

/// Richer view reached by navigating into a listing block.
pub trait DetailView {
    fn query_one(&self, selector: &str) -> Option<String>;
    /// Restore the listing context. Called exactly once per navigation.
    fn go_back(&self);
}

/// One rendered summary unit for a single practitioner.
pub trait ListingBlock {
    /// Text of the first sub-element matching `selector`, if any.
    fn query_one(&self, selector: &str) -> Option<String>;
    /// Texts of all sub-elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<String>;
    /// Open the detail view for this block, if the source supports it.
    fn navigate_into<'a>(&'a self) -> Option<Box<dyn DetailView + 'a>>;
}

/// Yields the blocks of the current search, already paged by the collaborator.
pub trait ListingSource {
    fn list_blocks<'a>(&'a self, max_count: usize) -> Result<Vec<Box<dyn ListingBlock + 'a>>>;
}

/// Scoped detail-view acquisition: `go_back` runs on drop, so the listing
/// context is restored on every exit path, including early returns after a
/// failed enrichment.
pub struct DetailScope<'a> {
    view: Box<dyn DetailView + 'a>,
}

impl<'a> DetailScope<'a> {
    pub fn enter(view: Box<dyn DetailView + 'a>) -> Self {
        Self { view }
    }

    pub fn query_one(&self, selector: &str) -> Option<String> {
        self.view.query_one(selector)
    }
}

impl Drop for DetailScope<'_> {
    fn drop(&mut self) {
        self.view.go_back();
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

/// Joined, whitespace-collapsed text of an element subtree.
fn element_text(el: ElementRef) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Listing source backed by a saved results page. Detail views come from
/// separately saved pages keyed by card position; `go_back` is a no-op since
/// nothing navigates away from a parsed document.
pub struct HtmlListingSource {
    document: Html,
    details: HashMap<usize, Html>,
    selectors: Selectors,
}

impl HtmlListingSource {
    pub fn new(html: &str, selectors: Selectors) -> Self {
        Self {
            document: Html::parse_document(html),
            details: HashMap::new(),
            selectors,
        }
    }

    pub fn from_file(path: impl AsRef<Path>, selectors: Selectors) -> Result<Self> {
        let html = std::fs::read_to_string(path)?;
        Ok(Self::new(&html, selectors))
    }

    /// Attach the saved detail page for the card at `index`.
    pub fn with_detail(mut self, index: usize, html: &str) -> Self {
        self.details.insert(index, Html::parse_document(html));
        self
    }
}

impl ListingSource for HtmlListingSource {
    fn list_blocks<'a>(&'a self, max_count: usize) -> Result<Vec<Box<dyn ListingBlock + 'a>>> {
        let card = Selector::parse(&self.selectors.card)
            .map_err(|_| ScanError::InvalidSelector(self.selectors.card.clone()))?;

        let mut blocks: Vec<Box<dyn ListingBlock + 'a>> = Vec::new();
        for (index, element) in self.document.select(&card).take(max_count).enumerate() {
            blocks.push(Box::new(HtmlBlock {
                element,
                detail: self.details.get(&index),
            }));
        }
        Ok(blocks)
    }
}

struct HtmlBlock<'a> {
    element: ElementRef<'a>,
    detail: Option<&'a Html>,
}

impl ListingBlock for HtmlBlock<'_> {
    fn query_one(&self, selector: &str) -> Option<String> {
        let sel = parse_selector(selector)?;
        self.element.select(&sel).next().map(element_text)
    }

    fn query_all(&self, selector: &str) -> Vec<String> {
        match parse_selector(selector) {
            Some(sel) => self.element.select(&sel).map(element_text).collect(),
            None => Vec::new(),
        }
    }

    fn navigate_into<'a>(&'a self) -> Option<Box<dyn DetailView + 'a>> {
        match self.detail {
            Some(document) => Some(Box::new(HtmlDetailView { document })),
            None => None,
        }
    }
}

struct HtmlDetailView<'a> {
    document: &'a Html,
}

impl DetailView for HtmlDetailView<'_> {
    fn query_one(&self, selector: &str) -> Option<String> {
        let sel = parse_selector(selector)?;
        self.document.select(&sel).next().map(element_text)
    }

    fn go_back(&self) {}
}
