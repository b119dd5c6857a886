//! Queryable HTML document built on the `scraper` crate.
//!
//! Lookups take a tag name and a class marker. A single-word marker matches
//! any element listing that class; a multi-word marker must equal the
//! element's whole class list, in order. Page templates on the board differ
//! only by an extra trailing class, so the distinction matters.

use scraper::{ElementRef, Html, Selector};

#[derive(thiserror::Error, Debug)]
#[error("invalid selector '{selector}': {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

/// A parsed page.
pub struct Document {
    html: Html,
}

/// An element inside a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// All elements with the given tag and class marker, in document order.
    pub fn find_all(&self, tag: &str, class: &str) -> Result<Vec<Node<'_>>, SelectorError> {
        let selector = tag_selector(tag)?;
        Ok(self
            .html
            .select(&selector)
            .filter(|el| class_matches(el, class))
            .map(|element| Node { element })
            .collect())
    }

    /// First element with the given tag and class marker.
    pub fn find_first(&self, tag: &str, class: &str) -> Result<Option<Node<'_>>, SelectorError> {
        let selector = tag_selector(tag)?;
        Ok(self
            .html
            .select(&selector)
            .find(|el| class_matches(el, class))
            .map(|element| Node { element }))
    }
}

impl<'a> Node<'a> {
    /// First descendant with the given tag and class marker.
    pub fn find_first(&self, tag: &str, class: &str) -> Result<Option<Node<'a>>, SelectorError> {
        let selector = tag_selector(tag)?;
        Ok(self
            .element
            .select(&selector)
            .find(|el| class_matches(el, class))
            .map(|element| Node { element }))
    }

    /// Concatenated text of every descendant text node, whitespace untouched.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }
}

/// Splits text on line breaks, trims each line and drops the empty ones.
pub fn text_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn tag_selector(tag: &str) -> Result<Selector, SelectorError> {
    Selector::parse(tag).map_err(|e| SelectorError {
        selector: tag.to_string(),
        message: e.to_string(),
    })
}

fn class_matches(element: &ElementRef<'_>, class: &str) -> bool {
    let Some(attr) = element.value().attr("class") else {
        return false;
    };
    let mut wanted = class.split_whitespace();
    match (wanted.next(), wanted.next()) {
        (Some(single), None) => attr.split_whitespace().any(|c| c == single),
        (Some(_), Some(_)) => attr.split_whitespace().eq(class.split_whitespace()),
        (None, _) => false,
    }
}
