//! Listing cards on a results page.

use crate::document::{text_lines, Document, Node, SelectorError};
use crate::record::JobRecord;

pub const CARD_TAG: &str = "li";
pub const CARD_CLASS: &str = "separator-bot";
pub const LINK_TAG: &str = "div";
pub const LINK_CLASS: &str = "bloc-right";
pub const LINK_ATTR: &str = "onclick";

/// Cards with fewer text segments than this are not listings.
pub const MIN_SEGMENTS: usize = 5;

/// Records extracted from one results page, plus what was dropped.
#[derive(Debug, Default)]
pub struct ListingPage {
    pub records: Vec<JobRecord>,
    /// Number of card nodes found on the page.
    pub cards: usize,
    /// Cards with fewer than [`MIN_SEGMENTS`] segments.
    pub malformed: usize,
    /// Cards whose detail link could not be read.
    pub missing_link: usize,
}

/// Why a card did not produce a record.
#[derive(Debug, PartialEq, Eq)]
pub enum CardSkip {
    Malformed { segments: usize },
    MissingLink,
}

pub fn extract_listings(doc: &Document) -> Result<ListingPage, SelectorError> {
    let cards = doc.find_all(CARD_TAG, CARD_CLASS)?;
    let mut page = ListingPage {
        cards: cards.len(),
        ..ListingPage::default()
    };

    for (idx, card) in cards.iter().enumerate() {
        match extract_card(card)? {
            Ok(record) => page.records.push(record),
            Err(CardSkip::Malformed { segments }) => {
                tracing::debug!("Skipping card {}: only {} text segments", idx + 1, segments);
                page.malformed += 1;
            }
            Err(CardSkip::MissingLink) => {
                tracing::warn!("Skipping card {}: no detail link", idx + 1);
                page.missing_link += 1;
            }
        }
    }

    Ok(page)
}

/// Extracts the summary fields and detail link of a single card.
pub fn extract_card(card: &Node<'_>) -> Result<Result<JobRecord, CardSkip>, SelectorError> {
    let segments = text_lines(&card.text());
    if segments.len() < MIN_SEGMENTS {
        return Ok(Err(CardSkip::Malformed {
            segments: segments.len(),
        }));
    }

    let link = card
        .find_first(LINK_TAG, LINK_CLASS)?
        .and_then(|node| node.attr(LINK_ATTR))
        .and_then(parse_onclick_link);
    let Some(link) = link else {
        return Ok(Err(CardSkip::MissingLink));
    };

    Ok(JobRecord::from_summary(&segments, link).ok_or(CardSkip::Malformed {
        segments: segments.len(),
    }))
}

/// Pulls the destination URL out of a click handler such as
/// `window.location='https://…/offre-123';`.
pub fn parse_onclick_link(onclick: &str) -> Option<String> {
    let (_, rhs) = onclick.split_once('=')?;
    let rhs = rhs.trim_start();
    let literal = match rhs.chars().next() {
        Some(quote @ ('\'' | '"')) => rhs[1..].split(quote).next()?,
        _ => rhs.split(';').next()?,
    };
    let link = literal.trim_matches(|c: char| c == '\'' || c == '"' || c.is_whitespace());
    if link.is_empty() {
        None
    } else {
        Some(link.to_string())
    }
}
