//! Supplementary fields from a listing's detail page.
//!
//! Detail pages come in two templates. The criteria block is looked up
//! through an ordered list of candidates; the "apply info" block, when the
//! page has one, is the preferred source of label/value pairs.

use chrono::NaiveDateTime;

use crate::document::{text_lines, Document, SelectorError};
use crate::record::{fields, JobRecord};

/// A tag and class marker that may hold the main detail block.
#[derive(Debug, Clone, Copy)]
pub struct Container {
    pub tag: &'static str,
    pub class: &'static str,
}

/// Main detail block candidates, tried in order.
pub const PRIMARY_CONTAINERS: &[Container] = &[
    Container {
        tag: "div",
        class: "spaced-top row-fluid",
    },
    Container {
        tag: "div",
        class: "spaced-top row-fluid criterias-top",
    },
];

pub const APPLY_INFO: Container = Container {
    tag: "div",
    class: "span12 spaced-bot apply-info",
};

/// Detail labels that name a canonical summary field.
///
/// `overrides` says whether the detail value replaces the one read from the
/// card. The card's location is often just the region, so the detail page
/// wins there; the rank label never overwrites the card.
const LABEL_ALIASES: &[(&str, &str, bool)] = &[
    ("Niveau de poste", fields::RANK, false),
    ("Lieu de travail", fields::LOCATION, true),
];

/// Fields never touched by detail-page data.
const PROTECTED: &[&str] = &[
    fields::TITLE,
    fields::COMPANY,
    fields::PUBLISH_DATE,
    fields::RANK,
    fields::LINK,
    fields::SCRAPED_TIME,
];

#[derive(thiserror::Error, Debug)]
pub enum DetailError {
    #[error("no detail container found on page")]
    MissingContainer,
    #[error(transparent)]
    Selector(#[from] SelectorError),
}

/// Label/value pairs found on a detail page, in page order.
pub fn detail_pairs(doc: &Document) -> Result<Vec<(String, String)>, DetailError> {
    let mut primary = None;
    for candidate in PRIMARY_CONTAINERS {
        if let Some(node) = doc.find_first(candidate.tag, candidate.class)? {
            primary = Some(node);
            break;
        }
    }
    let primary = primary.ok_or(DetailError::MissingContainer)?;

    let apply_text = doc
        .find_first(APPLY_INFO.tag, APPLY_INFO.class)?
        .map(|node| node.text())
        .filter(|text| !text.is_empty());
    let text = apply_text.unwrap_or_else(|| primary.text());

    Ok(pair_up(text_lines(&text)))
}

/// Pairs consecutive lines as (label, value). A trailing label without a value is dropped.
pub fn pair_up(lines: Vec<String>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(lines.len() / 2);
    let mut iter = lines.into_iter();
    while let (Some(label), Some(value)) = (iter.next(), iter.next()) {
        pairs.push((label, value));
    }
    pairs
}

/// Merges detail pairs into a summary record and stamps `scraped_time`.
///
/// Returns the number of fields added or replaced.
pub fn enrich(record: &mut JobRecord, pairs: Vec<(String, String)>, scraped_at: NaiveDateTime) -> usize {
    let mut applied = 0;
    for (label, value) in pairs {
        let alias = LABEL_ALIASES
            .iter()
            .find(|(source, _, _)| *source == label);
        match alias {
            Some((_, _, false)) => continue,
            Some((_, target, true)) => {
                record.insert(*target, value);
                applied += 1;
            }
            None if PROTECTED.contains(&label.as_str()) => continue,
            None => {
                record.insert(label, value);
                applied += 1;
            }
        }
    }
    record.stamp_scraped_time(scraped_at);
    applied
}

/// Parses a detail page and enriches `record` from it.
pub fn enrich_from_markup(
    record: &mut JobRecord,
    markup: &str,
    scraped_at: NaiveDateTime,
) -> Result<usize, DetailError> {
    let pairs = {
        let doc = Document::parse(markup);
        detail_pairs(&doc)?
    };
    Ok(enrich(record, pairs, scraped_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn summary() -> JobRecord {
        let segments: Vec<String> = ["Dev", "Acme", "Alger", "Hier", "Cadre"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        JobRecord::from_summary(&segments, "https://board/offre-1".into()).unwrap()
    }

    const CRITERIA: &str = "\n<dt>Lieu de travail</dt>\n<dd>Alger Centre</dd>\n<dt>Niveau de poste</dt>\n<dd>Directeur</dd>\n<dt>Type de contrat</dt>\n<dd>CDI</dd>\n";

    #[test]
    fn first_template() {
        let doc = Document::parse(&format!(
            r#"<div class="spaced-top row-fluid">{}</div>"#,
            CRITERIA
        ));
        let pairs = detail_pairs(&doc).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2], ("Type de contrat".to_string(), "CDI".to_string()));
    }

    #[test]
    fn second_template() {
        let doc = Document::parse(&format!(
            r#"<div class="spaced-top row-fluid criterias-top">{}</div>"#,
            CRITERIA
        ));
        assert_eq!(detail_pairs(&doc).unwrap().len(), 3);
    }

    #[test]
    fn missing_container() {
        let doc = Document::parse("<div class='job'>\nSecteur\nIT\n</div>");
        assert!(matches!(detail_pairs(&doc), Err(DetailError::MissingContainer)));
    }

    #[test]
    fn apply_info_preferred_over_primary() {
        let doc = Document::parse(&format!(
            r#"<div class="spaced-top row-fluid">{}</div>
               <div class="span12 spaced-bot apply-info">
               Date d'expiration
               30 Avril
               </div>"#,
            CRITERIA
        ));
        let pairs = detail_pairs(&doc).unwrap();
        assert_eq!(
            pairs,
            vec![("Date d'expiration".to_string(), "30 Avril".to_string())]
        );
    }

    #[test]
    fn apply_info_alone_is_not_enough() {
        let doc = Document::parse(
            "<div class=\"span12 spaced-bot apply-info\">\nSecteur\nIT\n</div>",
        );
        assert!(matches!(detail_pairs(&doc), Err(DetailError::MissingContainer)));
    }

    #[test]
    fn odd_line_count_drops_trailing_label() {
        let pairs = pair_up(vec!["a".into(), "1".into(), "b".into()]);
        assert_eq!(pairs, vec![("a".to_string(), "1".to_string())]);
    }

    #[test]
    fn enrich_applies_aliases_and_protects_summary() {
        let mut record = summary();
        let pairs = vec![
            ("Lieu de travail".to_string(), "Alger Centre".to_string()),
            ("Niveau de poste".to_string(), "Directeur".to_string()),
            ("title".to_string(), "Spoofed".to_string()),
            ("Type de contrat".to_string(), "CDI".to_string()),
        ];
        let applied = enrich(&mut record, pairs, now());
        assert_eq!(applied, 2);
        assert_eq!(record.get(fields::LOCATION), Some("Alger Centre"));
        assert_eq!(record.get(fields::RANK), Some("Cadre"));
        assert_eq!(record.get(fields::TITLE), Some("Dev"));
        assert_eq!(record.get("Type de contrat"), Some("CDI"));
        assert_eq!(
            record.get(fields::SCRAPED_TIME),
            Some("2024-03-10 09:30:00.000000")
        );
    }

    #[test]
    fn enrich_from_markup_propagates_missing_container() {
        let mut record = summary();
        let result = enrich_from_markup(&mut record, "<p>gone</p>", now());
        assert!(matches!(result, Err(DetailError::MissingContainer)));
        assert!(!record.contains(fields::SCRAPED_TIME));
    }
}
