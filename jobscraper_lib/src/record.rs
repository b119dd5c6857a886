//! The scraped job record: an ordered, open-vocabulary field map.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;

/// Canonical field names every extracted record carries.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const COMPANY: &str = "company";
    pub const LOCATION: &str = "location";
    pub const PUBLISH_DATE: &str = "publish_date";
    pub const RANK: &str = "rank";
    pub const LINK: &str = "link";
    pub const SCRAPED_TIME: &str = "scraped_time";
    /// Detail-page label holding the offer's expiry date.
    pub const EXPIRY_DATE: &str = "Date d'expiration";
}

/// Timestamp format used for `scraped_time`.
pub const SCRAPED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One job listing.
///
/// Fields keep insertion order so that persisted columns follow the order in
/// which they were scraped. An absent field is simply missing from the map;
/// equality compares the maps regardless of key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JobRecord {
    fields: IndexMap<String, String>,
}

impl JobRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from the five summary segments of a listing card and its link.
    pub fn from_summary(segments: &[String], link: String) -> Option<Self> {
        let [title, company, location, publish_date, rank, ..] = segments else {
            return None;
        };
        let mut record = Self::new();
        record.insert(fields::TITLE, title.clone());
        record.insert(fields::COMPANY, company.clone());
        record.insert(fields::LOCATION, location.clone());
        record.insert(fields::PUBLISH_DATE, publish_date.clone());
        record.insert(fields::RANK, rank.clone());
        record.insert(fields::LINK, link);
        Some(record)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Sets a field, keeping its original position if it already exists.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn link(&self) -> Option<&str> {
        self.get(fields::LINK)
    }

    pub fn stamp_scraped_time(&mut self, at: NaiveDateTime) {
        self.insert(
            fields::SCRAPED_TIME,
            at.format(SCRAPED_TIME_FORMAT).to_string(),
        );
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for JobRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
