//! Listing query infrastructure: the [`Query`] trait and the [`ListingQuery`] builder.

use url::Url;

/// Results per page used by the board when nothing else is asked for.
pub const DEFAULT_LIMIT: i64 = 50;

/// Trait implemented by query builders. Provides URL serialization and
/// shared builder methods for pagination.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the listing query fields.
    fn get_listing(&mut self) -> &mut ListingQuery;

    /// Sets the page number (1-indexed). The offset becomes `(page - 1) * limit`.
    fn with_page(mut self, page: i64) -> Self
    where
        Self: Sized,
    {
        self.get_listing().offset = Offset::Page(page);
        self
    }

    /// Skips an explicit number of offers, ignoring any page number.
    fn with_start(mut self, start: i64) -> Self
    where
        Self: Sized,
    {
        self.get_listing().offset = Offset::Start(start);
        self
    }

    /// Sets the number of results per page.
    fn with_limit(mut self, limit: i64) -> Self
    where
        Self: Sized,
    {
        self.get_listing().limit = limit;
        self
    }
}

/// How the `start` parameter of a listing URL is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offset {
    /// 1-indexed page number, multiplied by the limit.
    Page(i64),
    /// Explicit number of offers to skip.
    Start(i64),
}

/// Pagination for the `offres-d-emploi` listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListingQuery {
    /// Results per page. Defaults to 50.
    pub limit: i64,
    /// Page or explicit start. Defaults to page 1.
    pub offset: Offset,
}

impl Default for ListingQuery {
    fn default() -> ListingQuery {
        ListingQuery {
            limit: DEFAULT_LIMIT,
            offset: Offset::Page(1),
        }
    }
}

impl ListingQuery {
    /// Number of offers skipped before the first card on the page.
    pub fn start(&self) -> i64 {
        match self.offset {
            Offset::Page(page) => (page - 1).max(0) * self.limit,
            Offset::Start(start) => start,
        }
    }
}

impl Query for ListingQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &self.limit.to_string())
            .append_pair("start", &self.start().to_string());
        url
    }

    fn get_listing(&mut self) -> &mut ListingQuery {
        self
    }
}
