mod common;
pub use self::common::{ListingQuery, Offset, Query, DEFAULT_LIMIT};
