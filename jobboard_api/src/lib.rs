//! HTTP transport for the emploitic.com job board: listing-page URLs and
//! plain GET requests returning raw markup.

mod client;
mod errors;
mod query;
pub mod user_agent;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{ListingQuery, Offset, Query, DEFAULT_LIMIT};
