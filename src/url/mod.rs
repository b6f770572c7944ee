//! URL handling module for Link Mapper
//!
//! This module resolves raw hrefs into absolute URLs and decides which of
//! them are eligible for the crawl frontier.

mod filter;
mod normalize;

pub use filter::LinkFilter;
pub use normalize::{normalize_link, parse_seed};
