//! Listing crawl: page numbers in, index artifact out.

mod index;
mod listing;

pub use index::{crawl_index, crawl_index_to_file};
pub use listing::parse_listing;
