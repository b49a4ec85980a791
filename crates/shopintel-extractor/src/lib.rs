pub mod assembler;
pub mod catalog;
pub mod collab;
pub mod error;
pub mod fetch;
mod html;
pub mod normalize;
pub mod parsers;
pub mod probe;

pub use assembler::StoreAnalyzer;
pub use error::ExtractError;
pub use fetch::{FetchResult, FetchStatus, HttpFetcher, PageFetch};
pub use normalize::normalize_record;
