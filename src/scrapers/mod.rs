pub mod http;
pub mod krisha;
pub mod pagination;
pub mod search_url;
pub mod traits;
pub mod types;

pub use http::HttpFetcher;
pub use krisha::ListingParser;
pub use pagination::PaginationDriver;
pub use search_url::build_search_url;
pub use traits::PageFetcher;
pub use types::SearchParameters;
