use serde::{Deserialize, Serialize};

/// One rental listing as exported. Field order is the CSV column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingRecord {
    pub id: String,
    pub price: i64,
    pub link: String,
    pub uuid: String,
    /// Room count, digits only
    pub room: String,
    /// Floor area, digits only
    pub square: String,
}

/// What the first results page says about the size of the result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCount {
    /// Human-readable count text, e.g. "Найдено 57 объявлений"
    pub summary: String,
    pub total_listings: u64,
    /// Fixed upper bound for the pagination loop
    pub total_pages: usize,
}

/// Transient cursor of the pagination loop
#[derive(Debug, Clone)]
pub struct PageState {
    pub current_page_url: String,
    pub remaining_pages: usize,
}

impl PageState {
    pub fn new(first_page_url: impl Into<String>, total_pages: usize) -> Self {
        Self {
            current_page_url: first_page_url.into(),
            remaining_pages: total_pages,
        }
    }
}
