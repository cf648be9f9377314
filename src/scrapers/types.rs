use crate::error::ScoutError;
use tracing::warn;

/// Highest valid location code (0 is the whole country)
pub const MAX_LOCATION: u32 = 20;
/// Highest valid room filter
pub const MAX_ROOMS: u32 = 4;

/// Search parameters for a rental scrape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParameters {
    /// Index into the location table, 0..=20
    pub location: u32,
    pub wants_furniture: bool,
    /// Room filter, 0..=4
    pub room_count: u32,
    /// Minimum monthly rent (KZT)
    pub price_from: u64,
    /// Maximum monthly rent (KZT)
    pub price_to: u64,
    /// Only listings published by the owner
    pub owner_only: bool,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            location: 1,
            wants_furniture: true,
            room_count: 1,
            price_from: 100_000,
            price_to: 300_000,
            owner_only: true,
        }
    }
}

impl SearchParameters {
    /// Range-check the enumerated parameters. Runs before any network activity.
    pub fn validate(&self) -> Result<(), ScoutError> {
        if self.location > MAX_LOCATION {
            return Err(ScoutError::InvalidParameter {
                name: "location",
                value: self.location,
                max: MAX_LOCATION,
            });
        }
        if self.room_count > MAX_ROOMS {
            return Err(ScoutError::InvalidParameter {
                name: "rooms",
                value: self.room_count,
                max: MAX_ROOMS,
            });
        }
        if self.price_from > self.price_to {
            warn!(
                "Price range {}..{} is inverted, the search will likely be empty",
                self.price_from, self.price_to
            );
        }
        Ok(())
    }
}
