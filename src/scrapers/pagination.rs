use crate::config::OnMissingNext;
use crate::error::ScoutError;
use crate::models::{ListingRecord, PageState};
use crate::scrapers::krisha::ListingParser;
use crate::scrapers::traits::PageFetcher;
use std::time::Duration;
use tracing::{debug, info};

/// Walks the result pages of one search
pub struct PaginationDriver<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    parser: &'a ListingParser,
    pacing_delay: Duration,
    on_missing_next: OnMissingNext,
}

impl<'a, F: PageFetcher + ?Sized> PaginationDriver<'a, F> {
    pub fn new(
        fetcher: &'a F,
        parser: &'a ListingParser,
        pacing_delay: Duration,
        on_missing_next: OnMissingNext,
    ) -> Self {
        Self {
            fetcher,
            parser,
            pacing_delay,
            on_missing_next,
        }
    }

    /// Fetch and extract at most `total_pages` pages starting at `first_page_url`.
    ///
    /// The bound is fixed up front; extra "next" links never extend it.
    /// Any fetch or extraction fault aborts the walk and drops what was collected.
    pub async fn collect(
        &self,
        first_page_url: &str,
        total_pages: usize,
    ) -> Result<Vec<ListingRecord>, ScoutError> {
        let mut state = PageState::new(first_page_url, total_pages);
        let mut listings = Vec::new();
        let mut page_number = 0;

        while state.remaining_pages > 0 {
            state.remaining_pages -= 1;
            page_number += 1;

            let body = self.fetch_page(&state.current_page_url).await?;
            let page = self.parser.parse_page(&body, &state.current_page_url)?;

            info!(
                "📄 Page {}/{}: {} listings",
                page_number,
                total_pages,
                page.listings.len()
            );
            listings.extend(page.listings);

            tokio::time::sleep(self.pacing_delay).await;

            match page.next_page_url {
                Some(next) => {
                    debug!("Next page: {}", next);
                    state.current_page_url = next;
                }
                None if state.remaining_pages > 0 => match self.on_missing_next {
                    OnMissingNext::Repeat => {
                        debug!("No next link on page {}, reusing current URL", page_number);
                    }
                    OnMissingNext::Stop => {
                        info!(
                            "No next link on page {}, stopping {} pages early",
                            page_number, state.remaining_pages
                        );
                        break;
                    }
                },
                None => {}
            }
        }

        Ok(listings)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScoutError> {
        let page = self
            .fetcher
            .get(url, None)
            .await
            .map_err(|source| ScoutError::PageUnreachable {
                url: url.to_string(),
                source,
            })?;

        if !page.is_success() {
            return Err(ScoutError::PageStatus {
                url: url.to_string(),
                status: page.status,
            });
        }

        Ok(page.body)
    }
}
