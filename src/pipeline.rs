//! The one-shot scrape: validate, check the site, count, paginate, export.

use crate::config::{ScoutConfig, SearchOptions};
use crate::error::ScoutError;
use crate::export::{export_listings, ExportSummary};
use crate::models::ResultCount;
use crate::scrapers::{build_search_url, ListingParser, PageFetcher, PaginationDriver, SearchParameters};
use tracing::{debug, info};

/// Run a complete search and write the export.
///
/// Every abort path is returned as a [`ScoutError`]; nothing is written unless
/// all pages were fetched and parsed.
pub async fn run<F: PageFetcher + ?Sized>(
    fetcher: &F,
    options: &SearchOptions,
    config: &ScoutConfig,
    params: &SearchParameters,
) -> Result<ExportSummary, ScoutError> {
    params.validate()?;

    if let Some(location) = options.location(params.location) {
        info!("🔎 Searching rentals in {}", location.name);
    }

    check_site(fetcher, config).await?;

    let first_page_url = build_search_url(config.home_page(), options, params)?;
    info!("First results page: {}", first_page_url);

    let parser = ListingParser::new(config.home_page())?;
    let count = count_results(fetcher, &parser, &first_page_url).await?;
    info!("{}. Total pages: {}", count.summary, count.total_pages);
    debug!("{} listings advertised", count.total_listings);

    let driver = PaginationDriver::new(fetcher, &parser, config.pacing_delay, config.on_missing_next);
    let listings = driver.collect(&first_page_url, count.total_pages).await?;

    info!("✅ Scraped {} listings", listings.len());

    export_listings(&config.output_dir, &listings)
}

/// Reachability check against the home page with a short timeout
pub async fn check_site<F: PageFetcher + ?Sized>(fetcher: &F, config: &ScoutConfig) -> Result<(), ScoutError> {
    let url = config.home_page();

    let page = fetcher
        .get(url, Some(config.health_timeout))
        .await
        .map_err(|source| ScoutError::SiteUnreachable {
            url: url.to_string(),
            source,
        })?;

    if page.status != 200 {
        return Err(ScoutError::UnexpectedStatus {
            url: url.to_string(),
            status: page.status,
        });
    }

    info!("OK. Status: {}", page.status);
    Ok(())
}

async fn count_results<F: PageFetcher + ?Sized>(
    fetcher: &F,
    parser: &ListingParser,
    first_page_url: &str,
) -> Result<ResultCount, ScoutError> {
    let page = fetcher
        .get(first_page_url, None)
        .await
        .map_err(|source| ScoutError::PageUnreachable {
            url: first_page_url.to_string(),
            source,
        })?;

    if !page.is_success() {
        return Err(ScoutError::PageStatus {
            url: first_page_url.to_string(),
            status: page.status,
        });
    }

    parser.parse_result_count(&page.body)?.ok_or(ScoutError::NoResults)
}
