use crate::config::SearchOptions;
use crate::error::ScoutError;
use crate::scrapers::types::{SearchParameters, MAX_LOCATION};

/// Build the first results page URL for a validated parameter set.
///
/// Pure: the same options and parameters always give the same string.
pub fn build_search_url(
    home_page: &str,
    options: &SearchOptions,
    params: &SearchParameters,
) -> Result<String, ScoutError> {
    let location = options
        .location(params.location)
        .ok_or(ScoutError::InvalidParameter {
            name: "location",
            value: params.location,
            max: MAX_LOCATION,
        })?;

    Ok(format!(
        "{home}/arenda/kvartiry/{path}?das[_sys.hasphoto]=1{furniture}\
         &das[live.rooms]={rooms}\
         &das[price][from]={from}\
         &das[price][to]={to}{owner}",
        home = home_page.trim_end_matches('/'),
        path = location.path,
        furniture = options.furniture.get(params.wants_furniture),
        rooms = params.room_count,
        from = params.price_from,
        to = params.price_to,
        owner = options.owner.get(params.owner_only),
    ))
}
