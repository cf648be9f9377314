//! Markup parsing for krisha.kz rental search results.
//!
//! All parsing is synchronous and returns owned data, so no parse tree
//! lives across an `.await` in the pagination loop.

use crate::error::ScoutError;
use crate::models::{ListingRecord, ResultCount};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Listings per results page; anything above this spans several pages
pub const PAGE_SIZE: u64 = 20;

/// Listings and the follow-up link found on one results page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub listings: Vec<ListingRecord>,
    pub next_page_url: Option<String>,
}

/// Parser for search result pages, built once per run
pub struct ListingParser {
    home_page: String,
    search_options: Selector,
    subtitle: Selector,
    paginator: Selector,
    results: Selector,
    card: Selector,
    price: Selector,
    title: Selector,
    next_link: Selector,
    link_artifacts: Regex,
}

fn selector(css: &'static str) -> Result<Selector, ScoutError> {
    Selector::parse(css).map_err(|e| ScoutError::Selector {
        css,
        detail: format!("{:?}", e),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Concatenate every ASCII digit in `text`. Unit marks like "м²" are dropped.
fn digits_of(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

impl ListingParser {
    pub fn new(home_page: &str) -> Result<Self, ScoutError> {
        let link_artifacts = Regex::new(r"(?:%0[Aa]|%0[Dd]|\r|\n)(?:\+|%20|\s)*")
            .map_err(|e| ScoutError::ConfigInvalid(e.to_string()))?;

        Ok(Self {
            home_page: home_page.trim_end_matches('/').to_string(),
            search_options: selector("div.a-search-options")?,
            subtitle: selector("div.a-search-subtitle")?,
            paginator: selector("nav.paginator")?,
            results: selector("section.a-search-list")?,
            card: selector("div[data-id]")?,
            price: selector("div.a-card__price")?,
            title: selector("a.a-card__title")?,
            next_link: selector("a.paginator__btn--next")?,
            link_artifacts,
        })
    }

    /// Read the result count from the first page.
    ///
    /// `Ok(None)` means the page has no search options block, i.e. nothing matched.
    pub fn parse_result_count(&self, body: &str) -> Result<Option<ResultCount>, ScoutError> {
        let document = Html::parse_document(body);

        if document.select(&self.search_options).next().is_none() {
            return Ok(None);
        }

        let summary = document
            .select(&self.subtitle)
            .next()
            .map(text_of)
            .ok_or_else(|| ScoutError::extraction("result count", "no search subtitle on page"))?;

        let total_listings: u64 = digits_of(&summary).parse().map_err(|_| {
            ScoutError::extraction("result count", format!("no number in {:?}", summary))
        })?;

        let total_pages = if total_listings <= PAGE_SIZE {
            1
        } else {
            let paginator = document
                .select(&self.paginator)
                .next()
                .ok_or_else(|| ScoutError::extraction("page count", "no paginator on page"))?;
            let text = paginator.text().collect::<Vec<_>>().join(" ");
            page_count_from_tokens(&text).ok_or_else(|| {
                ScoutError::extraction("page count", format!("no page number in {:?}", text.trim()))
            })?
        };

        Ok(Some(ResultCount {
            summary,
            total_listings,
            total_pages,
        }))
    }

    /// Extract every listing card and the next page link from a results page
    pub fn parse_page(&self, body: &str, page_url: &str) -> Result<ParsedPage, ScoutError> {
        let document = Html::parse_document(body);

        let results = document
            .select(&self.results)
            .next()
            .ok_or_else(|| ScoutError::extraction("results list", format!("none on {}", page_url)))?;

        let listings = results
            .select(&self.card)
            .map(|card| self.parse_card(card))
            .collect::<Result<Vec<_>, _>>()?;

        let next_page_url = match document.select(&self.next_link).next() {
            Some(anchor) => match anchor.value().attr("href") {
                Some(href) => Some(self.resolve_link(page_url, href)?),
                None => {
                    debug!("Next page anchor without href on {}", page_url);
                    None
                }
            },
            None => None,
        };

        Ok(ParsedPage {
            listings,
            next_page_url,
        })
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Result<ListingRecord, ScoutError> {
        let id = card
            .value()
            .attr("data-id")
            .ok_or_else(|| ScoutError::extraction("id", "card without data-id"))?
            .to_string();

        let price_text = card
            .select(&self.price)
            .next()
            .map(text_of)
            .ok_or_else(|| ScoutError::extraction("price", format!("card {} has no price", id)))?;
        let price = parse_price(&price_text).ok_or_else(|| {
            ScoutError::extraction("price", format!("card {}: {:?} is not a price", id, price_text))
        })?;

        let uuid = card
            .value()
            .attr("data-uuid")
            .ok_or_else(|| ScoutError::extraction("uuid", format!("card {} has no data-uuid", id)))?
            .to_string();

        let title = card
            .select(&self.title)
            .next()
            .map(text_of)
            .ok_or_else(|| ScoutError::extraction("title", format!("card {} has no title", id)))?;
        let mut segments = title.split(',');
        let room = segments.next().map(digits_of).unwrap_or_default();
        let square = segments.next().map(digits_of).ok_or_else(|| {
            ScoutError::extraction("square", format!("card {}: no area in {:?}", id, title))
        })?;

        Ok(ListingRecord {
            link: self.listing_link(&id),
            id,
            price,
            uuid,
            room,
            square,
        })
    }

    /// Public page of a listing
    pub fn listing_link(&self, id: &str) -> String {
        format!("{}/a/show/{}", self.home_page, id)
    }

    /// Strip encoded newline padding from an href and resolve it against the current page
    fn resolve_link(&self, page_url: &str, href: &str) -> Result<String, ScoutError> {
        let cleaned = self.link_artifacts.replace_all(href, "");
        let resolved = Url::parse(page_url)?.join(cleaned.trim())?;
        Ok(resolved.to_string())
    }
}

/// Price text such as "150 000 〒" to 150000. Anything besides digits,
/// whitespace and the tenge sign makes the price unreadable.
fn parse_price(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '〒')
        .collect();
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

/// Paginator text reads like "1 2 3 … 7 Дальше": the last-but-one token is the
/// page count. When that token is not a number the last numeric token is used.
fn page_count_from_tokens(text: &str) -> Option<usize> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() >= 2 {
        if let Ok(pages) = tokens[tokens.len() - 2].parse() {
            return Some(pages);
        }
    }
    tokens.iter().rev().find_map(|token| token.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://krisha.kz/arenda/kvartiry/almaty/?das[live.rooms]=1";

    fn parser() -> ListingParser {
        ListingParser::new("https://krisha.kz").unwrap()
    }

    fn card(id: &str, price: &str, title: &str) -> String {
        format!(
            r#"<div class="a-card" data-id="{id}" data-uuid="uuid-{id}">
                 <a class="a-card__title" href="/a/show/{id}">{title}</a>
                 <div class="a-card__price">{price}</div>
               </div>"#
        )
    }

    fn results_page(cards: &[String], next_href: Option<&str>) -> String {
        let next = next_href
            .map(|href| format!(r#"<a class="paginator__btn paginator__btn--next" href="{href}">Дальше</a>"#))
            .unwrap_or_default();
        format!(
            r#"<html><body>
                 <section class="a-search-list">{}</section>
                 <nav class="paginator">{}</nav>
               </body></html>"#,
            cards.join("\n"),
            next
        )
    }

    #[test]
    fn test_digits_of_drops_units() {
        assert_eq!(digits_of("54 м²"), "54");
        assert_eq!(digits_of("2-комнатная квартира"), "2");
        assert_eq!(digits_of("Найдено 1 057 объявлений"), "1057");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("150 000〒"), Some(150_000));
        assert_eq!(parse_price("150\u{a0}000 〒"), Some(150_000));
        assert_eq!(parse_price("договорная"), None);
        assert_eq!(parse_price("1,5 млн 〒"), None);
        assert_eq!(parse_price("150 000 〒 за 2 мес"), None);
        assert_eq!(parse_price("-150 000 〒"), None);
    }

    #[test]
    fn test_price_with_extra_text_fails_the_page() {
        let html = results_page(&[card("5", "150 000 〒 за 2 мес", "2 комнаты, 54 м²")], None);
        assert!(matches!(
            parser().parse_page(&html, PAGE_URL),
            Err(ScoutError::Extraction { field: "price", .. })
        ));
    }

    #[test]
    fn test_small_result_set_is_one_page() {
        let html = r#"<html><body>
            <div class="a-search-options">filters</div>
            <div class="a-search-subtitle">  Найдено 17 объявлений </div>
        </body></html>"#;
        let count = parser().parse_result_count(html).unwrap().unwrap();
        assert_eq!(count.summary, "Найдено 17 объявлений");
        assert_eq!(count.total_listings, 17);
        assert_eq!(count.total_pages, 1);
    }

    #[test]
    fn test_exactly_one_full_page() {
        let html = r#"<div class="a-search-options"></div>
            <div class="a-search-subtitle">Найдено 20 объявлений</div>"#;
        let count = parser().parse_result_count(html).unwrap().unwrap();
        assert_eq!(count.total_pages, 1);
    }

    #[test]
    fn test_large_result_set_reads_paginator() {
        let html = r#"<html><body>
            <div class="a-search-options"></div>
            <div class="a-search-subtitle">Найдено 137 объявлений</div>
            <nav class="paginator"><a>1</a><a>2</a><a>3</a><span>...</span><a>7</a><a class="paginator__btn--next">Дальше</a></nav>
        </body></html>"#;
        let count = parser().parse_result_count(html).unwrap().unwrap();
        assert_eq!(count.total_listings, 137);
        assert_eq!(count.total_pages, 7);
    }

    #[test]
    fn test_paginator_ending_with_page_count() {
        let html = r#"<div class="a-search-options"></div>
            <div class="a-search-subtitle">Найдено 130 объявлений</div>
            <nav class="paginator">Страница 1 из 7</nav>"#;
        let count = parser().parse_result_count(html).unwrap().unwrap();
        assert_eq!(count.total_pages, 7);
    }

    #[test]
    fn test_missing_search_options_means_no_results() {
        let html = r#"<html><body><div class="a-search-subtitle">Ничего не найдено</div></body></html>"#;
        assert!(parser().parse_result_count(html).unwrap().is_none());
    }

    #[test]
    fn test_missing_paginator_is_an_error() {
        let html = r#"<div class="a-search-options"></div>
            <div class="a-search-subtitle">Найдено 57 объявлений</div>"#;
        assert!(matches!(
            parser().parse_result_count(html),
            Err(ScoutError::Extraction { field: "page count", .. })
        ));
    }

    #[test]
    fn test_parse_cards() {
        let html = results_page(
            &[
                card("101", "150 000〒", "2-комнатная квартира, 54 м², 3/9 этаж"),
                card("102", "220\u{a0}000 〒", "1-комнатная квартира, 38 м²"),
            ],
            None,
        );
        let page = parser().parse_page(&html, PAGE_URL).unwrap();

        assert_eq!(page.listings.len(), 2);
        assert_eq!(
            page.listings[0],
            ListingRecord {
                id: "101".to_string(),
                price: 150_000,
                link: "https://krisha.kz/a/show/101".to_string(),
                uuid: "uuid-101".to_string(),
                room: "2".to_string(),
                square: "54".to_string(),
            }
        );
        assert_eq!(page.listings[1].price, 220_000);
        assert_eq!(page.listings[1].square, "38");
        assert!(page.next_page_url.is_none());
    }

    #[test]
    fn test_title_with_room_word() {
        let html = results_page(&[card("7", "100 000〒", "2 комнаты, 54 м²")], None);
        let page = parser().parse_page(&html, PAGE_URL).unwrap();
        assert_eq!(page.listings[0].room, "2");
        assert_eq!(page.listings[0].square, "54");
    }

    #[test]
    fn test_card_without_price_fails_the_page() {
        let html = results_page(
            &[r#"<div data-id="9" data-uuid="u"><a class="a-card__title">1 комн., 30 м²</a></div>"#.to_string()],
            None,
        );
        assert!(matches!(
            parser().parse_page(&html, PAGE_URL),
            Err(ScoutError::Extraction { field: "price", .. })
        ));
    }

    #[test]
    fn test_card_without_area_fails_the_page() {
        let html = results_page(&[card("9", "100 000〒", "Студия")], None);
        assert!(matches!(
            parser().parse_page(&html, PAGE_URL),
            Err(ScoutError::Extraction { field: "square", .. })
        ));
    }

    #[test]
    fn test_missing_results_list_is_an_error() {
        assert!(matches!(
            parser().parse_page("<html><body></body></html>", PAGE_URL),
            Err(ScoutError::Extraction { field: "results list", .. })
        ));
    }

    #[test]
    fn test_next_link_is_cleaned_and_resolved() {
        let html = results_page(
            &[],
            Some("/arenda/kvartiry/almaty/?das[live.rooms]=1%0A++++&amp;page=2"),
        );
        let page = parser().parse_page(&html, PAGE_URL).unwrap();
        assert!(page.listings.is_empty());
        assert_eq!(
            page.next_page_url.as_deref(),
            Some("https://krisha.kz/arenda/kvartiry/almaty/?das[live.rooms]=1&page=2")
        );
    }

    #[test]
    fn test_page_count_tokens() {
        assert_eq!(page_count_from_tokens("1 2 3 … 12 Дальше"), Some(12));
        assert_eq!(page_count_from_tokens("Страница 2 из 5"), Some(5));
        assert_eq!(page_count_from_tokens("Дальше"), None);
    }
}
