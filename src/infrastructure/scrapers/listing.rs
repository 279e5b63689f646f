use crate::domain::ListingResult;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static RESULT_CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.card[data-docid]").unwrap());

/// Reads result cards from leaderboard, search and developer pages alike.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingExtractor;

impl ListingExtractor {
    /// Package ids of every result card, in page order. An empty page is not an error.
    pub fn extract(&self, document: &Html) -> ListingResult {
        card_ids(document.root_element())
    }
}

/// Reads `data-docid` from every result card below `root`.
pub(crate) fn card_ids(root: ElementRef<'_>) -> Vec<String> {
    root.select(&RESULT_CARD)
        .filter_map(|card| card.value().attr("data-docid"))
        .map(str::to_string)
        .collect()
}

/// Package ids listed on a leaderboard, search or developer page.
pub fn extract_listing(document: &Html) -> ListingResult {
    ListingExtractor.extract(document)
}
