use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Package identifiers in page order.
pub type ListingResult = Vec<String>;

pub const CATEGORIES: [&str; 36] = [
    "application",
    "app_wallpaper",
    "app_widgets",
    "arcade",
    "books_and_reference",
    "brain",
    "business",
    "cards",
    "casual",
    "comics",
    "communication",
    "education",
    "entertainment",
    "finance",
    "game",
    "game_wallpaper",
    "game_widgets",
    "health_and_fitness",
    "libraries_and_demo",
    "lifestyle",
    "media_and_video",
    "medical",
    "music_and_audio",
    "news_and_magazines",
    "personalization",
    "photography",
    "productivity",
    "racing",
    "shopping",
    "social",
    "sports",
    "sports_games",
    "tools",
    "transportation",
    "travel_and_local",
    "weather",
];

/// Ranked leaderboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    TopsellingFree,
    TopsellingPaid,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::TopsellingFree => "topselling_free",
            Collection::TopsellingPaid => "topselling_paid",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks `category` against the catalogue and returns its path form.
pub fn category_path(category: &str) -> Result<String> {
    let lower = category.to_lowercase();
    if CATEGORIES.contains(&lower.as_str()) {
        Ok(lower.to_uppercase())
    } else {
        Err(StoreError::InvalidArgument(format!(
            "{category} not exists in category list"
        )))
    }
}

/// Offset and size of the single listing page to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start: u32,
    pub num: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { start: 0, num: 24 }
    }
}

impl Page {
    pub fn new(start: u32, num: u32) -> Result<Self> {
        if num == 0 {
            return Err(StoreError::InvalidArgument(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self { start, num })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_path_is_uppercased() {
        assert_eq!(category_path("game").unwrap(), "GAME");
        assert_eq!(category_path("Travel_And_Local").unwrap(), "TRAVEL_AND_LOCAL");
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = category_path("gambling").unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[test]
    fn collection_wire_names() {
        assert_eq!(Collection::TopsellingFree.to_string(), "topselling_free");
        assert_eq!(Collection::TopsellingPaid.as_str(), "topselling_paid");
    }

    #[test]
    fn empty_page_is_rejected() {
        assert!(Page::new(0, 0).is_err());
        assert_eq!(Page::new(48, 24).unwrap(), Page { start: 48, num: 24 });
    }
}
