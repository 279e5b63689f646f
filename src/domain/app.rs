use crate::domain::image;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Publish date as printed on the page, or parsed when the parser understood it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublishDate {
    Parsed(NaiveDate),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppRecord {
    pub package_id: String,
    pub url: String,

    pub title: String,
    pub category_name: String,
    pub category_id: String,
    /// Opaque identifier, or the raw CDN URL when images are not normalized.
    pub logo_image_id: String,
    pub price: String,
    pub developer_name: String,
    pub developer_id: String,
    pub android_requirement: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_changes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<PublishDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_count_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Counts for 1 to 5 stars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_histogram: Option<[u64; 5]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_num: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_package_ids: Option<Vec<String>>,

    #[serde(default)]
    pub top_developer: bool,
    #[serde(default)]
    pub in_app_payments: bool,

    #[serde(default)]
    pub screenshots: Vec<String>,
}

impl AppRecord {
    pub fn logo_url(&self, width: u32, height: u32) -> String {
        display_url(&self.logo_image_id, width, height)
    }

    pub fn screenshot_urls(&self, width: u32, height: u32) -> impl Iterator<Item = String> + '_ {
        self.screenshots
            .iter()
            .map(move |shot| display_url(shot, width, height))
    }

    /// Lower and upper bound of the install range, e.g. `"10000 - 50000"`.
    pub fn install_bounds(&self) -> Option<(u64, u64)> {
        let range = self.install_count_range.as_deref()?;
        let (min, max) = range.split_once(" - ")?;
        Some((min.trim().parse().ok()?, max.trim().parse().ok()?))
    }

    pub fn total_ratings(&self) -> Option<u64> {
        self.rating_histogram.map(|hist| hist.iter().sum())
    }
}

fn display_url(stored: &str, width: u32, height: u32) -> String {
    if image::is_identifier(stored) {
        image::encode(stored, width, height)
    } else {
        stored.to_string()
    }
}
