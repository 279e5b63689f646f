use crate::config::StoreConfig;
use crate::domain::{AppRecord, Collection, ListingResult, Page};
use crate::error::Result;
use crate::infrastructure::{DetailExtractor, FieldIssue, ListingExtractor, PlayStoreClient};
use reqwest::{Client, Url};
use scraper::Html;
use tracing::info;

pub const DEFAULT_SEARCH_TYPE: &str = "apps";

/// Fetches storefront pages and turns them into listings and records.
pub struct StoreService {
    client: PlayStoreClient,
    listing: ListingExtractor,
    detail: DetailExtractor,
    language: String,
    country: String,
}

impl StoreService {
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::new(config.http_client()?, config)
    }

    pub fn new(http_client: Client, config: &StoreConfig) -> Result<Self> {
        let client = PlayStoreClient::new(http_client, config);
        info!("Created new Store service");
        Ok(Self {
            client,
            listing: ListingExtractor,
            detail: DetailExtractor::new(config.extract)?,
            language: config.language.clone(),
            country: config.country.clone(),
        })
    }

    /// One page of a ranked collection, optionally within a category.
    pub async fn leaderboard(
        &self,
        collection: Collection,
        category: Option<&str>,
        page: Page,
    ) -> Result<ListingResult> {
        let url = self
            .client
            .leaderboard_url(collection, category, page, &self.language)?;
        self.listing_page(url).await
    }

    /// Searches the apps section.
    pub async fn search(&self, query: &str, page: Page) -> Result<ListingResult> {
        self.search_in(query, DEFAULT_SEARCH_TYPE, page).await
    }

    pub async fn search_in(
        &self,
        query: &str,
        content_type: &str,
        page: Page,
    ) -> Result<ListingResult> {
        let url = self
            .client
            .search_url(query, content_type, page, &self.language, &self.country)?;
        self.listing_page(url).await
    }

    pub async fn developer(&self, developer: &str, page: Page) -> Result<ListingResult> {
        let url = self.client.developer_url(developer, page, &self.language)?;
        self.listing_page(url).await
    }

    pub async fn app(&self, package_id: &str) -> Result<AppRecord> {
        self.app_with_diagnostics(package_id)
            .await
            .map(|(record, _)| record)
    }

    pub async fn app_with_diagnostics(
        &self,
        package_id: &str,
    ) -> Result<(AppRecord, Vec<FieldIssue>)> {
        let url = self
            .client
            .details_url(package_id, &self.language, &self.country)?;
        let source_url = url.to_string();
        let body = self
            .client
            .fetch_details(url, package_id, &self.country)
            .await?;

        let document = Html::parse_document(&body);
        self.detail
            .extract_with_diagnostics(&document, &source_url, package_id)
    }

    async fn listing_page(&self, url: Url) -> Result<ListingResult> {
        let body = self.client.fetch_listing(url).await?;
        let document = Html::parse_document(&body);
        let ids = self.listing.extract(&document);
        info!("Listing page yielded {} apps", ids.len());
        Ok(ids)
    }
}
