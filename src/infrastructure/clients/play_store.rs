use crate::config::StoreConfig;
use crate::domain::{category_path, Collection, Page};
use crate::error::{Result, StoreError};
use chrono::Utc;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info, warn};

/// HTTP access to the storefront. Only fetches pages; parsing happens elsewhere.
pub struct PlayStoreClient {
    client: Client,
    base_url: String,
    user_agent: Option<String>,
}

impl PlayStoreClient {
    pub fn new(client: Client, config: &StoreConfig) -> Self {
        info!("Created new Play Store client for {}", config.base_url);
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        Url::parse_with_params(&format!("{}{}", self.base_url, path), params)
            .map_err(|e| StoreError::InvalidArgument(format!("bad storefront URL: {e}")))
    }

    pub fn leaderboard_url(
        &self,
        collection: Collection,
        category: Option<&str>,
        page: Page,
        language: &str,
    ) -> Result<Url> {
        let mut path = "/store/apps".to_string();
        if let Some(category) = category {
            path.push_str("/category/");
            path.push_str(&category_path(category)?);
        }
        path.push_str("/collection/");
        path.push_str(collection.as_str());

        self.url(
            &path,
            &[
                ("start", page.start.to_string()),
                ("num", page.num.to_string()),
                ("hl", language.to_string()),
            ],
        )
    }

    /// `content_type` is the storefront section searched, e.g. `apps` or `movies`.
    pub fn search_url(
        &self,
        query: &str,
        content_type: &str,
        page: Page,
        language: &str,
        country: &str,
    ) -> Result<Url> {
        self.url(
            "/store/search",
            &[
                ("q", query.to_string()),
                ("start", page.start.to_string()),
                ("num", page.num.to_string()),
                ("hl", language.to_string()),
                ("gl", country.to_string()),
                ("c", content_type.to_string()),
            ],
        )
    }

    pub fn developer_url(&self, developer: &str, page: Page, language: &str) -> Result<Url> {
        self.url(
            "/store/apps/developer",
            &[
                ("id", developer.to_string()),
                ("start", page.start.to_string()),
                ("num", page.num.to_string()),
                ("hl", language.to_string()),
            ],
        )
    }

    pub fn details_url(&self, package_id: &str, language: &str, country: &str) -> Result<Url> {
        self.url(
            "/store/apps/details",
            &[
                ("id", package_id.to_string()),
                ("hl", language.to_string()),
                ("gl", country.to_string()),
            ],
        )
    }

    /// Fetches a listing page. Any non-2xx status is a transport error.
    pub async fn fetch_listing(&self, url: Url) -> Result<String> {
        debug!("Fetching listing {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Fetches an application page. 403 and 404 mean the app cannot be shown.
    pub async fn fetch_details(&self, url: Url, package_id: &str, country: &str) -> Result<String> {
        debug!("Fetching details for {}", package_id);
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent_value())
            .send()
            .await?;

        if let Some(err) = unavailable(response.status(), package_id, country) {
            warn!("{}", err);
            return Err(err);
        }

        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }

    fn user_agent_value(&self) -> String {
        match &self.user_agent {
            Some(user_agent) => user_agent.clone(),
            None => format!("{:.6}", Utc::now().timestamp_micros() as f64 / 1_000_000.0),
        }
    }
}

/// Maps the statuses that mean "no such app here" onto [`StoreError::Unavailable`].
pub(crate) fn unavailable(status: StatusCode, package_id: &str, country: &str) -> Option<StoreError> {
    match status {
        StatusCode::FORBIDDEN => Some(StoreError::Unavailable {
            package_id: package_id.to_string(),
            region: Some(country.to_string()),
        }),
        StatusCode::NOT_FOUND => Some(StoreError::Unavailable {
            package_id: package_id.to_string(),
            region: None,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PlayStoreClient {
        PlayStoreClient::new(Client::new(), &StoreConfig::default())
    }

    #[test]
    fn leaderboard_url_with_category() {
        let url = client()
            .leaderboard_url(
                Collection::TopsellingPaid,
                Some("game"),
                Page::new(24, 48).unwrap(),
                "en",
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://play.google.com/store/apps/category/GAME/collection/topselling_paid?start=24&num=48&hl=en"
        );
    }

    #[test]
    fn leaderboard_url_rejects_unknown_category() {
        let err = client()
            .leaderboard_url(Collection::TopsellingFree, Some("nope"), Page::default(), "en")
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[test]
    fn search_and_developer_urls_escape_input() {
        let client = client();
        let url = client
            .search_url("photo editor", "apps", Page::default(), "en", "us")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://play.google.com/store/search?q=photo+editor&start=0&num=24&hl=en&gl=us&c=apps"
        );

        let url = client
            .search_url("space", "movies", Page::new(24, 12).unwrap(), "en", "gb")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://play.google.com/store/search?q=space&start=24&num=12&hl=en&gl=gb&c=movies"
        );

        let url = client
            .developer_url("Example & Sons", Page::default(), "fr")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://play.google.com/store/apps/developer?id=Example+%26+Sons&start=0&num=24&hl=fr"
        );
    }

    #[test]
    fn details_url_carries_region() {
        let url = client().details_url("com.example.app", "en", "de").unwrap();
        assert_eq!(
            url.as_str(),
            "https://play.google.com/store/apps/details?id=com.example.app&hl=en&gl=de"
        );
    }

    #[test]
    fn forbidden_names_region_not_found_does_not() {
        match unavailable(StatusCode::FORBIDDEN, "com.example.app", "de") {
            Some(StoreError::Unavailable { package_id, region }) => {
                assert_eq!(package_id, "com.example.app");
                assert_eq!(region.as_deref(), Some("de"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        match unavailable(StatusCode::NOT_FOUND, "com.example.app", "de") {
            Some(StoreError::Unavailable { region, .. }) => assert_eq!(region, None),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(unavailable(StatusCode::INTERNAL_SERVER_ERROR, "com.example.app", "de").is_none());
        assert!(unavailable(StatusCode::OK, "com.example.app", "de").is_none());
    }

    #[test]
    fn generated_user_agent_is_a_timestamp() {
        let value = client().user_agent_value();
        assert!(value.parse::<f64>().is_ok());
    }
}
