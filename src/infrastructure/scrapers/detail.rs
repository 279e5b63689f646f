use super::listing::card_ids;
use super::{
    find_first, parsed, required, text_of, FieldFailure, FieldIssue, FieldResult, FieldScope,
    OrMissing, Selectors,
};
use crate::config::{ExtractOptions, DEFAULT_BASE_URL};
use crate::domain::{image, AppRecord, PublishDate};
use crate::error::{Result, StoreError};
use crate::utils::{normalize_install_range, parse_count, parse_date, parse_decimal, parse_size_bytes};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static REDIRECT_TARGET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]q=([^&]+)").unwrap());

pub struct DetailExtractor {
    selectors: Selectors,
    options: ExtractOptions,
}

impl DetailExtractor {
    pub fn new(options: ExtractOptions) -> Result<Self> {
        Ok(Self {
            selectors: Selectors::new()?,
            options,
        })
    }

    pub fn extract(&self, document: &Html, source_url: &str, package_id: &str) -> Result<AppRecord> {
        self.extract_with_diagnostics(document, source_url, package_id)
            .map(|(record, _)| record)
    }

    /// Like [`extract`](Self::extract), also returning every optional field
    /// that was left out and why.
    pub fn extract_with_diagnostics(
        &self,
        document: &Html,
        source_url: &str,
        package_id: &str,
    ) -> Result<(AppRecord, Vec<FieldIssue>)> {
        if package_id.trim().is_empty() {
            return Err(StoreError::extraction("package_id", "empty package id"));
        }

        let s = &self.selectors;

        let title = required("title", self.text(document, &s.title))?;
        let category_name = required("category_name", self.text(document, &s.genre))?;
        let category_id = required(
            "category_id",
            self.attr(document, &s.category_link, "href")
                .and_then(|href| parsed(last_path_segment(&href), &href)),
        )?;
        let logo_image_id = required(
            "logo_image_id",
            self.attr(document, &s.cover_image, "src")
                .map(|src| self.image_ref(&src)),
        )?;
        let price = required("price", self.attr(document, &s.price, "content"))?;
        let developer_name = required("developer_name", self.text(document, &s.author_link))?;
        let developer_id = required(
            "developer_id",
            self.attr(document, &s.author_url, "content")
                .and_then(|url| parsed(query_param(&url, source_url, "id"), &url)),
        )?;
        let android_requirement =
            required("android_requirement", self.text(document, &s.operating_systems))?;

        let mut scope = FieldScope::default();

        let description = scope.attempt("description", || self.description(document));
        let recent_changes = scope.attempt("recent_changes", || {
            let changes: Vec<String> = document
                .select(&s.recent_change)
                .map(|change| text_of(change).trim().to_string())
                .collect();
            if changes.is_empty() {
                Err(FieldFailure::Missing)
            } else {
                Ok(changes)
            }
        });
        let date_published =
            scope.attempt("date_published", || self.date_published(document));
        let developer_email = scope.attempt("developer_email", || {
            let href = self.attr(document, &s.mail_link, "href")?;
            parsed(href.strip_prefix("mailto:").map(str::to_string), &href)
        });
        let content_rating = scope.attempt("content_rating", || self.content_rating(document));
        let developer_website = scope.attempt("developer_website", || {
            let href = self.attr(document, &s.dev_link, "href")?;
            parsed(redirect_target(&href), &href)
        });
        let developer_address =
            scope.attempt("developer_address", || self.text(document, &s.physical_address));
        let rating_pair = scope.attempt("rating", || self.rating(document));
        let reviews_num = scope.attempt("reviews_num", || {
            let text = self.text(document, &s.reviews_num)?;
            parsed(parse_count(&text), &text)
        });
        let version = scope.attempt("version", || self.text(document, &s.version));
        let size_bytes = scope.attempt("size_bytes", || {
            let text = self.text(document, &s.file_size)?;
            parsed(parse_size_bytes(&text), &text)
        });
        let install_count_range = scope.attempt("install_count_range", || {
            let text = self.text(document, &s.installs)?;
            parsed(normalize_install_range(&text), &text)
        });
        let similar_package_ids = scope.attempt("similar_package_ids", || {
            find_first(document, &s.rec_cluster)
                .map(card_ids)
                .or_missing()
        });

        let screenshots = document
            .select(&s.screenshot)
            .filter_map(|img| img.value().attr("src"))
            .map(|src| self.image_ref(src))
            .collect();

        let (rating, rating_histogram) = match rating_pair {
            Some((rating, histogram)) => (Some(rating), Some(histogram)),
            None => (None, None),
        };

        let record = AppRecord {
            package_id: package_id.to_string(),
            url: source_url.to_string(),
            title,
            category_name,
            category_id,
            logo_image_id,
            price,
            developer_name,
            developer_id,
            android_requirement,
            description,
            recent_changes,
            date_published,
            developer_email,
            developer_website,
            developer_address,
            content_rating,
            version,
            size_bytes,
            install_count_range,
            rating,
            rating_histogram,
            reviews_num,
            similar_package_ids,
            top_developer: document.select(&s.top_developer).next().is_some(),
            in_app_payments: document.select(&s.in_app_payments).next().is_some(),
            screenshots,
        };

        let issues = scope.into_issues();
        debug!(
            "Extracted {} with {} optional fields left out",
            package_id,
            issues.len()
        );

        Ok((record, issues))
    }

    /// Trimmed text of the first match. Blank text counts as unparseable.
    fn text(&self, document: &Html, selector: &Selector) -> FieldResult<String> {
        let text = text_of(find_first(document, selector).or_missing()?);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FieldFailure::Unparseable(text));
        }
        Ok(trimmed.to_string())
    }

    fn attr(&self, document: &Html, selector: &Selector, name: &str) -> FieldResult<String> {
        find_first(document, selector)
            .and_then(|element| element.value().attr(name))
            .map(str::to_string)
            .or_missing()
    }

    fn image_ref(&self, src: &str) -> String {
        if self.options.normalize_images {
            image::decode(src)
        } else {
            src.to_string()
        }
    }

    /// Serialized child nodes of the description body, one per line.
    fn description(&self, document: &Html) -> FieldResult<String> {
        let container = find_first(document, &self.selectors.description).or_missing()?;
        let body = container
            .select(&self.selectors.description_body)
            .next()
            .or_missing()?;

        let parts: Vec<String> = body
            .children()
            .filter_map(|child| match ElementRef::wrap(child) {
                Some(element) => Some(element.html()),
                None => child
                    .value()
                    .as_text()
                    .map(|text| String::from(&**text))
                    .filter(|text| !text.trim().is_empty()),
            })
            .collect();

        if parts.is_empty() {
            return Err(FieldFailure::Missing);
        }
        Ok(parts.join("\n"))
    }

    fn date_published(&self, document: &Html) -> FieldResult<PublishDate> {
        let text = self.text(document, &self.selectors.date_published)?;
        if !self.options.parse_dates {
            return Ok(PublishDate::Raw(text));
        }
        parsed(parse_date(&text), &text).map(PublishDate::Parsed)
    }

    /// Badge alt text, falling back to the rating title.
    fn content_rating(&self, document: &Html) -> FieldResult<String> {
        let s = &self.selectors;
        let badge = self
            .attr(document, &s.content_rating_badge, "alt")
            .and_then(|alt| {
                let alt = alt.trim();
                if alt.is_empty() {
                    Err(FieldFailure::Unparseable(alt.to_string()))
                } else {
                    Ok(alt.to_string())
                }
            });

        badge.or_else(|badge_failure| {
            debug!("Content rating badge unusable ({badge_failure}), trying rating title");
            self.text(document, &s.content_rating_title).map_err(|failure| {
                debug!("No known content rating markup on page ({failure})");
                failure
            })
        })
    }

    /// Score plus the 1 to 5 star histogram. Either missing drops both.
    fn rating(&self, document: &Html) -> FieldResult<(f32, [u64; 5])> {
        let s = &self.selectors;
        let text = self.text(document, &s.score)?;
        let rating = parsed(
            parse_decimal(&text).filter(|value| (0.0..=5.0).contains(value)),
            &text,
        )?;

        let histogram = find_first(document, &s.rating_histogram).or_missing()?;
        let mut counts = [0u64; 5];
        for (count, bar) in counts.iter_mut().zip(&s.histogram_bars) {
            let text = text_of(histogram.select(bar).next().or_missing()?);
            *count = parsed(parse_count(&text), &text)?;
        }

        Ok((rating, counts))
    }
}

/// `/store/apps/category/GAME_PUZZLE` yields `GAME_PUZZLE`.
fn last_path_segment(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Value of `name` in the query of `url`. Relative URLs resolve against
/// `base`, or against the storefront root when `base` is not absolute.
fn query_param(url: &str, base: &str, name: &str) -> Option<String> {
    let base = Url::parse(base)
        .or_else(|_| Url::parse(DEFAULT_BASE_URL))
        .ok()?;
    let parsed = base.join(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Destination of an outbound `/url?q=...&sa=...` redirect link.
fn redirect_target(href: &str) -> Option<String> {
    REDIRECT_TARGET
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|target| target.as_str().to_string())
}

/// Builds a record from a detail page with the default options.
pub fn extract_detail(document: &Html, source_url: &str, package_id: &str) -> Result<AppRecord> {
    DetailExtractor::new(ExtractOptions::default())?.extract(document, source_url, package_id)
}
