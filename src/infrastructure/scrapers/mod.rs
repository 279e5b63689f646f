use crate::error::{Result, StoreError};
use scraper::{ElementRef, Html, Selector};
use std::fmt;

pub(crate) mod detail;
pub(crate) mod listing;

fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| StoreError::Selector(format!("{css}: {e}")))
}

/// Compiled selectors for one storefront page layout.
pub(crate) struct Selectors {
    pub(crate) rec_cluster: Selector,

    pub(crate) title: Selector,
    pub(crate) description: Selector,
    pub(crate) description_body: Selector,
    pub(crate) genre: Selector,
    pub(crate) category_link: Selector,
    pub(crate) cover_image: Selector,
    pub(crate) price: Selector,
    pub(crate) author_link: Selector,
    pub(crate) author_url: Selector,
    pub(crate) recent_change: Selector,
    pub(crate) date_published: Selector,
    pub(crate) mail_link: Selector,
    pub(crate) top_developer: Selector,
    pub(crate) in_app_payments: Selector,
    pub(crate) content_rating_badge: Selector,
    pub(crate) content_rating_title: Selector,
    pub(crate) dev_link: Selector,
    pub(crate) physical_address: Selector,
    pub(crate) score: Selector,
    pub(crate) rating_histogram: Selector,
    pub(crate) histogram_bars: [Selector; 5],
    pub(crate) reviews_num: Selector,
    pub(crate) version: Selector,
    pub(crate) file_size: Selector,
    pub(crate) installs: Selector,
    pub(crate) operating_systems: Selector,
    pub(crate) screenshot: Selector,
}

impl Selectors {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            rec_cluster: compile("div.rec-cluster")?,

            title: compile("div.document-title")?,
            description: compile(r#"div[itemprop="description"]"#)?,
            description_body: compile("div")?,
            genre: compile(r#"span[itemprop="genre"]"#)?,
            category_link: compile("a.category")?,
            cover_image: compile("img.cover-image")?,
            price: compile(r#"meta[itemprop="price"]"#)?,
            author_link: compile(r#"div[itemprop="author"] a"#)?,
            author_url: compile(r#"div[itemprop="author"] meta[itemprop="url"]"#)?,
            recent_change: compile("div.recent-change")?,
            date_published: compile(r#"div.content[itemprop="datePublished"]"#)?,
            mail_link: compile(r#"a[href^="mailto"]"#)?,
            top_developer: compile(r#"meta[itemprop="topDeveloperBadgeUrl"]"#)?,
            in_app_payments: compile("div.inapp-msg")?,
            content_rating_badge: compile("img.content-rating-badge")?,
            content_rating_title: compile("div.content-rating-title")?,
            dev_link: compile("a.dev-link")?,
            physical_address: compile("div.physical-address")?,
            score: compile("div.score")?,
            rating_histogram: compile("div.rating-histogram")?,
            histogram_bars: [
                compile("div.one span.bar-number")?,
                compile("div.two span.bar-number")?,
                compile("div.three span.bar-number")?,
                compile("div.four span.bar-number")?,
                compile("div.five span.bar-number")?,
            ],
            reviews_num: compile("span.reviews-num")?,
            version: compile(r#"div[itemprop="softwareVersion"]"#)?,
            file_size: compile(r#"div[itemprop="fileSize"]"#)?,
            installs: compile(r#"div[itemprop="numDownloads"]"#)?,
            operating_systems: compile(r#"div[itemprop="operatingSystems"]"#)?,
            screenshot: compile(r#"img[itemprop="screenshot"]"#)?,
        })
    }
}

pub(crate) fn find_first<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Why an optional field was left out of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFailure {
    /// The selector matched nothing.
    Missing,
    /// The element was found but its content could not be read.
    Unparseable(String),
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldFailure::Missing => f.write_str("not present on page"),
            FieldFailure::Unparseable(value) => write!(f, "could not parse {value:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub reason: FieldFailure,
}

pub(crate) type FieldResult<T> = std::result::Result<T, FieldFailure>;

pub(crate) trait OrMissing<T> {
    fn or_missing(self) -> FieldResult<T>;
}

impl<T> OrMissing<T> for Option<T> {
    fn or_missing(self) -> FieldResult<T> {
        self.ok_or(FieldFailure::Missing)
    }
}

pub(crate) fn parsed<T>(value: Option<T>, raw: &str) -> FieldResult<T> {
    value.ok_or_else(|| FieldFailure::Unparseable(raw.trim().to_string()))
}

/// Collects optional-field failures for one extraction. Each `attempt` is
/// its own scope: a failure there leaves only that field unset.
#[derive(Debug, Default)]
pub(crate) struct FieldScope {
    issues: Vec<FieldIssue>,
}

impl FieldScope {
    pub(crate) fn attempt<T>(
        &mut self,
        field: &'static str,
        extract: impl FnOnce() -> FieldResult<T>,
    ) -> Option<T> {
        match extract() {
            Ok(value) => Some(value),
            Err(reason) => {
                self.issues.push(FieldIssue { field, reason });
                None
            }
        }
    }

    pub(crate) fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }
}

/// Required fields have no scope: a miss fails the whole record.
pub(crate) fn required<T>(field: &'static str, value: FieldResult<T>) -> Result<T> {
    value.map_err(|failure| match failure {
        FieldFailure::Missing => StoreError::extraction(field, "no matching element"),
        FieldFailure::Unparseable(raw) => StoreError::extraction(field, raw),
    })
}
