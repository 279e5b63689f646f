//! Storefront metadata scraper: application listings and per-application records
//! extracted from Play Store HTML pages.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod services;
pub mod utils;

pub use config::{ExtractOptions, StoreConfig};
pub use domain::{image, AppRecord, Collection, ListingResult, Page, PublishDate};
pub use error::{Result, StoreError};
pub use infrastructure::{
    extract_detail, extract_listing, DetailExtractor, FieldFailure, FieldIssue, ListingExtractor,
};
pub use services::StoreService;
