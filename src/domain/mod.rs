mod app;
pub mod image;
mod listing;

pub use app::{AppRecord, PublishDate};
pub use listing::{category_path, Collection, ListingResult, Page, CATEGORIES};
