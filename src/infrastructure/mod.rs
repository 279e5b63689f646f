mod clients;
mod scrapers;

pub use clients::play_store::PlayStoreClient;
pub use scrapers::{
    detail::{extract_detail, DetailExtractor},
    listing::{extract_listing, ListingExtractor},
    FieldFailure, FieldIssue,
};
