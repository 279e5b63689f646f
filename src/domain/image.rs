//! Conversion between CDN image URLs and the opaque identifiers embedded in them.
//!
//! `https://lh3.googleusercontent.com/AbC-123_x=w300-h300` carries the
//! identifier `AbC-123_x`; any size of the same image can be rebuilt from it.

use once_cell::sync::Lazy;
use regex::Regex;

pub const IMAGE_HOST: &str = "lh3.googleusercontent.com";

static IMAGE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:https?:)?//[^/]+/([a-zA-Z0-9\-_]+)=.+$").unwrap());

/// Returns the identifier embedded in `url`, or `url` unchanged when it does
/// not look like a sized CDN image URL.
pub fn decode(url: &str) -> String {
    match IMAGE_URL.captures(url).and_then(|caps| caps.get(1)) {
        Some(id) => id.as_str().to_string(),
        None => url.to_string(),
    }
}

/// Builds a CDN URL for `identifier`. A zero dimension asks for the source size.
pub fn encode(identifier: &str, width: u32, height: u32) -> String {
    format!("https://{IMAGE_HOST}/{identifier}=w{width}-h{height}")
}

/// Whether `value` is a decoded identifier rather than a URL.
pub fn is_identifier(value: &str) -> bool {
    !value.contains('/')
}
