use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y-%m-%d",
    "%d.%m.%Y",
];

static ORDINAL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)(st|nd|rd|th)\b").unwrap());

/// Folds compatibility characters (no-break spaces, narrow no-break spaces,
/// full-width digits) into their plain forms and trims.
pub fn normalize_text(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_string()
}

/// Parses a displayed count such as `"1,234"`, `"1 234"` or `"1.234"`.
pub fn parse_count(text: &str) -> Option<u64> {
    let digits: String = normalize_text(text)
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | ' ' | '\''))
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parses a decimal written with either separator, e.g. `"4,3"`.
pub fn parse_decimal(text: &str) -> Option<f32> {
    normalize_text(text).replace(',', ".").parse().ok()
}

/// Displayed size like `"12,5M"` in whole bytes. The unit character is
/// dropped and the value is read as decimal megabytes.
pub fn parse_size_bytes(text: &str) -> Option<u64> {
    let normalized = normalize_text(text).replace(',', ".");
    let mut chars = normalized.chars();
    chars.next_back()?;
    let megabytes: f64 = chars.as_str().trim().parse().ok()?;
    if !megabytes.is_finite() || megabytes < 0.0 {
        return None;
    }
    Some((megabytes * 1_000_000.0).floor() as u64)
}

/// `"10,000 – 50,000"` becomes `"10000 - 50000"`; an open-ended
/// `"10,000+"` becomes `"10000+"`.
pub fn normalize_install_range(text: &str) -> Option<String> {
    let normalized = normalize_text(text);
    match normalized.split_once(['\u{2013}', '-']) {
        Some((low, high)) => {
            let low = parse_count(low.trim())?;
            let high = parse_count(high.trim())?;
            Some(format!("{low} - {high}"))
        }
        None => {
            let (count, open_ended) = match normalized.strip_suffix('+') {
                Some(count) => (count, true),
                None => (normalized.as_str(), false),
            };
            let count = parse_count(count)?;
            Some(if open_ended {
                format!("{count}+")
            } else {
                count.to_string()
            })
        }
    }
}

/// Parses free-text publish dates such as `"March 5, 2015"` or `"5 March 2015"`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let cleaned = normalize_text(text);
    let cleaned = ORDINAL_SUFFIX.replace_all(&cleaned, "$1");
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&cleaned, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accept_locale_separators() {
        assert_eq!(parse_count("1,234"), Some(1234));
        assert_eq!(parse_count("1\u{a0}234"), Some(1234));
        assert_eq!(parse_count("1\u{202f}234"), Some(1234));
        assert_eq!(parse_count("1.234.567"), Some(1_234_567));
        assert_eq!(parse_count(" 17 "), Some(17));
    }

    #[test]
    fn counts_reject_text() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("n/a"), None);
    }

    #[test]
    fn decimals_accept_comma() {
        assert_eq!(parse_decimal("4,3"), Some(4.3));
        assert_eq!(parse_decimal("4.5"), Some(4.5));
        assert_eq!(parse_decimal("four"), None);
    }

    #[test]
    fn size_is_decimal_megabytes() {
        assert_eq!(parse_size_bytes("12,5M"), Some(12_500_000));
        assert_eq!(parse_size_bytes("8.0M"), Some(8_000_000));
        assert_eq!(parse_size_bytes(" 2M "), Some(2_000_000));
        assert_eq!(parse_size_bytes("Varies with device"), None);
        assert_eq!(parse_size_bytes(""), None);
    }

    #[test]
    fn install_range_is_normalized() {
        assert_eq!(
            normalize_install_range("10,000 \u{2013} 50,000").as_deref(),
            Some("10000 - 50000")
        );
        assert_eq!(
            normalize_install_range("1\u{a0}000\u{a0}000 - 5\u{a0}000\u{a0}000").as_deref(),
            Some("1000000 - 5000000")
        );
        assert_eq!(normalize_install_range("lots"), None);
    }

    #[test]
    fn open_ended_install_count_keeps_plus() {
        assert_eq!(normalize_install_range("10,000+").as_deref(), Some("10000+"));
        assert_eq!(
            normalize_install_range(" 1\u{a0}000\u{a0}000+ ").as_deref(),
            Some("1000000+")
        );
        assert_eq!(normalize_install_range("500").as_deref(), Some("500"));
        assert_eq!(normalize_install_range("+"), None);
    }

    #[test]
    fn dates_in_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2015, 3, 5);
        assert_eq!(parse_date("March 5, 2015"), expected);
        assert_eq!(parse_date("Mar 5, 2015"), expected);
        assert_eq!(parse_date("5 March 2015"), expected);
        assert_eq!(parse_date("2015-03-05"), expected);
        assert_eq!(parse_date("March 5th, 2015"), expected);
        assert_eq!(parse_date("sometime"), None);
    }
}
