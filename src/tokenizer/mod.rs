//! Tokenizer and normalizer (verb module)
//!
//! Pure helpers over prompt text: word splitting, "top N" limits and
//! `<field> is <value>` filter extraction.

use std::sync::LazyLock;
use regex::Regex;
use crate::request::FilterKey;

static TOP_N: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)top\s+(\d+)").expect("top-N pattern is valid"));

static ANY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("number pattern is valid"));

// `delivery mode X`, `delivery mode is X`, `delivery is X`, `delivery: X`
static DELIVERY_MODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)delivery\s*(?:mode\s*(?:is\b|=|:)|mode\s+|is\b|=|:)\s*([a-zA-Z\s]+)")
        .expect("delivery mode pattern is valid")
});

static FIELD_FILTERS: LazyLock<Vec<(FilterKey, Regex)>> = LazyLock::new(|| {
    [FilterKey::Industry, FilterKey::Region, FilterKey::Size, FilterKey::Category, FilterKey::Stage]
        .into_iter()
        .filter_map(|key| filter_pattern(key.as_str()).map(|re| (key, re)))
        .collect()
});

/// Lowercase, strip punctuation and split on whitespace
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Extract a row limit from a prompt
///
/// Prefers an explicit "top N"; otherwise takes the first number anywhere in
/// the text. Numbers too large for `u32` count as absent.
pub fn extract_limit(text: &str) -> Option<u32> {
    if let Some(caps) = TOP_N.captures(text) {
        return caps.get(1).and_then(|m| m.as_str().parse().ok());
    }
    ANY_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract the value of `<filter_name> is <value>` (also `=` or `:`)
pub fn extract_filter(text: &str, filter_name: &str) -> Option<String> {
    let re = filter_pattern(filter_name)?;
    capture_value(&re, text)
}

/// Extract a delivery-mode filter value
pub fn extract_delivery_mode(text: &str) -> Option<String> {
    capture_value(&DELIVERY_MODE, text)
}

/// Evaluate every explicit field filter against the text, in a fixed order
pub fn extract_field_filters(text: &str) -> Vec<(FilterKey, String)> {
    let mut found: Vec<(FilterKey, String)> = FIELD_FILTERS
        .iter()
        .filter_map(|(key, re)| capture_value(re, text).map(|v| (*key, v)))
        .collect();
    if let Some(mode) = extract_delivery_mode(text) {
        // keep delivery mode ahead of stage, matching the field order above
        let at = found
            .iter()
            .position(|(k, _)| *k == FilterKey::Stage)
            .unwrap_or(found.len());
        found.insert(at, (FilterKey::DeliveryMode, mode));
    }
    found
}

fn filter_pattern(filter_name: &str) -> Option<Regex> {
    let pattern = format!(
        r"(?i){}\s*(?:is\b|=|:)\s*([a-zA-Z\s]+)",
        regex::escape(filter_name)
    );
    Regex::new(&pattern).ok()
}

fn capture_value(re: &Regex, text: &str) -> Option<String> {
    let value = re.captures(text)?.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Show me the TOP-5 clients, by revenue!"),
            vec!["show", "me", "the", "top", "5", "clients", "by", "revenue"]
        );
        assert!(tokenize("  ?!  ").is_empty());
    }

    #[test]
    fn test_extract_limit_top_n() {
        assert_eq!(extract_limit("show me the top 7 clients"), Some(7));
        assert_eq!(extract_limit("In 2024 show the TOP 3 programs"), Some(3));
    }

    #[test]
    fn test_extract_limit_first_number() {
        assert_eq!(extract_limit("list 12 programs from 2023"), Some(12));
    }

    #[test]
    fn test_extract_limit_none() {
        assert_eq!(extract_limit("show me clients"), None);
        assert_eq!(extract_limit("top 99999999999 clients"), None);
    }

    #[test]
    fn test_extract_filter() {
        assert_eq!(extract_filter("industry is Healthcare", "industry"), Some("Healthcare".to_string()));
        assert_eq!(extract_filter("clients where Region: North America", "region"), Some("North America".to_string()));
        assert_eq!(extract_filter("size=Large", "size"), Some("Large".to_string()));
        assert_eq!(extract_filter("top clients by industry", "industry"), None);
    }

    #[test]
    fn test_extract_filter_requires_whole_is() {
        assert_eq!(extract_filter("size isolated", "size"), None);
        assert_eq!(extract_filter("size is Small", "size"), Some("Small".to_string()));
    }

    #[test]
    fn test_extract_delivery_mode() {
        assert_eq!(extract_delivery_mode("programs with delivery mode Virtual"), Some("Virtual".to_string()));
        assert_eq!(extract_delivery_mode("delivery mode is Hybrid"), Some("Hybrid".to_string()));
        assert_eq!(extract_delivery_mode("delivery is In"), Some("In".to_string()));
        assert_eq!(extract_delivery_mode("compare revenue for different delivery modes"), None);
    }

    #[test]
    fn test_extract_field_filters_order() {
        let found = extract_field_filters("stage is Proposal and delivery mode Virtual");
        let keys: Vec<FilterKey> = found.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![FilterKey::DeliveryMode, FilterKey::Stage]);
        assert_eq!(found[0].1, "Virtual");
    }
}
