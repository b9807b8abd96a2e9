//! Best-effort split of a free-text US-style address ("…, City, ST 12345").
//!
//! Not a postal validator. Anything that does not end in a two-letter state
//! and a 5 or 9 digit ZIP is decomposed positionally and may come out wrong.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{2})\s*(\d{5}(?:-\d{4})?)$").expect("state/zip pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressParts {
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

pub fn decompose_address(raw: &str) -> AddressParts {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return AddressParts::default();
    }
    // Empty segments keep their position, so a stray comma can shift the city.
    let parts: Vec<&str> = normalized.split(',').map(str::trim).collect();

    // A single segment never carries a city, even if it looks like "ST 12345".
    let (last, head) = match parts.split_last() {
        Some((last, head)) if !head.is_empty() => (*last, head),
        _ => {
            return AddressParts {
                address_line1: normalized,
                ..AddressParts::default()
            }
        }
    };

    if let Some(caps) = STATE_ZIP.captures(last) {
        let city_idx = head.len() - 1;
        return AddressParts {
            address_line1: head[..city_idx].join(", "),
            city: head[city_idx].to_string(),
            state: caps[1].to_string(),
            zip_code: caps[2].to_string(),
        };
    }

    let city_idx = parts.len() - 2;
    let line1 = parts
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != city_idx)
        .map(|(_, p)| *p)
        .collect::<Vec<_>>()
        .join(", ");

    AddressParts {
        address_line1: line1,
        city: parts[city_idx].to_string(),
        state: String::new(),
        zip_code: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_us_address() {
        let parts = decompose_address("L1, City, ST 12345");
        assert_eq!(parts.address_line1, "L1");
        assert_eq!(parts.city, "City");
        assert_eq!(parts.state, "ST");
        assert_eq!(parts.zip_code, "12345");
    }

    #[test]
    fn test_zip_plus_four() {
        let parts = decompose_address("L1, City, ST 12345-6789");
        assert_eq!(parts.address_line1, "L1");
        assert_eq!(parts.city, "City");
        assert_eq!(parts.state, "ST");
        assert_eq!(parts.zip_code, "12345-6789");
    }

    #[test]
    fn test_state_and_zip_without_space() {
        let parts = decompose_address("9 Elm Rd, Raleigh, NC27606");
        assert_eq!(parts.state, "NC");
        assert_eq!(parts.zip_code, "27606");
        assert_eq!(parts.city, "Raleigh");
    }

    #[test]
    fn test_multi_part_street_is_rejoined() {
        let parts = decompose_address("Apt 4,  100   Main St, Springfield, IL 62701");
        assert_eq!(parts.address_line1, "Apt 4, 100 Main St");
        assert_eq!(parts.city, "Springfield");
        assert_eq!(parts.state, "IL");
        assert_eq!(parts.zip_code, "62701");
    }

    #[test]
    fn test_no_commas_is_all_line1() {
        let parts = decompose_address("  742 Evergreen Terrace  ");
        assert_eq!(parts.address_line1, "742 Evergreen Terrace");
        assert!(parts.city.is_empty());
        assert!(parts.state.is_empty());
        assert!(parts.zip_code.is_empty());
    }

    #[test]
    fn test_without_state_zip_uses_second_to_last_as_city() {
        let parts = decompose_address("100 Main St, Springfield, USA");
        assert_eq!(parts.city, "Springfield");
        assert_eq!(parts.address_line1, "100 Main St, USA");
        assert!(parts.state.is_empty());
        assert!(parts.zip_code.is_empty());
    }

    #[test]
    fn test_three_digit_zip_is_not_state_zip() {
        let parts = decompose_address("100 Main St, Springfield, IL 627");
        assert_eq!(parts.city, "Springfield");
        assert!(parts.state.is_empty());
        assert!(parts.zip_code.is_empty());
    }

    #[test]
    fn test_single_segment_state_zip_stays_line1() {
        let parts = decompose_address("NY 10001");
        assert_eq!(parts.address_line1, "NY 10001");
        assert!(parts.state.is_empty());
        assert!(parts.zip_code.is_empty());
    }

    #[test]
    fn test_state_zip_with_only_city() {
        let parts = decompose_address("Springfield, IL 62701");
        assert_eq!(parts.city, "Springfield");
        assert_eq!(parts.state, "IL");
        assert!(parts.address_line1.is_empty());
    }

    #[test]
    fn test_trailing_comma_keeps_position() {
        let parts = decompose_address("100 Main St, Springfield,");
        assert_eq!(parts.city, "Springfield");
        assert_eq!(parts.address_line1, "100 Main St, ");
        assert!(parts.state.is_empty());
    }

    #[test]
    fn test_empty_middle_segment_stays_in_line1() {
        let parts = decompose_address("L1, , City, ST 12345");
        assert_eq!(parts.address_line1, "L1, ");
        assert_eq!(parts.city, "City");
        assert_eq!(parts.state, "ST");
        assert_eq!(parts.zip_code, "12345");
    }

    #[test]
    fn test_empty_address() {
        assert_eq!(decompose_address("   "), AddressParts::default());
    }
}
