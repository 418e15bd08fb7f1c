use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9][0-9\s]*)zł").unwrap());
static MILEAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9][0-9\s]*)km").unwrap());

const CURRENCY_TOKENS: &[&str] = &["zł", "PLN"];

/// Parse a free-form price such as `"45 000 zł"` or `"12 500 PLN"`.
///
/// Tries the digits-before-`zł` pattern first and falls back to stripping
/// currency tokens and whitespace from the whole fragment. Zero is a valid
/// parse here; rejecting it is the caller's decision.
pub fn parse_price(text: &str) -> Result<u32, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyPrice);
    }
    match price_before_currency(text) {
        Some(result) => result,
        None => price_stripped(text),
    }
}

/// Primary stage: a digit run (spaces and NBSP allowed) directly before `zł`.
/// `None` when the pattern does not occur at all.
pub fn price_before_currency(text: &str) -> Option<Result<u32, ParseError>> {
    let caps = PRICE_RE.captures(text)?;
    Some(parse_digits(&caps[1]).ok_or_else(|| ParseError::InvalidPrice {
        text: text.to_string(),
    }))
}

/// Fallback stage: drop `zł`, `PLN` and all whitespace, parse what is left.
pub fn price_stripped(text: &str) -> Result<u32, ParseError> {
    let mut rest = text.to_string();
    for token in CURRENCY_TOKENS {
        rest = rest.replace(token, "");
    }
    parse_digits(&rest).ok_or_else(|| ParseError::InvalidPrice {
        text: text.to_string(),
    })
}

/// Parse a mileage such as `"123 456 km"`.
pub fn parse_mileage(text: &str) -> Result<u32, ParseError> {
    let caps = MILEAGE_RE
        .captures(text)
        .ok_or_else(|| ParseError::MileageNotFound {
            text: text.to_string(),
        })?;
    parse_digits(&caps[1]).ok_or_else(|| ParseError::InvalidMileage {
        text: text.to_string(),
    })
}

/// Strip every whitespace char (NBSP included) and parse as unsigned.
fn parse_digits(raw: &str) -> Option<u32> {
    let clean: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if clean.is_empty() || !clean.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    clean.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_with_spaces_and_zloty() {
        assert_eq!(parse_price("45 000 zł"), Ok(45000));
    }

    #[test]
    fn price_with_nbsp_and_pln() {
        assert_eq!(parse_price("12\u{a0}500 PLN"), Ok(12500));
    }

    #[test]
    fn price_with_nbsp_before_zloty() {
        assert_eq!(parse_price("89\u{a0}900\u{a0}zł"), Ok(89900));
        assert_eq!(parse_price("Cena: 103 500 zł brutto"), Ok(103500));
    }

    #[test]
    fn price_not_a_number() {
        assert!(matches!(
            parse_price("N/A"),
            Err(ParseError::InvalidPrice { .. })
        ));
        assert!(matches!(
            parse_price("Zapytaj o cenę"),
            Err(ParseError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn price_empty() {
        assert_eq!(parse_price(""), Err(ParseError::EmptyPrice));
        assert_eq!(parse_price(" \u{a0} "), Err(ParseError::EmptyPrice));
    }

    #[test]
    fn price_zero_is_a_valid_parse() {
        assert_eq!(parse_price("0 zł"), Ok(0));
    }

    #[test]
    fn primary_stage_only_fires_on_zloty() {
        assert_eq!(price_before_currency("45 000 zł"), Some(Ok(45000)));
        assert_eq!(price_before_currency("45 000 PLN"), None);
        assert_eq!(price_before_currency("do negocjacji zł"), None);
    }

    #[test]
    fn primary_stage_overflow_is_an_error() {
        assert!(matches!(
            price_before_currency("99 999 999 999 zł"),
            Some(Err(ParseError::InvalidPrice { .. }))
        ));
    }

    #[test]
    fn fallback_stage_strips_tokens() {
        assert_eq!(price_stripped("PLN 7 300"), Ok(7300));
        assert_eq!(price_stripped("7300zł"), Ok(7300));
        assert!(price_stripped("PLN").is_err());
    }

    #[test]
    fn mileage_with_spaces() {
        assert_eq!(parse_mileage("123 456 km"), Ok(123456));
        assert_eq!(parse_mileage("98\u{a0}000\u{a0}km"), Ok(98000));
        assert_eq!(parse_mileage("15km"), Ok(15));
    }

    #[test]
    fn mileage_missing() {
        let err = parse_mileage("brak danych").unwrap_err();
        assert!(matches!(err, ParseError::MileageNotFound { .. }));
        assert!(err.to_string().contains("mileage not found"));
        assert!(matches!(
            parse_mileage(""),
            Err(ParseError::MileageNotFound { .. })
        ));
    }
}
