use lazy_static::lazy_static;
use regex::Regex;

/// Tokens the ad cards decorate numbers with.
const CURRENCY_TOKENS: [&str; 2] = ["BOB", "USDT"];
const APPROX_MARKER: &str = "≈";

lazy_static! {
    static ref NUMERIC_RUN: Regex = Regex::new(r"[0-9.]+").unwrap();
}

/// Turns card text like `"6.90 BOB"`, `"1,234.56 USDT"` or `"≈ 1000"` into a
/// number.
///
/// Commas are always treated as thousands separators, so decimal-comma input
/// (`"1.234,56"`) comes out wrong. Only the first numeric run is used, which
/// means a range such as `"300 - 1000"` yields `300`. Never panics; anything
/// unparsable is `None`.
pub fn normalize(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    let mut cleaned = text.to_uppercase();
    for token in CURRENCY_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    let cleaned = cleaned.replace(APPROX_MARKER, "").replace(',', "");

    let run = NUMERIC_RUN.find(cleaned.trim())?;
    run.as_str().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_inputs() {
        assert_eq!(normalize("6.90 BOB"), Some(6.90));
        assert_eq!(normalize("1,234.56 USDT"), Some(1234.56));
        assert_eq!(normalize("≈ 1000"), Some(1000.0));
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("N/A"), None);
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(normalize("  6.95  "), Some(6.95));
        assert_eq!(normalize("12.5 usdt"), Some(12.5));
        assert_eq!(normalize("Bs 7,00"), Some(700.0));
    }

    #[test]
    fn test_first_run_wins() {
        assert_eq!(normalize("300 - 1000"), Some(300.0));
        assert_eq!(normalize("Limit 50 BOB"), Some(50.0));
    }

    #[test]
    fn test_malformed_runs() {
        assert_eq!(normalize("1.2.3"), None);
        assert_eq!(normalize("..."), None);
        assert_eq!(normalize("BOB USDT"), None);
    }

    #[test]
    fn test_decimal_comma_is_misread() {
        // "1.234,56" becomes "1.23456" once the comma is dropped
        assert_eq!(normalize("1.234,56"), Some(1.23456));
    }
}
