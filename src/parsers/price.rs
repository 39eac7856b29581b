use once_cell::sync::Lazy;
use regex::Regex;

static PRICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)")
        .expect("Invalid price regex")
});

/// Extract the first USD amount from price text as a plain number
/// (`"$1,249.00"` becomes `"1249.00"`). Empty when no amount is present.
pub fn parse_price(price_text: &str) -> String {
    PRICE_REGEX
        .find(price_text)
        .map(|m| m.as_str().replace(',', ""))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_currency_and_thousands_separators() {
        assert_eq!(parse_price("$1,249.00"), "1249.00");
        assert_eq!(parse_price(" USD 89.5 "), "89.5");
    }

    #[test]
    fn sale_range_takes_first_amount() {
        assert_eq!(parse_price("$199.00 – $249.00"), "199.00");
    }

    #[test]
    fn empty_without_amount() {
        assert_eq!(parse_price("Call for pricing"), "");
    }
}
