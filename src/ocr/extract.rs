use anyhow::Result;
use regex::Regex;
use tracing::debug;

/// Pattern for currency-like tokens in the chart legend:
/// - optional leading dollar sign
/// - digits with optional thousands separators: 1,299
/// - exactly two decimal places: .99
const PRICE_PATTERN: &str = r"\$?[\d,]+\.\d{2}";

/// Parses a single matched token, removing `$` and thousands separators.
pub fn parse_price(token: &str) -> Option<f64> {
    let cleaned: String = token.chars().filter(|&c| c != '$' && c != ',').collect();
    cleaned.parse::<f64>().ok()
}

/// Extracts every price-like token from OCR text, sorted ascending.
///
/// Tokens that still fail to parse after cleanup are dropped.
pub fn extract_prices(text: &str) -> Result<Vec<f64>> {
    let price_regex = Regex::new(PRICE_PATTERN)?;

    let mut values: Vec<f64> = price_regex
        .find_iter(text)
        .filter_map(|m| {
            let parsed = parse_price(m.as_str());
            if parsed.is_none() {
                debug!("Discarding unparseable token: {:?}", m.as_str());
            }
            parsed
        })
        .collect();

    values.sort_by(|a, b| a.total_cmp(b));
    Ok(values)
}
