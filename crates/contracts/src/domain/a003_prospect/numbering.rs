//! Contract number arithmetic.
//!
//! Contract numbers are decimal strings zero-padded to four digits. The next
//! number is one past the highest *numeric value* seen, never the value of
//! the most recently inserted row.

pub const CONTRACT_NUMBER_WIDTH: usize = 4;

/// Counter name under which the last issued contract number is kept
pub const CONTRACT_SEQUENCE: &str = "prospect_contract_number";

pub fn format_contract_number(value: u64) -> String {
    format!("{:0width$}", value, width = CONTRACT_NUMBER_WIDTH)
}

/// Numeric value of a stored contract number; `None` for non-numeric values
pub fn parse_contract_number(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

/// Stored form of a hand-entered number: numeric values are zero-padded so
/// `"5"`, `"05"` and `"0005"` are the same contract number
pub fn canonical_contract_number(raw: &str) -> String {
    match parse_contract_number(raw) {
        Some(value) => format_contract_number(value),
        None => raw.trim().to_string(),
    }
}

/// Highest numeric contract number, ignoring values that do not parse
pub fn highest_contract_number<'a, I>(existing: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a str>,
{
    existing.into_iter().filter_map(parse_contract_number).max()
}

/// Next value to issue given the stored numbers and the counter's last value.
///
/// Whichever is higher wins, so numbers entered by hand or backfilled out of
/// order are never reissued.
pub fn next_contract_value<'a, I>(existing: I, counter: u64) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    highest_contract_number(existing).unwrap_or(0).max(counter) + 1
}
