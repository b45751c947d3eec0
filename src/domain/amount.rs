//! Amount parsing and currency rendering.
//!
//! Source amounts are locale-formatted strings such as `"₱50,000,000"` or
//! `"1,234.50"`. Anything that does not parse resolves to `None`.

/// Characters used as thousands separators in the source sheets.
const THOUSANDS_SEPARATORS: &[char] = &[',', '\'', '\u{a0}', '\u{2009}', '\u{202f}'];

/// Currency markers stripped before parsing.
const CURRENCY_MARKERS: &[&str] = &["PHP", "₱", "$", "€", "£", "¥", "₹"];

/// Parse a locale-formatted amount.
///
/// Whitespace, thousands separators and currency markers are removed first.
/// Accounting negatives written as `(1,234.00)` parse as `-1234.0`.
/// Non-finite values (`inf`, `NaN`) are rejected.
pub fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let mut cleaned: String = body
        .chars()
        .filter(|c| !c.is_whitespace() && !THOUSANDS_SEPARATORS.contains(c))
        .collect();
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    if cleaned.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Two-decimal rendering with `,` grouping: `1234.5` → `"1,234.50"`.
pub fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let negative = value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.');
    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        group_digits(int_part),
        frac_part
    )
}

/// Count with `,` grouping: `12345` → `"12,345"`.
pub fn format_count(count: usize) -> String {
    group_digits(&count.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Currency rendering: `format_currency(-1234.5, "₱")` → `"-₱1,234.50"`.
pub fn format_currency(value: f64, symbol: &str) -> String {
    let grouped = format_grouped(value);
    match grouped.strip_prefix('-') {
        Some(magnitude) => format!("-{symbol}{magnitude}"),
        None => format!("{symbol}{grouped}"),
    }
}
