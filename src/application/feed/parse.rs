//! Field parsing for supplier feed rows.

/// Decode raw feed bytes.
///
/// UTF-8 (with or without a byte order mark) is used when valid. Otherwise
/// the bytes are read as Windows-1252, or as Latin-1 when they contain a
/// byte Windows-1252 leaves undefined.
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }
    let cp1252 = !bytes.iter().any(|b| CP1252_UNDEFINED.contains(b));
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F if cp1252 => CP1252_HIGH[usize::from(b - 0x80)],
            _ => char::from(b),
        })
        .collect()
}

const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Windows-1252 characters for bytes 0x80 to 0x9F.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Every four-digit number in `raw`, in order.
///
/// Longer digit runs are read in consecutive groups of four.
fn four_digit_numbers(raw: &str) -> Vec<i32> {
    let mut numbers = Vec::new();
    let mut run = String::new();
    for c in raw.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() {
            run.push(c);
            continue;
        }
        let digits = run.as_bytes();
        for chunk in digits.chunks_exact(4) {
            let value = chunk
                .iter()
                .fold(0_i32, |acc, d| acc * 10 + i32::from(d - b'0'));
            numbers.push(value);
        }
        run.clear();
    }
    numbers
}

/// Parse a free-text date range such as `"2015 - 2018"` or `"2016 onwards"`.
///
/// No year means `current_year` for both ends; a single year runs to
/// `current_year` (never ending before it starts); two years are ordered.
#[must_use]
pub fn parse_year_range(raw: &str, current_year: i32) -> (i32, i32) {
    match four_digit_numbers(raw).as_slice() {
        [] => (current_year, current_year),
        [start] => (*start, current_year.max(*start)),
        [first, second, ..] => (*first.min(second), *first.max(second)),
    }
}

/// Split an engine list on commas and slashes, collapsing whitespace.
#[must_use]
pub fn split_engines(raw: &str) -> Vec<String> {
    raw.split([',', '/'])
        .map(collapse_whitespace)
        .filter(|engine| !engine.is_empty())
        .collect()
}

/// Trim and collapse internal whitespace to single spaces.
#[must_use]
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased, whitespace-collapsed form used for duplicate detection.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    collapse_whitespace(raw).to_lowercase()
}

/// Parse a supplier vehicle id such as `"12"` or `"12.0"`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_vehicle_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && n.abs() < 9.0e15)
        .map(|n| n.trunc() as i64)
}
