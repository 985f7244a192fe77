//! Cell-level parsing: CSV splitting, numbers, currency strings, dates

use chrono::NaiveDate;

/// Split a CSV line respecting quoted fields (handles commas inside quotes).
/// Returns owned strings because quoted fields need unquoting.
pub fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // "" inside quotes is a literal quote
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Normalize a header cell for alias matching: trimmed, lowercase, spaces
/// and dashes as underscores, BOM removed.
pub fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// A cell that carries no value.
pub fn is_blank(cell: &str) -> bool {
    let s = cell.trim();
    s.is_empty()
        || s == "-"
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("null")
        || s.eq_ignore_ascii_case("n/a")
}

/// Outcome of reading one numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Value(f64),
    Blank,
    /// Text that did not parse as a number
    Invalid,
}

impl Cell {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Blank | Self::Invalid => None,
        }
    }
}

/// Lenient numeric parse with currency cleanup.
///
/// Accepts `$`, currency codes and words, spaces and thousand separators in
/// both the `1,234,567.89` and `1.234.567,89` conventions. When both
/// separators occur the last one is the decimal mark. A lone separator is a
/// decimal mark, except a lone separator followed by exactly three digits
/// after a non-zero integer part, which groups thousands. For a lone comma
/// this always holds (`1,234`). For a lone dot it holds only in a money cell,
/// one that carries `$` or letters such as a currency code (`$950.000`,
/// `EUR 1.500`). An `e` is kept only as an exponent between digits.
/// Non-finite results are `Invalid`.
pub fn parse_number(cell: &str) -> Cell {
    if is_blank(cell) {
        return Cell::Blank;
    }

    let chars: Vec<char> = cell.trim().chars().collect();
    let mut cleaned = String::with_capacity(chars.len());
    let mut money = false;
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '0'..='9' | '.' | ',' | '-' | '+' => cleaned.push(c),
            'e' | 'E' if is_exponent(&chars, i) => cleaned.push(c),
            '$' => money = true,
            c if c.is_alphabetic() => money = true,
            _ => {}
        }
    }
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Cell::Invalid;
    }

    let normalized = normalize_separators(&cleaned, money);
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Value(v),
        _ => Cell::Invalid,
    }
}

/// An `e` that sits between a mantissa and an exponent (`1e3`, `2.5E-4`).
fn is_exponent(chars: &[char], i: usize) -> bool {
    let before = i.checked_sub(1).and_then(|j| chars.get(j));
    let after = match chars.get(i + 1) {
        Some('-' | '+') => chars.get(i + 2),
        other => other,
    };
    matches!(before, Some(c) if c.is_ascii_digit() || *c == '.')
        && matches!(after, Some(c) if c.is_ascii_digit())
}

/// A single `sep` with exactly three digits after it and a non-zero integer part.
fn groups_thousands(s: &str, sep: char) -> bool {
    let Some((int_part, frac)) = s.split_once(sep) else {
        return false;
    };
    let int_digits = int_part.trim_start_matches(['-', '+']);
    frac.len() == 3
        && frac.chars().all(|c| c.is_ascii_digit())
        && !int_digits.is_empty()
        && int_digits != "0"
}

fn normalize_separators(s: &str, money: bool) -> String {
    let last_dot = s.rfind('.');
    let last_comma = s.rfind(',');
    match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => {
            if comma > dot {
                // 1.234,56
                s.replace('.', "").replace(',', ".")
            } else {
                // 1,234.56
                s.replace(',', "")
            }
        }
        (None, Some(_)) => {
            if s.matches(',').count() > 1 || groups_thousands(s, ',') {
                s.replace(',', "")
            } else {
                s.replace(',', ".")
            }
        }
        (Some(_), None) => {
            if s.matches('.').count() > 1 || (money && groups_thousands(s, '.')) {
                s.replace('.', "")
            } else {
                s.to_string()
            }
        }
        (None, None) => s.to_string(),
    }
}

/// Parse a calendar date: `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY` or
/// `DD-MM-YYYY`. A trailing time of day is ignored.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    if is_blank(cell) {
        return None;
    }
    let date_part = cell.trim().split(['T', ' ']).next().unwrap_or_default();
    ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
