//! # Delimited Table Parsing
//!
//! A deliberately small dialect: one record per line, a double quote
//! toggles quoting, delimiters inside quotes are literal, quotes never
//! appear in output fields, and there is no escape sequence. Validation
//! upstream rejects quotes inside field values, which keeps
//! [`format_row`] and [`parse_line`] symmetric.

/// Split one line into trimmed fields.
///
/// The quote character toggles in-quote state and is always consumed;
/// `"a""b"` therefore parses as the single field `ab`, not as an escaped
/// quote. A line with unbalanced quotes parses as if the quote ran to
/// the end of the line.
#[must_use]
pub fn parse_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == delimiter && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);

    fields.iter().map(|f| f.trim().to_string()).collect()
}

/// Parse a whole table: skip the header line, skip blank lines, and
/// skip rows with fewer than `min_fields` fields (warned with their
/// 1-based line number). Rows keep any extra fields beyond the minimum.
#[must_use]
pub fn parse_table(text: &str, delimiter: char, min_fields: usize) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if index == 0 || line.trim().is_empty() {
            continue;
        }
        let fields = parse_line(line, delimiter);
        if fields.len() < min_fields {
            tracing::warn!(
                line = index + 1,
                fields = fields.len(),
                required = min_fields,
                "skipping short catalog row"
            );
            continue;
        }
        rows.push(fields);
    }
    rows
}

/// Render one row in the dialect [`parse_line`] reads.
///
/// Fields containing the delimiter are wrapped in quotes. The format is
/// line-based, so embedded newlines collapse to single spaces. Quote
/// characters cannot be represented and must be rejected before this
/// point.
#[must_use]
pub fn format_row(fields: &[&str], delimiter: char) -> String {
    fields
        .iter()
        .map(|field| {
            let flat = field
                .replace("\r\n", " ")
                .replace(['\r', '\n'], " ");
            if flat.contains(delimiter) {
                format!("\"{flat}\"")
            } else {
                flat
            }
        })
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}
