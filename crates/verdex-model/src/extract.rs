//! # Response Text Extraction
//!
//! Models wrap their JSON in prose, code fences, or both. These helpers
//! cut the payload out of the noise; actual JSON parsing stays with the
//! caller. The object and array slicers are deliberately greedy (first
//! opener to last closer) so trailing prose after the payload does not
//! truncate it.

/// Strip one Markdown code fence (with optional language tag) wrapping
/// the payload. Text that is not fenced comes back trimmed and
/// otherwise untouched.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the opening fence line, language tag and all.
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };
    let body = rest[newline + 1..].trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Greedy object slice: from the first `{` to the last `}`.
#[must_use]
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}

/// Greedy array slice: from the first `[` to the last `]`.
#[must_use]
pub fn first_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end >= start).then(|| &text[start..=end])
}

/// Every double-quoted substring, trimmed, blanks dropped. The
/// last-resort extractor when a response mentions values without valid
/// JSON around them.
#[must_use]
pub fn quoted_strings(text: &str) -> Vec<String> {
    text.split('"')
        .enumerate()
        .filter(|(index, _)| index % 2 == 1)
        .map(|(_, segment)| segment.trim().to_string())
        .filter(|segment| !segment.is_empty())
        .collect()
}
