//! Transcript preprocessing
//!
//! Lower-cases, expands informal abbreviations token by token, and collapses
//! whitespace. Substantive words are never dropped or reordered.

/// Token substitutions applied after lower-casing
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("&", "and"),
    ("+", "and"),
    ("w/", "with"),
    ("w", "with"),
    ("a/c", "ac"),
    ("km", "kilometers"),
    ("kms", "kilometers"),
    ("rs", "rupees"),
    ("inr", "rupees"),
    ("pcs", "pieces"),
    ("nos", "units"),
];

/// Punctuation that may trail a substitutable token. A trailing `.` is left
/// alone since abbreviations like `rs.` carry their own dot.
const TRAILING: &[char] = &[',', ';', ':', '!', '?'];

fn substitute(token: &str) -> Option<&'static str> {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == token)
        .map(|(_, to)| *to)
}

/// Normalize a raw transcript for matching
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());

    for token in lowered.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        let core = token.trim_end_matches(TRAILING);
        match substitute(core) {
            Some(replacement) => {
                out.push_str(replacement);
                out.push_str(&token[core.len()..]);
            }
            None => out.push_str(token),
        }
    }

    out
}

/// Truncate to at most `max_chars` characters, on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
