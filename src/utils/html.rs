// src/utils/html.rs

/// Strips every HTML tag from user-supplied plain text (display names),
/// keeping the text content. Entities are escaped by ammonia on output.
pub fn strip_tags(input: &str) -> String {
    ammonia::Builder::empty()
        .clean(input)
        .to_string()
        .trim()
        .to_string()
}
