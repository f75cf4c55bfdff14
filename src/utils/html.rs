// src/utils/html.rs

/// Strips scripts, event handlers and other unsafe markup from user-written
/// HTML while keeping basic formatting tags.
///
/// Community posts and comments pass through here before they are forwarded,
/// so every other client of the backend receives sanitized content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
