//! Slug derivation for page names.

/// Slug of a card name, used as its page path segment.
///
/// ASCII letters and digits are kept lowercased. Runs of whitespace, `-` and
/// `_` collapse to one dash, anything else is dropped. A card named "Home"
/// gets the slug `home`, which the site tree links as `/` and the dispatcher
/// serves for the root path. Names with no ASCII alphanumerics ("日本",
/// "???") give an empty slug, which no request path can reach.
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}
