//! URL slug generation for bootcamp names.

/// Generate a URL-safe slug from a bootcamp name.
///
/// Converts to lowercase, replaces spaces and special characters with hyphens,
/// collapses consecutive hyphens, and trims leading/trailing hyphens.
pub fn generate_slug(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_hyphen = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    result.trim_matches('-').to_string()
}
