//! Cache key generators for consistent key naming.

/// Separator between a region name and the entry key.
pub const REGION_SEPARATOR: &str = "::";

/// Generate the key of an entry in a named region, e.g. `products::P-001`.
#[must_use]
pub fn region_key(region: &str, key: &str) -> String {
    format!("{}{}{}", region, REGION_SEPARATOR, key)
}

/// Pattern matching every entry of a region.
#[must_use]
pub fn region_pattern(region: &str) -> String {
    format!("{}{}*", escape_glob(region), REGION_SEPARATOR)
}

/// Escapes glob metacharacters so a literal name can prefix a pattern.
fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
