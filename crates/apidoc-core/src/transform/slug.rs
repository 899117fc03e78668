/// Portal slug for a name: lower-cased, with spaces replaced by hyphens.
///
/// Only spaces are replaced; other punctuation is kept as-is so existing
/// portal links stay stable.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
