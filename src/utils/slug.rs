//! Slug derivation for category names.

use deunicode::deunicode;

/// Longest slug the `categories.slug` column holds.
pub const MAX_SLUG_LEN: usize = 96;

/// Derives a URL-safe slug from a human-readable name.
///
/// The name is transliterated to ASCII first, so accented and non-Latin
/// letters keep a readable form. ASCII letters and digits are kept
/// (lowercased); every other run of characters collapses into a single
/// hyphen. Leading and trailing hyphens are trimmed, and the result is cut
/// to [`MAX_SLUG_LEN`] bytes. It may be empty for names without any letters
/// or digits.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Node JS"), "node-js");
/// assert_eq!(slugify("Café"), "cafe");
/// ```
pub fn slugify(name: &str) -> String {
    let ascii = deunicode(name);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                if slug.len() + 1 >= MAX_SLUG_LEN {
                    break;
                }
                slug.push('-');
            }
            if slug.len() == MAX_SLUG_LEN {
                break;
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(slugify("React"), "react");
    }

    #[test]
    fn test_spaces_become_hyphens() {
        assert_eq!(slugify("Node JS"), "node-js");
        assert_eq!(slugify("Machine   Learning"), "machine-learning");
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(slugify("  C++ / Rust!  "), "c-rust");
        assert_eq!(slugify("--vue.js--"), "vue-js");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_accented_letters_are_transliterated() {
        assert_eq!(slugify("Café"), "cafe");
        assert_eq!(slugify("Über Uns"), "uber-uns");
        assert_ne!(slugify("Café"), slugify("Caf"));
    }

    #[test]
    fn test_cyrillic_is_transliterated() {
        assert_eq!(slugify("Кофе"), "kofe");
    }

    #[test]
    fn test_long_names_are_cut() {
        let slug = slugify(&"ab ".repeat(60));
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
        assert!(slug.starts_with("ab-ab"));
    }
}
