//! Random username generation.
//!
//! Usernames are assigned at activation time; users never choose them.

use base64::Engine as _;
use rand::Rng;

/// Length of random bytes before base64 encoding.
const USERNAME_LENGTH_BYTES: usize = 6;

/// Generates a random username.
///
/// Draws bytes from the thread-local CSPRNG and encodes them as URL-safe base64
/// without padding, producing an 8-character identifier.
///
/// # Examples
///
/// ```ignore
/// let username = generate_username();
/// assert_eq!(username.len(), 8);
/// ```
pub fn generate_username() -> String {
    let mut buffer = [0u8; USERNAME_LENGTH_BYTES];

    rand::rng().fill(&mut buffer[..]);

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_username_has_correct_length() {
        assert_eq!(generate_username().len(), 8);
    }

    #[test]
    fn test_generate_username_url_safe_characters() {
        let username = generate_username();
        assert!(
            username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert!(!username.contains('='));
    }

    #[test]
    fn test_generate_username_produces_unique_values() {
        let names: HashSet<_> = (0..1000).map(|_| generate_username()).collect();
        assert_eq!(names.len(), 1000);
    }
}
