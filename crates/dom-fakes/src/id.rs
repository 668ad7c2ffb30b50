//! Identifier and random string generation.

use rand::Rng;
use uuid::Uuid;

/// Default length bounds for [`random_string`]
pub const DEFAULT_RANDOM_STRING_LEN: usize = 20;

/// Generate a process-unique identifier for tracks and streams
#[must_use]
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a random lowercase base-36 string
///
/// The length is drawn uniformly from `min..max`. When `max <= min` the
/// string is exactly `min` characters long.
#[must_use]
pub fn random_string(max: usize, min: usize) -> String {
    let mut rng = rand::thread_rng();
    let len = if max > min {
        rng.gen_range(min..max)
    } else {
        min
    };
    (0..len)
        .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
        .collect()
}

/// [`random_string`] with the default 20 character length
#[must_use]
pub fn random_string_default() -> String {
    random_string(DEFAULT_RANDOM_STRING_LEN, DEFAULT_RANDOM_STRING_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generate_id_is_uuid() {
        let id = generate_id();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_random_string_default_length() {
        assert_eq!(random_string_default().len(), 20);
    }

    #[test]
    fn test_random_string_bounds() {
        for _ in 0..200 {
            let s = random_string(10, 5);
            assert!((5..10).contains(&s.len()), "length {}", s.len());
        }
    }

    #[test]
    fn test_random_string_charset() {
        let s = random_string(64, 64);
        assert!(s
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_random_string_inverted_bounds() {
        assert_eq!(random_string(3, 8).len(), 8);
        assert!(random_string(0, 0).is_empty());
    }
}
