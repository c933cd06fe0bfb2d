use subtle::ConstantTimeEq;

/// Compare a caller supplied secret with the configured one in constant time.
///
/// A missing value never matches, even against an empty secret.
pub fn secret_matches(expected: &str, provided: Option<&str>) -> bool {
    let Some(provided) = provided else {
        return false;
    };

    let expected_bytes = expected.as_bytes();
    let provided_bytes = provided.as_bytes();

    if expected_bytes.len() != provided_bytes.len() {
        return false;
    }

    expected_bytes.ct_eq(provided_bytes).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        assert!(secret_matches("s3cret", Some("s3cret")));
        assert!(!secret_matches("s3cret", Some("s3cret ")));
        assert!(!secret_matches("s3cret", Some("S3cret")));
        assert!(!secret_matches("s3cret", Some("")));
    }

    #[test]
    fn missing_value_is_rejected() {
        assert!(!secret_matches("s3cret", None));
        assert!(!secret_matches("", None));
    }
}
