//! Panic-free numeric parsing used by every external-tool output parser.
//!
//! Subprocess output is semi-structured text; a garbled numeric field must
//! degrade to `None` rather than abort an entire tool run.

/// Converts a string slice to a float, returning `None` on any non-numeric input.
///
/// Leading and trailing whitespace is ignored. This function never panics.
pub fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Round-trips a numeric string through `f64` to guarantee a clean
/// canonical representation (e.g. `" -0.5537 "` becomes `"-0.5537"`).
///
/// Returns `None` if the input is not numeric.
pub fn clean_float_string(text: &str) -> Option<String> {
    parse_float(text).map(|value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_signed_floats() {
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float("-463.9"), Some(-463.9));
        assert_eq!(parse_float("+0.25"), Some(0.25));
    }

    #[test]
    fn parses_scientific_notation() {
        assert_eq!(parse_float("1.0e-3"), Some(0.001));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse_float("  -161.6\t"), Some(-161.6));
    }

    #[test]
    fn returns_none_on_garbage() {
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float("1.2.3"), None);
        assert_eq!(parse_float("nan garbage"), None);
    }

    #[test]
    fn clean_float_string_canonicalizes() {
        assert_eq!(clean_float_string(" -0.5537 "), Some("-0.5537".to_string()));
        assert_eq!(clean_float_string("0.0"), Some("0".to_string()));
        assert_eq!(clean_float_string("not a number"), None);
    }
}
