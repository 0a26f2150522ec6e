//! Custom assertions for rule evaluation tests.

use pdf_batch::BatchError;

/// Strips `prefix` and `suffix` from `text` and parses the number between.
///
/// # Panics
/// Panics if the affixes are missing or the middle is not an integer.
pub fn numeric_part(text: &str, prefix: &str, suffix: &str) -> i64 {
    let inner = text
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(suffix))
        .unwrap_or_else(|| {
            panic!(
                "'{}' should be wrapped in prefix '{}' and suffix '{}'",
                text, prefix, suffix
            )
        });
    inner
        .trim()
        .parse()
        .unwrap_or_else(|_| panic!("'{}' should contain an integer, found '{}'", text, inner))
}

/// Asserts that a generated value lies within `[min, max]`.
pub fn assert_within(text: &str, prefix: &str, suffix: &str, min: i64, max: i64) {
    let value = numeric_part(text, prefix, suffix);
    assert!(
        (min..=max).contains(&value),
        "value {} from '{}' should lie within [{}, {}]",
        value,
        text,
        min,
        max
    );
}

/// Asserts that a result failed with a validation error.
pub fn assert_validation_error<T: std::fmt::Debug>(result: Result<T, BatchError>) {
    match result {
        Err(err) => assert!(
            err.is_validation(),
            "expected a validation error, got '{}'",
            err
        ),
        Ok(value) => panic!("expected a validation error, got Ok({:?})", value),
    }
}
