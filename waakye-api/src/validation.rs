//! Validation Traits
//!
//! Turns raw query-string and body values into the inputs the validated
//! core constructors expect. Every failure is a [`ValidationError`] naming
//! the offending field.

use waakye_core::ValidationError;

/// Trait for parsing optional textual parameters.
///
/// # Example
/// ```ignore
/// use waakye_api::validation::ParseParam;
///
/// let page = query.page.parse_i64_param("page")?.unwrap_or(1);
/// ```
pub trait ParseParam {
    /// `None` when absent or blank; `Unparsable` when present but not an integer.
    fn parse_i64_param(&self, field: &str) -> Result<Option<i64>, ValidationError>;

    /// `None` when absent or blank; `Unparsable` when present but not a number.
    fn parse_f64_param(&self, field: &str) -> Result<Option<f64>, ValidationError>;
}

impl ParseParam for Option<String> {
    fn parse_i64_param(&self, field: &str) -> Result<Option<i64>, ValidationError> {
        match present(self) {
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ValidationError::unparsable(field, raw, "an integer")),
            None => Ok(None),
        }
    }

    fn parse_f64_param(&self, field: &str) -> Result<Option<f64>, ValidationError> {
        match present(self) {
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ValidationError::unparsable(field, raw, "a decimal number")),
            None => Ok(None),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Trait for required request fields that arrive as `Option`.
pub trait RequireField<T> {
    fn require(self, field: &str) -> Result<T, ValidationError>;
}

impl<T> RequireField<T> for Option<T> {
    fn require(self, field: &str) -> Result<T, ValidationError> {
        self.ok_or_else(|| ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_blank_are_none() -> Result<(), ValidationError> {
        assert_eq!(None::<String>.parse_i64_param("page")?, None);
        assert_eq!(Some("  ".to_string()).parse_i64_param("page")?, None);
        Ok(())
    }

    #[test]
    fn test_parses_numbers() -> Result<(), ValidationError> {
        assert_eq!(Some("3".to_string()).parse_i64_param("page")?, Some(3));
        assert_eq!(Some("-0.187".to_string()).parse_f64_param("lng")?, Some(-0.187));
        Ok(())
    }

    #[test]
    fn test_garbage_is_unparsable() {
        match Some("two".to_string()).parse_i64_param("page_size") {
            Err(ValidationError::Unparsable { field, value, .. }) => {
                assert_eq!(field, "page_size");
                assert_eq!(value, "two");
            }
            other => panic!("expected Unparsable, got {other:?}"),
        }
        assert!(Some("north".to_string()).parse_f64_param("lat").is_err());
    }

    #[test]
    fn test_require_names_field() {
        match None::<i64>.require("value_rating") {
            Err(err) => assert_eq!(err.field(), "value_rating"),
            Ok(_) => panic!("missing value must be rejected"),
        }
    }
}
