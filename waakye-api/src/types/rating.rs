//! Rating request types.

use serde::{Deserialize, Serialize};
use waakye_core::{RatingScores, ValidationError};

use crate::validation::RequireField;

/// Request to rate a vendor. Sub-scores are integers in [1, 5].
///
/// `hygeine_rating` is accepted as an alias of `hygiene_rating` for older
/// clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RateVendorRequest {
    #[serde(alias = "hygeine_rating")]
    pub hygiene_rating: Option<i64>,
    pub value_rating: Option<i64>,
    pub taste_rating: Option<i64>,
    pub service_rating: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl RateVendorRequest {
    /// Validate the four sub-scores. The comment is passed through.
    pub fn into_parts(self) -> Result<(RatingScores, Option<String>), ValidationError> {
        let scores = RatingScores::new(
            self.hygiene_rating.require("hygiene_rating")?,
            self.value_rating.require("value_rating")?,
            self.taste_rating.require("taste_rating")?,
            self.service_rating.require("service_rating")?,
        )?;
        Ok((scores, self.comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_misspelled_hygiene() -> Result<(), Box<dyn std::error::Error>> {
        let req: RateVendorRequest = serde_json::from_str(
            r#"{"hygeine_rating":4,"value_rating":5,"taste_rating":3,"service_rating":4}"#,
        )?;
        let (scores, comment) = req.into_parts()?;
        assert_eq!(scores.hygiene_rating.value(), 4);
        assert!(comment.is_none());
        Ok(())
    }

    #[test]
    fn test_out_of_range_score_names_field() {
        let req = RateVendorRequest {
            hygiene_rating: Some(4),
            value_rating: Some(5),
            taste_rating: Some(7),
            service_rating: Some(4),
            comment: None,
        };
        match req.into_parts() {
            Err(err) => assert_eq!(err.field(), "taste_rating"),
            Ok(_) => panic!("taste_rating 7 must be rejected"),
        }
    }

    #[test]
    fn test_missing_score_is_required() {
        let req = RateVendorRequest {
            hygiene_rating: Some(4),
            ..Default::default()
        };
        match req.into_parts() {
            Err(ValidationError::RequiredFieldMissing { field }) => {
                assert_eq!(field, "value_rating")
            }
            other => panic!("expected RequiredFieldMissing, got {other:?}"),
        }
    }
}
