//! Rating scores and live aggregates.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{RatingId, Timestamp, VendorId};

/// A single sub-score, always within [`Score::MIN`, `Score::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(value_type = u8))]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate a raw sub-score for the named field.
    pub fn new(field: &str, value: i64) -> Result<Self, ValidationError> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(ValidationError::out_of_range(
                field,
                value,
                Self::MIN,
                Self::MAX,
            ));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Score::new("score", i64::from(value))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// The four sub-scores of one rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RatingScores {
    #[serde(alias = "hygeine_rating")]
    pub hygiene_rating: Score,
    pub value_rating: Score,
    pub taste_rating: Score,
    pub service_rating: Score,
}

impl RatingScores {
    /// Validate all four sub-scores, reporting the first field out of range.
    pub fn new(
        hygiene: i64,
        value: i64,
        taste: i64,
        service: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            hygiene_rating: Score::new("hygiene_rating", hygiene)?,
            value_rating: Score::new("value_rating", value)?,
            taste_rating: Score::new("taste_rating", taste)?,
            service_rating: Score::new("service_rating", service)?,
        })
    }

    /// Mean of the four sub-scores.
    pub fn mean(&self) -> f64 {
        let total = u32::from(self.hygiene_rating.value())
            + u32::from(self.value_rating.value())
            + u32::from(self.taste_rating.value())
            + u32::from(self.service_rating.value());
        f64::from(total) / 4.0
    }
}

/// Input for a rating that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRating {
    pub scores: RatingScores,
    pub comment: Option<String>,
}

impl NewRating {
    /// Blank comments are stored as absent.
    pub fn new(scores: RatingScores, comment: Option<String>) -> Self {
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self { scores, comment }
    }
}

/// One immutable submitted rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Rating {
    pub id: RatingId,
    pub vendor_id: VendorId,
    #[serde(flatten)]
    pub scores: RatingScores,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: Timestamp,
}

/// Live-computed rating statistics for one vendor.
///
/// All fields are zero when the vendor has no ratings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RatingAggregate {
    pub hygiene_rating: f64,
    pub value_rating: f64,
    pub taste_rating: f64,
    pub service_rating: f64,
    /// Mean of the four per-dimension averages.
    pub overall_rating: f64,
    pub total_ratings: u64,
}

impl RatingAggregate {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from per-dimension averages as computed by a store.
    pub fn from_averages(
        hygiene: f64,
        value: f64,
        taste: f64,
        service: f64,
        total_ratings: u64,
    ) -> Self {
        if total_ratings == 0 {
            return Self::empty();
        }
        Self {
            hygiene_rating: hygiene,
            value_rating: value,
            taste_rating: taste,
            service_rating: service,
            overall_rating: (hygiene + value + taste + service) / 4.0,
            total_ratings,
        }
    }

    /// Aggregate a set of ratings in memory.
    pub fn from_scores<'a, I>(scores: I) -> Self
    where
        I: IntoIterator<Item = &'a RatingScores>,
    {
        let mut sums = [0u64; 4];
        let mut count = 0u64;
        for s in scores {
            sums[0] += u64::from(s.hygiene_rating.value());
            sums[1] += u64::from(s.value_rating.value());
            sums[2] += u64::from(s.taste_rating.value());
            sums[3] += u64::from(s.service_rating.value());
            count += 1;
        }
        if count == 0 {
            return Self::empty();
        }
        let avg = |sum: u64| sum as f64 / count as f64;
        Self::from_averages(avg(sums[0]), avg(sums[1]), avg(sums[2]), avg(sums[3]), count)
    }

    pub fn has_ratings(&self) -> bool {
        self.total_ratings > 0
    }
}

/// A non-empty comment left with a rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RatingComment {
    pub comment: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: Timestamp,
}

/// Aggregate plus comment history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VendorRatings {
    #[serde(flatten)]
    pub summary: RatingAggregate,
    pub comments: Vec<RatingComment>,
}

impl VendorRatings {
    pub fn empty() -> Self {
        Self {
            summary: RatingAggregate::empty(),
            comments: Vec::new(),
        }
    }
}
