//! Custom path extractor for type-safe entity IDs.
//!
//! `PathId<T>` parses the `:id` segment into an `EntityIdType` newtype and
//! rejects anything that is not a UUID with the standard `ApiError` body.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::fmt;
use uuid::Uuid;
use waakye_core::EntityIdType;

use crate::error::ApiError;

/// Extractor for type-safe entity IDs from path parameters.
///
/// # Example
///
/// ```rust,ignore
/// use waakye_core::VendorId;
///
/// async fn get_vendor(PathId(vendor_id): PathId<VendorId>) -> ApiResult<impl IntoResponse> {
///     // vendor_id is VendorId, not Uuid
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathId<T: EntityIdType>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: EntityIdType,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(uuid): Path<Uuid> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| invalid_id(T::ENTITY_NAME, parts.uri.path(), e))?;

        Ok(PathId(T::new(uuid)))
    }
}

fn invalid_id(entity_name: &str, path: &str, reason: impl fmt::Display) -> ApiError {
    ApiError::invalid_format("id", "a UUID").with_details(serde_json::json!({
        "field": "id",
        "entity_type": entity_name,
        "path": path,
        "reason": reason.to_string(),
    }))
}
