//! Success envelopes shared by every vendor endpoint.

use serde::{Deserialize, Serialize};
use waakye_core::Page;

/// `{data, message}` wrapper for single results and plain lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DataResponse<T> {
    pub data: T,
    pub message: String,
}

impl<T> DataResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

/// Paginated listing envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub message: String,
}

impl<T> PaginatedResponse<T> {
    pub fn from_page(page: Page<T>, message: impl Into<String>) -> Self {
        Self {
            data: page.items,
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waakye_core::PageRequest;

    #[test]
    fn test_paginated_envelope_fields() -> Result<(), Box<dyn std::error::Error>> {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2)?, 5);
        let json = serde_json::to_value(PaginatedResponse::from_page(page, "ok"))?;
        assert_eq!(json["total_items"], 5);
        assert_eq!(json["total_pages"], 3);
        assert_eq!(json["page_size"], 2);
        assert_eq!(json["message"], "ok");
        Ok(())
    }
}
