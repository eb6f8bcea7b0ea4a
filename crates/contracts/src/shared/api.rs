use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u64 = 10;
pub const MAX_PER_PAGE: u64 = 100;

/// Maximum number of typeahead results
pub const SEARCH_LIMIT: u64 = 10;

/// Envelope shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total,
            pages: request.page_count(total),
            current_page: request.page,
        }
    }
}

/// Query string accepted by record listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub search: Option<String>,
    pub arquivado: Option<bool>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    /// Trimmed search term, `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn archived(&self) -> bool {
        self.arquivado.unwrap_or(false)
    }
}

/// Sanitized paging parameters (1-based page)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }

    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page)
    }
}

/// Query string of the typeahead endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub categoria_id: Option<i32>,
}

impl SearchQuery {
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_and_clamping() {
        let req = PageRequest::new(None, None);
        assert_eq!(req, PageRequest { page: 1, per_page: 10 });
        assert_eq!(req.offset(), 0);

        let req = PageRequest::new(Some(0), Some(0));
        assert_eq!(req, PageRequest { page: 1, per_page: 1 });

        let req = PageRequest::new(Some(3), Some(1000));
        assert_eq!(req.per_page, MAX_PER_PAGE);
        assert_eq!(req.offset(), 200);
    }

    #[test]
    fn test_page_count() {
        let req = PageRequest::new(Some(1), Some(10));
        assert_eq!(req.page_count(0), 0);
        assert_eq!(req.page_count(10), 1);
        assert_eq!(req.page_count(11), 2);
    }

    #[test]
    fn test_envelope_skips_empty_fields() {
        let json = serde_json::to_value(ApiResponse::message("ok")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "ok"}));
    }
}
