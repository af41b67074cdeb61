//! Query parameter extractors for paginated endpoints.

use serde::Deserialize;

/// `?page=&page_size=` on history and message listings.
///
/// Missing values fall back to page 1 and the configured page size. Range
/// checks happen in the service, so bad values surface as validation errors.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<i32>,
    pub page_size: Option<i32>,
}

impl PageQuery {
    /// `(page, page_size)` with defaults applied.
    pub fn resolve(&self, default_page_size: i32) -> (i32, i32) {
        (
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(default_page_size),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        assert_eq!(PageQuery::default().resolve(200), (1, 200));
        let query = PageQuery {
            page: Some(3),
            page_size: None,
        };
        assert_eq!(query.resolve(50), (3, 50));
    }

    #[test]
    fn test_explicit_values_pass_through_unchecked() {
        let query = PageQuery {
            page: Some(0),
            page_size: Some(-1),
        };
        assert_eq!(query.resolve(200), (0, -1));
    }
}
