//! API route handlers

pub mod auth;
pub mod health;
pub mod ingest;
pub mod questions;
pub mod seasons;

use common::{Error, Result};

/// Resolve offset-pagination parameters: 1-based `page` (default 1) and
/// `limit` (default 10), both rejected when non-positive.
pub fn page_params(page: Option<i64>, limit: Option<i64>) -> Result<(i64, i64)> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(10);
    if page < 1 || limit < 1 {
        return Err(Error::Validation(
            "page and limit must be positive".to_string(),
        ));
    }
    Ok((page, limit))
}

#[cfg(test)]
mod tests {
    use super::page_params;

    #[test]
    fn defaults_apply_when_absent() {
        assert_eq!(page_params(None, None).unwrap(), (1, 10));
    }

    #[test]
    fn non_positive_values_are_rejected() {
        assert!(page_params(Some(0), None).is_err());
        assert!(page_params(None, Some(0)).is_err());
        assert!(page_params(Some(-1), Some(10)).is_err());
    }
}
