//! Limit/offset windows for list queries
//!
//! List endpoints take `limit` and `offset` query parameters. Each endpoint
//! picks its own default limit; every limit is capped at [`MAX_LIMIT`].
//!
//! ```rust,ignore
//! let window = WindowParams::new(query.limit, query.offset);
//! window.validate()?;
//! let rows = store.list_genes(&GeneFilter { limit: window.limit(100), offset: window.offset(), ..filter });
//! let meta = window.meta(100, rows.len());
//! ```

use serde::{Deserialize, Serialize};

use crate::api::response::WindowMeta;

pub const MAX_LIMIT: i64 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl WindowParams {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    /// Requested limit or `default`, clamped to 1..=MAX_LIMIT
    pub fn limit(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(limit) = self.limit {
            if !(1..=MAX_LIMIT).contains(&limit) {
                return Err("limit must be between 1 and 1000");
            }
        }
        if self.offset.is_some_and(|offset| offset < 0) {
            return Err("offset must not be negative");
        }
        Ok(())
    }

    pub fn meta(&self, default: i64, count: usize) -> WindowMeta {
        WindowMeta {
            limit: self.limit(default),
            offset: self.offset(),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let window = WindowParams::default();
        assert_eq!(window.limit(10), 10);
        assert_eq!(window.offset(), 0);
        assert!(window.validate().is_ok());
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(WindowParams::new(Some(5000), None).limit(10), MAX_LIMIT);
        assert_eq!(WindowParams::new(Some(0), None).limit(10), 1);
    }

    #[test]
    fn test_validate() {
        assert!(WindowParams::new(Some(0), None).validate().is_err());
        assert!(WindowParams::new(Some(1001), None).validate().is_err());
        assert!(WindowParams::new(None, Some(-1)).validate().is_err());
        assert!(WindowParams::new(Some(1000), Some(20)).validate().is_ok());
    }

    #[test]
    fn test_meta() {
        let meta = WindowParams::new(Some(25), Some(50)).meta(10, 3);
        assert_eq!(meta, WindowMeta { limit: 25, offset: 50, count: 3 });
    }
}
