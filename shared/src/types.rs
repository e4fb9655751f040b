//! Small wire types shared across API modules

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Hard cap on page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query params for paginated list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl PageQuery {
    /// Clamp limit/offset into sane bounds
    pub fn clamped(&self) -> (i64, i64) {
        let limit = self.limit.clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.max(0);
        (limit, offset)
    }
}

/// A page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, limit: i64, offset: i64) -> Self {
        Self {
            items,
            limit,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_bounds() {
        let q = PageQuery {
            limit: 5000,
            offset: -3,
        };
        assert_eq!(q.clamped(), (MAX_PAGE_SIZE, 0));

        let q = PageQuery {
            limit: 0,
            offset: 10,
        };
        assert_eq!(q.clamped(), (1, 10));
    }

    #[test]
    fn test_default_limit() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(q.offset, 0);
    }
}
