//! Execution options threaded in by the caller

/// Page size used when a query asks for the system default
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Tunables for query execution
#[derive(Clone, Copy, Debug)]
pub struct QueryOptions {
    /// Page size substituted when the model's `page_size` is 0
    pub page_size: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryOptions {
    /// Resolve a model's requested page size against these options
    ///
    /// Never returns 0: a zero request falls back to the configured
    /// default, and a zero default to one row per page.
    pub fn resolve(&self, requested: usize) -> usize {
        if requested == 0 {
            self.page_size.max(1)
        } else {
            requested
        }
    }
}
