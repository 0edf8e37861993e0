use crate::error::{Result, SearchError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Operator-adjustable cap on lines returned per query.
///
/// Shared by reference between the command that changes it and every query
/// that reads it. Queries read it once, before aggregation starts.
#[derive(Debug)]
pub struct QueryLimiter {
    limit: AtomicUsize,
}

impl QueryLimiter {
    pub fn new(default_limit: usize) -> Self {
        Self {
            limit: AtomicUsize::new(default_limit.max(1)),
        }
    }

    pub fn get(&self) -> usize {
        self.limit.load(Ordering::Acquire)
    }

    /// Parse `raw` as a positive integer and store it.
    ///
    /// On failure the previous value is kept.
    pub fn set(&self, raw: &str) -> Result<usize> {
        let value = parse_limit(raw)?;
        let previous = self.limit.swap(value, Ordering::AcqRel);
        log::info!("Search limit changed from {previous} to {value}");
        Ok(value)
    }
}

fn parse_limit(raw: &str) -> Result<usize> {
    let trimmed = raw.trim();
    match trimmed.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(SearchError::InvalidLimit(trimmed.to_string())),
    }
}
