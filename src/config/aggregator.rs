//! Error aggregation
//!
//! Collects every validation and structural defect found during one
//! resolution pass and raises a single consolidated failure at the end. A
//! load-and-report cycle surfaces every defect in the trust configuration,
//! not just the first, since operators typically fix a configuration file in
//! one editing pass.

use std::fmt;

use log::warn;

use crate::common::{ConfigError, Result};

/// Accumulator for the defects of one resolution pass
#[derive(Debug)]
pub struct ErrorCollector {
    origin: String,
    errors: Vec<String>,
}

impl ErrorCollector {
    /// Create a collector for a document identified by `origin` (a file
    /// path, "stream", or a bundled resource name)
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            errors: Vec::new(),
        }
    }

    /// Record one defect; the pass continues
    pub fn record(&mut self, error: impl fmt::Display) {
        let message = error.to_string();
        warn!("{}: {}", self.origin, message);
        self.errors.push(message);
    }

    /// Number of defects recorded so far
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// End the pass: succeed only when nothing was recorded, otherwise fail
    /// once with every message concatenated
    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(ConfigError::Configuration {
            origin: self.origin,
            report: self.errors.join("\n"),
        })
    }
}
