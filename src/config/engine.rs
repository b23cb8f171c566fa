//! Validation engine hand-off
//!
//! The external signature-validation engine consumes the flattened
//! configuration exactly once per process in the common case. Instead of a
//! shared "already initialized" flag, the one-time setup state is an explicit
//! value owned by the caller, with idempotent call semantics.

use std::collections::BTreeMap;

use log::{debug, info};

use super::Configuration;
use crate::common::Result;

/// Interface of the external validation engine
///
/// The engine accepts the flattened key-value namespace and performs its
/// own setup with it; everything behind this trait is out of this crate's
/// hands.
pub trait ValidationEngine {
    fn configure(&mut self, settings: &BTreeMap<String, String>) -> Result<()>;
}

/// One-time engine setup state
#[derive(Debug, Default)]
pub struct EngineInitializer {
    initialized: bool,
}

impl EngineInitializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Hand the flattened configuration to the engine once; later calls are
    /// no-ops
    pub fn initialize<E: ValidationEngine>(
        &mut self,
        engine: &mut E,
        configuration: &Configuration,
    ) -> Result<()> {
        if self.initialized {
            debug!("Validation engine already configured, skipping");
            return Ok(());
        }
        self.force_initialize(engine, configuration)
    }

    /// Hand the flattened configuration to the engine regardless of prior
    /// state
    pub fn force_initialize<E: ValidationEngine>(
        &mut self,
        engine: &mut E,
        configuration: &Configuration,
    ) -> Result<()> {
        info!("Configuring validation engine");
        engine.configure(&configuration.flattened())?;
        self.initialized = true;
        Ok(())
    }
}
