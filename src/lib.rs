//! Trust Config: trust and operational configuration core for a signature
//! validation engine
//!
//! This library resolves, validates, and flattens a hierarchical trust
//! configuration (certificate authorities, OCSP responders, network
//! endpoints, cryptographic policy toggles) into a single flat key-value
//! namespace consumed by an external signature-validation engine.
//!
//! # Main Features
//!
//! - Layered value resolution: explicit override > document > mode default >
//!   built-in constant
//! - Flattening of nested authority/responder lists into stable indexed keys
//! - Per-key type and range validation with one consolidated failure report
//!   covering every defect of a load
//! - Independent deep copies for handing a configuration to concurrent
//!   operations
//!
//! # Example
//!
//! ```no_run
//! use trust_config::{Configuration, Mode, Result, Setting};
//!
//! fn main() -> Result<()> {
//!     let mut configuration = Configuration::new(Mode::Test);
//!     configuration.load_from_path("conf/trust.yaml")?;
//!
//!     // Programmatic overrides take precedence over the document
//!     configuration.set_value(Setting::OcspSource, "http://ocsp.internal/");
//!
//!     // The flat namespace handed to the validation engine
//!     let flat = configuration.flattened();
//!     assert!(flat.contains_key("CAS"));
//!
//!     Ok(())
//! }
//! ```

// Public modules
pub mod common;
pub mod config;

// Re-export commonly used structures and functions for convenience
pub use common::{ConfigError, Result};
pub use config::{Configuration, Mode, Setting};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
