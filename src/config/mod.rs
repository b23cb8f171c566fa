//! Configuration module
//!
//! This module resolves, validates, and flattens the hierarchical trust
//! configuration (certificate authorities, OCSP responders, endpoints,
//! policy toggles) into a single flat key-value namespace consumed by the
//! external signature-validation engine.
//!
//! Three value sources compete for every setting: explicit programmatic
//! overrides, a loaded document, and mode-dependent built-in defaults. One
//! resolution pass loads a document, flattens the authority tree, validates
//! known parameters, and either stores the result or fails once with every
//! defect found.

mod aggregator;
mod defaults;
mod flattener;
mod loader;
mod resolver;
mod validator;

pub mod engine;

// Re-export types used by collaborators
pub use self::aggregator::ErrorCollector;
pub use self::defaults::{CACHE_ALL_FILES, CACHE_NO_FILES, ONE_MB_IN_BYTES};
pub use self::loader::DEFAULT_DOCUMENT;
pub use self::resolver::{cache_bytes, Setting};
pub use self::validator::{validate, ValidationError, ValidationRule};

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;

use crate::common::Result;

/// Operational mode selecting built-in endpoint and policy defaults
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Demo endpoints, relaxed signing requirements
    Test,
    /// Live endpoints, OCSP requests must be signed
    Production,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Production
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Test => write!(f, "test"),
            Mode::Production => write!(f, "production"),
        }
    }
}

/// Error returned when a mode name is not recognized
#[derive(Debug, Error)]
#[error("Invalid mode: {0}. Valid values are: test, production")]
pub struct InvalidMode(String);

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Mode::Test),
            "production" => Ok(Mode::Production),
            _ => Err(InvalidMode(s.to_string())),
        }
    }
}

/// Resolved trust configuration
///
/// Holds the flattened authority entries and validated document parameters
/// of the last successful load, plus any programmatic overrides. Values are
/// effectively immutable once resolved: setters create a new pending
/// override layer, they never mutate a value already handed out. Reads are
/// safe to share across threads after construction; concurrent setter calls
/// on one instance require external synchronization, or use [`Configuration::copy`]
/// to hand an isolated instance to a concurrent operation.
#[derive(Debug)]
pub struct Configuration {
    mode: Mode,
    origin: Option<String>,
    authority_entries: BTreeMap<String, String>,
    document_params: BTreeMap<String, String>,
    overrides: HashMap<Setting, String>,
}

impl Configuration {
    /// Create a configuration with no document loaded; every setting
    /// resolves from its mode default or hardcoded constant
    pub fn new(mode: Mode) -> Self {
        debug!("Creating configuration in {} mode", mode);
        Self {
            mode,
            origin: None,
            authority_entries: BTreeMap::new(),
            document_params: BTreeMap::new(),
            overrides: HashMap::new(),
        }
    }

    /// Operational mode of this configuration
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Origin label of the last loaded document, if any
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Load a trust document by path or bundled resource name
    ///
    /// A filesystem file shadows a bundled resource of the same name. On
    /// failure the previously loaded state is left untouched.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let name = path.as_ref().to_string_lossy().into_owned();
        let (document, origin) = loader::load_named(&name)?;
        self.apply_document(&document, origin)
    }

    /// Load a trust document from an already opened byte stream
    pub fn load_from_reader(&mut self, reader: impl Read) -> Result<()> {
        let document = loader::load_reader(reader, "stream")?;
        self.apply_document(&document, "stream".to_string())
    }

    /// One resolution pass over a parsed document: flatten the authority
    /// tree, validate known parameters, then either fail with every defect
    /// found or commit the result
    fn apply_document(&mut self, document: &Value, origin: String) -> Result<()> {
        let mut errors = ErrorCollector::new(origin.clone());

        let entries = flattener::flatten(document, &mut errors);
        let params = collect_parameters(document, &mut errors);

        errors.finish()?;

        info!(
            "Loaded trust configuration from {} ({} authority entries, {} parameters)",
            origin,
            entries.len(),
            params.len()
        );
        self.authority_entries = entries;
        self.document_params = params;
        self.origin = Some(origin);
        Ok(())
    }

    /// Resolve one setting by precedence: override, document, mode default,
    /// hardcoded constant
    pub fn resolve(&self, setting: Setting) -> Option<String> {
        resolver::LayeredResolver {
            mode: self.mode,
            overrides: &self.overrides,
            document: &self.document_params,
        }
        .resolve(setting)
    }

    /// Set an explicit override for a setting, the highest precedence layer
    pub fn set_value(&mut self, setting: Setting, value: impl Into<String>) {
        let value = value.into();
        debug!("Overriding {} programmatically", setting);
        self.overrides.insert(setting, value);
    }

    /// Remove an explicit override; resolution falls back to the document
    /// value, not directly to the mode default
    pub fn clear_value(&mut self, setting: Setting) -> Option<String> {
        self.overrides.remove(&setting)
    }

    // --- Typed views over resolved settings ---

    /// OCSP responder endpoint
    pub fn ocsp_source(&self) -> String {
        self.resolve(Setting::OcspSource).unwrap_or_default()
    }

    /// Timestamping service endpoint
    pub fn tsp_source(&self) -> String {
        self.resolve(Setting::TspSource).unwrap_or_default()
    }

    /// Trust list location
    pub fn tsl_location(&self) -> String {
        self.resolve(Setting::TslLocation).unwrap_or_default()
    }

    /// Signature validation policy file
    pub fn validation_policy(&self) -> String {
        self.resolve(Setting::ValidationPolicy).unwrap_or_default()
    }

    /// Keystore holding trust list signing certificates
    pub fn keystore_location(&self) -> String {
        self.resolve(Setting::KeystoreLocation).unwrap_or_default()
    }

    /// Password of the trust list keystore
    pub fn keystore_password(&self) -> String {
        self.resolve(Setting::KeystorePassword).unwrap_or_default()
    }

    /// PKCS#11 module path
    pub fn pkcs11_module_path(&self) -> String {
        self.resolve(Setting::Pkcs11Module).unwrap_or_default()
    }

    /// Certificate file used to sign OCSP requests, if configured
    pub fn access_certificate_file(&self) -> Option<String> {
        self.resolve(Setting::AccessCertificateFile)
    }

    /// Password of the OCSP access certificate, if configured
    pub fn access_certificate_password(&self) -> Option<String> {
        self.resolve(Setting::AccessCertificatePassword)
    }

    /// Whether the requirements for signing OCSP requests are met: both the
    /// access certificate and its password are configured and non-empty
    pub fn ocsp_signing_configured(&self) -> bool {
        let file_set = self
            .access_certificate_file()
            .is_some_and(|f| !f.is_empty());
        let password_set = self
            .access_certificate_password()
            .is_some_and(|p| !p.is_empty());
        file_set && password_set
    }

    /// Whether OCSP requests must be signed
    pub fn must_sign_requests(&self) -> bool {
        match self.resolve(Setting::SignRequests) {
            Some(value) if value.eq_ignore_ascii_case("true") => true,
            Some(value) if value.eq_ignore_ascii_case("false") => false,
            Some(value) => {
                warn!(
                    "Unusable value '{}' for {}, treating as false",
                    value,
                    Setting::SignRequests
                );
                false
            }
            None => false,
        }
    }

    /// HTTP connection timeout in milliseconds
    pub fn connection_timeout_ms(&self) -> u64 {
        match self.resolve(Setting::ConnectionTimeout).map(|v| v.trim().parse()) {
            Some(Ok(timeout)) => timeout,
            _ => defaults::CONNECTION_TIMEOUT_MS,
        }
    }

    /// Maximum size of a data file to cache, in megabytes
    ///
    /// `-1` means cache everything, `0` means cache nothing. Document values
    /// are validated at load time; an unusable programmatic override falls
    /// back to the "cache everything" sentinel with a warning.
    pub fn max_file_cached_mb(&self) -> i64 {
        match self.resolve(Setting::MaxFileCached).map(|v| v.trim().parse::<i64>()) {
            Some(Ok(limit)) if limit >= CACHE_ALL_FILES => limit,
            Some(parsed) => {
                warn!(
                    "Unusable value {:?} for {}, caching everything",
                    parsed,
                    Setting::MaxFileCached
                );
                CACHE_ALL_FILES
            }
            None => CACHE_ALL_FILES,
        }
    }

    /// Byte form of the megabyte cache limit; the sentinel passes through
    /// unscaled
    pub fn max_file_cached_bytes(&self) -> i64 {
        cache_bytes(self.max_file_cached_mb())
    }

    /// Whether big file support is enabled
    pub fn big_files_supported(&self) -> bool {
        self.max_file_cached_mb() >= 0
    }

    /// Flat key-value namespace for the external validation engine
    ///
    /// Authority-derived keys merged with every top-level document parameter
    /// and the current resolved value of each named setting.
    pub fn flattened(&self) -> BTreeMap<String, String> {
        let mut flat = self.authority_entries.clone();
        for (key, value) in &self.document_params {
            flat.insert(key.clone(), value.clone());
        }
        for setting in Setting::ALL {
            if let Some(value) = self.resolve(setting) {
                flat.insert(setting.key().to_string(), value);
            }
        }
        flat
    }

    /// Produce a structurally independent duplicate
    ///
    /// An explicit field-by-field clone of the flattened entries, document
    /// parameters, and overrides: mutations on the copy are never observable
    /// through the original and vice versa, including through the nested
    /// maps.
    pub fn copy(&self) -> Configuration {
        Configuration {
            mode: self.mode,
            origin: self.origin.clone(),
            authority_entries: self.authority_entries.clone(),
            document_params: self.document_params.clone(),
            overrides: self.overrides.clone(),
        }
    }
}

/// Collect and validate every top-level scalar parameter of the document
///
/// Known-risk keys are checked against the rule table; anything else passes
/// through unchecked. Defects are recorded, never raised, so one pass
/// reports them all.
fn collect_parameters(document: &Value, errors: &mut ErrorCollector) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    let Some(mapping) = document.as_mapping() else {
        return params;
    };

    for (key, value) in mapping {
        let Some(name) = key.as_str() else {
            continue;
        };
        if name == flattener::AUTHORITIES_KEY {
            continue;
        }
        let Some(raw) = flattener::scalar_value(value) else {
            debug!("Skipping non-scalar top-level entry {}", name);
            continue;
        };
        match validator::validate(name, &raw) {
            Ok(()) => {
                params.insert(name.to_string(), raw);
            }
            Err(error) => errors.record(error),
        }
    }

    params
}
