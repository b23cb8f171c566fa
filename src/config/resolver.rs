//! Layered setting resolution
//!
//! For each logical setting, a value is resolved by precedence, highest
//! first: explicit programmatic override, loaded document value, mode
//! default, hardcoded constant. A setting with no value at any layer
//! resolves to `None`; callers of derived computations treat absence per the
//! documented sentinel semantics, not as an error.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::debug;

use super::defaults;
use super::Mode;

/// Logical settings of the resolved configuration, a closed set
///
/// Each setting carries its own key, used both in the loaded document and in
/// the flat map handed to the validation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    /// OCSP responder endpoint
    OcspSource,
    /// Timestamping service endpoint
    TspSource,
    /// Trust list location
    TslLocation,
    /// Signature validation policy file
    ValidationPolicy,
    /// Keystore holding trust list signing certificates
    KeystoreLocation,
    /// Password of the trust list keystore
    KeystorePassword,
    /// Whether OCSP requests must be signed
    SignRequests,
    /// Maximum size of a data file to cache, in megabytes
    MaxFileCached,
    /// HTTP connection timeout in milliseconds
    ConnectionTimeout,
    /// PKCS#11 module path
    Pkcs11Module,
    /// Certificate file used to sign OCSP requests
    AccessCertificateFile,
    /// Password of the OCSP access certificate
    AccessCertificatePassword,
}

impl Setting {
    /// Every setting, in engine-key order
    pub const ALL: [Setting; 12] = [
        Setting::OcspSource,
        Setting::TspSource,
        Setting::TslLocation,
        Setting::ValidationPolicy,
        Setting::KeystoreLocation,
        Setting::KeystorePassword,
        Setting::SignRequests,
        Setting::MaxFileCached,
        Setting::ConnectionTimeout,
        Setting::Pkcs11Module,
        Setting::AccessCertificateFile,
        Setting::AccessCertificatePassword,
    ];

    /// Key of this setting in the document and in the flattened map
    pub fn key(self) -> &'static str {
        match self {
            Setting::OcspSource => "OCSP_SOURCE",
            Setting::TspSource => "TSP_SOURCE",
            Setting::TslLocation => "TSL_LOCATION",
            Setting::ValidationPolicy => "VALIDATION_POLICY",
            Setting::KeystoreLocation => "KEYSTORE_LOCATION",
            Setting::KeystorePassword => "KEYSTORE_PASSWORD",
            Setting::SignRequests => "SIGN_REQUESTS",
            Setting::MaxFileCached => "MAX_FILE_CACHED",
            Setting::ConnectionTimeout => "CONNECTION_TIMEOUT",
            Setting::Pkcs11Module => "PKCS11_MODULE",
            Setting::AccessCertificateFile => "ACCESS_CERT_FILE",
            Setting::AccessCertificatePassword => "ACCESS_CERT_PASSWORD",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Read-only view over the value layers of one configuration
///
/// Borrow of the owning configuration's state; resolution itself never
/// mutates anything.
pub(crate) struct LayeredResolver<'a> {
    pub mode: Mode,
    pub overrides: &'a HashMap<Setting, String>,
    pub document: &'a BTreeMap<String, String>,
}

impl LayeredResolver<'_> {
    /// Resolve one setting by precedence
    pub fn resolve(&self, setting: Setting) -> Option<String> {
        if let Some(value) = self.overrides.get(&setting) {
            debug!("Resolved {} from override", setting);
            return Some(value.clone());
        }
        if let Some(value) = self.document.get(setting.key()) {
            debug!("Resolved {} from document", setting);
            return Some(value.clone());
        }
        if let Some(value) = defaults::mode_default(self.mode, setting) {
            return Some(value.to_string());
        }
        defaults::constant_default(setting).map(str::to_string)
    }
}

/// Derive the byte form of the megabyte cache limit
///
/// The "cache everything" sentinel maps to itself unchanged; it is never
/// scaled. A budget too large to express in bytes saturates at `i64::MAX`,
/// which already means "cache everything that fits".
pub fn cache_bytes(limit_mb: i64) -> i64 {
    if limit_mb == defaults::CACHE_ALL_FILES {
        defaults::CACHE_ALL_FILES
    } else {
        limit_mb.saturating_mul(defaults::ONE_MB_IN_BYTES)
    }
}
