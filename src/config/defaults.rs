//! Default configuration values
//!
//! This module is the single source of truth for built-in defaults. Mode
//! defaults are total: every mode-sensitive setting has an explicit value for
//! both modes, and there is no fallback from one mode to the other. Constants
//! shared by all modes live in the last layer of the resolver.

use super::resolver::Setting;
use super::Mode;

/// OCSP responder endpoint used in test mode
pub const TEST_OCSP_URL: &str = "http://demo.sk.ee/ocsp";

/// OCSP responder endpoint used in production mode
pub const PROD_OCSP_URL: &str = "http://ocsp.sk.ee/";

/// Timestamping endpoint used in test mode
pub const TEST_TSP_URL: &str = "http://demo.sk.ee/tsa";

/// Timestamping endpoint used in production mode
pub const PROD_TSP_URL: &str = "http://tsa.sk.ee";

/// Trust list location used in test mode
pub const TEST_TSL_LOCATION: &str = "https://open-eid.github.io/test-TL/tl-mp-test-EE.xml";

/// Trust list location used in production mode
pub const PROD_TSL_LOCATION: &str = "https://ec.europa.eu/tools/lotl/eu-lotl.xml";

/// Signature validation policy file used in test mode
pub const TEST_VALIDATION_POLICY: &str = "conf/test_constraint.xml";

/// Signature validation policy file used in production mode
pub const PROD_VALIDATION_POLICY: &str = "conf/constraint.xml";

/// Keystore holding trust list signing certificates, test mode
pub const TEST_KEYSTORE_LOCATION: &str = "keystore/test-keystore.jks";

/// Keystore holding trust list signing certificates, production mode
pub const PROD_KEYSTORE_LOCATION: &str = "keystore/keystore.jks";

/// Scale factor between the megabyte cache limit and its byte form
pub const ONE_MB_IN_BYTES: i64 = 1_048_576;

/// Cache limit sentinel: cache every data file regardless of size
pub const CACHE_ALL_FILES: i64 = -1;

/// Cache limit sentinel: cache nothing
pub const CACHE_NO_FILES: i64 = 0;

/// Connection timeout in milliseconds, shared by all modes
pub const CONNECTION_TIMEOUT_MS: u64 = 1000;

/// PKCS#11 module path shared by all modes
pub const PKCS11_MODULE_PATH: &str = "/usr/lib/x86_64-linux-gnu/opensc-pkcs11.so";

/// Keystore password shared by all modes
pub const KEYSTORE_PASSWORD: &str = "changeit";

/// Mode-dependent default for a setting
///
/// Returns `None` for settings that are not mode-sensitive; those fall
/// through to [`constant_default`].
pub fn mode_default(mode: Mode, setting: Setting) -> Option<&'static str> {
    match setting {
        Setting::OcspSource => Some(match mode {
            Mode::Test => TEST_OCSP_URL,
            Mode::Production => PROD_OCSP_URL,
        }),
        Setting::TspSource => Some(match mode {
            Mode::Test => TEST_TSP_URL,
            Mode::Production => PROD_TSP_URL,
        }),
        Setting::TslLocation => Some(match mode {
            Mode::Test => TEST_TSL_LOCATION,
            Mode::Production => PROD_TSL_LOCATION,
        }),
        Setting::ValidationPolicy => Some(match mode {
            Mode::Test => TEST_VALIDATION_POLICY,
            Mode::Production => PROD_VALIDATION_POLICY,
        }),
        Setting::KeystoreLocation => Some(match mode {
            Mode::Test => TEST_KEYSTORE_LOCATION,
            Mode::Production => PROD_KEYSTORE_LOCATION,
        }),
        Setting::SignRequests => Some(match mode {
            Mode::Test => "false",
            Mode::Production => "true",
        }),
        _ => None,
    }
}

/// Hardcoded default shared by all modes, the lowest resolution layer
pub fn constant_default(setting: Setting) -> Option<&'static str> {
    match setting {
        Setting::ConnectionTimeout => Some("1000"),
        Setting::MaxFileCached => Some("-1"),
        Setting::Pkcs11Module => Some(PKCS11_MODULE_PATH),
        Setting::KeystorePassword => Some(KEYSTORE_PASSWORD),
        _ => None,
    }
}
