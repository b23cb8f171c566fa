//! End-to-end tests for trust configuration resolution
//!
//! These tests exercise one full resolution pass each: load, flatten,
//! validate, aggregate, resolve.

use std::fs;

use trust_config::config::{CACHE_ALL_FILES, DEFAULT_DOCUMENT, ONE_MB_IN_BYTES};
use trust_config::{ConfigError, Configuration, Mode, Setting};

const TWO_AUTHORITIES: &str = r#"
OCSP_SOURCE: http://document.example.com/ocsp
MAX_FILE_CACHED: 10

AUTHORITIES:
- NAME: First Certification Centre
  TRADENAME: FIRST-CC
  CERTS:
  - certs/first.crt
  - certs/first-2011.crt
  OCSPS:
  - CA_CN: FIRST-CC
    CA_CERT: certs/first.crt
    CN: FIRST-CC OCSP RESPONDER
    URL: http://first.example.com/ocsp
    CERTS:
    - certs/first-ocsp.crt
- NAME: Second Certification Centre
  TRADENAME: SECOND-CC
  CERTS:
  - certs/second.crt
  OCSPS:
  - CA_CN: SECOND-CC
    CA_CERT: certs/second.crt
    CN: SECOND-CC OCSP RESPONDER
    URL: http://second.example.com/ocsp
    CERTS:
    - certs/second-ocsp.crt
    - certs/second-ocsp-2014.crt
  - CA_CN: SECOND-CC
    CA_CERT: certs/second.crt
    CN: SECOND-CC BACKUP RESPONDER
    URL: http://backup.second.example.com/ocsp
    CERTS:
    - certs/second-backup-ocsp.crt
"#;

fn loaded(mode: Mode, document: &str) -> Configuration {
    let mut configuration = Configuration::new(mode);
    configuration
        .load_from_reader(document.as_bytes())
        .expect("document should load");
    configuration
}

#[test]
fn test_flattened_counts_match_document_shape() {
    let configuration = loaded(Mode::Test, TWO_AUTHORITIES);
    let flat = configuration.flattened();

    assert_eq!(flat.get("CAS").map(String::as_str), Some("2"));
    assert_eq!(flat.get("AUTH_1_CERTS").map(String::as_str), Some("2"));
    assert_eq!(flat.get("AUTH_1_RESPONDERS").map(String::as_str), Some("1"));
    assert_eq!(flat.get("AUTH_2_CERTS").map(String::as_str), Some("1"));
    assert_eq!(flat.get("AUTH_2_RESPONDERS").map(String::as_str), Some("2"));
}

#[test]
fn test_derived_key_naming_is_bit_exact() {
    let configuration = loaded(Mode::Test, TWO_AUTHORITIES);
    let flat = configuration.flattened();

    // Authority certificates are always indexed from 1
    assert_eq!(flat.get("AUTH_1_CERT1").map(String::as_str), Some("certs/first.crt"));
    assert_eq!(
        flat.get("AUTH_1_CERT2").map(String::as_str),
        Some("certs/first-2011.crt")
    );

    // Responder certificates: bare primary key, then indexed from 2
    assert_eq!(
        flat.get("AUTH_2_RESPONDER_1_CERT").map(String::as_str),
        Some("certs/second-ocsp.crt")
    );
    assert_eq!(
        flat.get("AUTH_2_RESPONDER_1_CERT_2").map(String::as_str),
        Some("certs/second-ocsp-2014.crt")
    );
    assert!(!flat.contains_key("AUTH_2_RESPONDER_1_CERT_1"));

    assert_eq!(
        flat.get("AUTH_2_RESPONDER_2_URL").map(String::as_str),
        Some("http://backup.second.example.com/ocsp")
    );
}

#[test]
fn test_missing_responder_field_names_field_and_position() {
    let document = r#"
AUTHORITIES:
- NAME: First Certification Centre
  TRADENAME: FIRST-CC
  CERTS:
  - certs/first.crt
  OCSPS:
  - CA_CN: FIRST-CC
    CA_CERT: certs/first.crt
    CN: FIRST-CC OCSP RESPONDER
    CERTS:
    - certs/first-ocsp.crt
"#;
    let mut configuration = Configuration::new(Mode::Test);
    let err = configuration
        .load_from_reader(document.as_bytes())
        .unwrap_err();

    match err {
        ConfigError::Configuration { origin, report } => {
            assert_eq!(origin, "stream");
            assert_eq!(
                report,
                "Responder 1 of authority 1 is missing the required URL field"
            );
        }
        other => panic!("Unexpected error: {other:?}"),
    }
}

#[test]
fn test_responder_without_certificates_is_reported() {
    let document = r#"
AUTHORITIES:
- NAME: First Certification Centre
  TRADENAME: FIRST-CC
  CERTS:
  - certs/first.crt
  OCSPS:
  - CA_CN: FIRST-CC
    CA_CERT: certs/first.crt
    CN: FIRST-CC OCSP RESPONDER
    URL: http://first.example.com/ocsp
    CERTS: []
"#;
    let mut configuration = Configuration::new(Mode::Test);
    let err = configuration
        .load_from_reader(document.as_bytes())
        .unwrap_err();

    match err {
        ConfigError::Configuration { origin, report } => {
            assert_eq!(origin, "stream");
            assert_eq!(
                report,
                "Responder 1 of authority 1 has no certificate references"
            );
        }
        other => panic!("Unexpected error: {other:?}"),
    }
}

#[test]
fn test_zero_authorities_fails_with_empty_flat_map() {
    let mut configuration = Configuration::new(Mode::Test);
    let err = configuration
        .load_from_reader("AUTHORITIES: []\n".as_bytes())
        .unwrap_err();

    assert!(err.to_string().contains("No certificate authorities configured"));

    // Nothing was committed, only defaults remain in the flat view
    let flat = configuration.flattened();
    assert!(!flat.contains_key("CAS"));
}

#[test]
fn test_cache_limit_sentinel_and_scaling() {
    let sentinel = loaded(
        Mode::Test,
        "MAX_FILE_CACHED: -1\nAUTHORITIES:\n- NAME: A\n  TRADENAME: A\n  CERTS: [a.crt]\n",
    );
    assert_eq!(sentinel.max_file_cached_mb(), CACHE_ALL_FILES);
    assert_eq!(sentinel.max_file_cached_bytes(), CACHE_ALL_FILES);
    assert!(sentinel.big_files_supported());

    let bounded = loaded(Mode::Test, TWO_AUTHORITIES);
    assert_eq!(bounded.max_file_cached_mb(), 10);
    assert_eq!(bounded.max_file_cached_bytes(), 10 * ONE_MB_IN_BYTES);
}

#[test]
fn test_huge_cache_limit_saturates_in_bytes() {
    // i64::MAX megabytes passes validation; the byte form must not wrap
    let configuration = loaded(
        Mode::Test,
        "MAX_FILE_CACHED: 9223372036854775807\n\
         AUTHORITIES:\n- NAME: A\n  TRADENAME: A\n  CERTS: [a.crt]\n",
    );

    assert_eq!(configuration.max_file_cached_mb(), i64::MAX);
    assert_eq!(configuration.max_file_cached_bytes(), i64::MAX);
    assert!(configuration.big_files_supported());
}

#[test]
fn test_unparseable_cache_limit_cites_type_violation() {
    let mut configuration = Configuration::new(Mode::Test);
    let err = configuration
        .load_from_reader(
            "MAX_FILE_CACHED: abc\nAUTHORITIES:\n- NAME: A\n  TRADENAME: A\n  CERTS: [a.crt]\n"
                .as_bytes(),
        )
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("MAX_FILE_CACHED"));
    assert!(message.contains("integer"));
    assert!(message.contains("abc"));
}

#[test]
fn test_all_defects_surface_in_one_report() {
    let document = r#"
SIGN_REQUESTS: maybe
MAX_FILE_CACHED: -7

AUTHORITIES:
- TRADENAME: NAMELESS
  CERTS: []
"#;
    let mut configuration = Configuration::new(Mode::Test);
    let err = configuration
        .load_from_reader(document.as_bytes())
        .unwrap_err();

    let message = err.to_string();
    // One consolidated failure mentions every defect of the pass
    assert!(message.contains("Authority 1 is missing the required NAME field"));
    assert!(message.contains("Authority 1 has no certificate references"));
    assert!(message.contains("SIGN_REQUESTS"));
    assert!(message.contains("MAX_FILE_CACHED"));
}

#[test]
fn test_copy_is_independent_both_ways() {
    let original = loaded(Mode::Test, TWO_AUTHORITIES);
    let mut copy = original.copy();

    copy.set_value(Setting::OcspSource, "http://copy.example.com/");
    assert_eq!(original.ocsp_source(), "http://document.example.com/ocsp");
    assert_eq!(copy.ocsp_source(), "http://copy.example.com/");

    let mut original = original;
    original.set_value(Setting::TspSource, "http://original.example.com/tsa");
    assert_ne!(copy.tsp_source(), "http://original.example.com/tsa");

    // Flattened maps are independent snapshots as well
    assert_eq!(
        copy.flattened().get("AUTH_1_NAME"),
        original.flattened().get("AUTH_1_NAME")
    );
}

#[test]
fn test_override_precedence_and_fallback_to_document() {
    let mut configuration = loaded(Mode::Test, TWO_AUTHORITIES);

    // Document beats the mode default
    assert_eq!(configuration.ocsp_source(), "http://document.example.com/ocsp");

    // Override beats the document
    configuration.set_value(Setting::OcspSource, "http://override.example.com/");
    assert_eq!(configuration.ocsp_source(), "http://override.example.com/");

    // Clearing the override falls back to the document, not the mode default
    configuration.clear_value(Setting::OcspSource);
    assert_eq!(configuration.ocsp_source(), "http://document.example.com/ocsp");
}

#[test]
fn test_signing_requirement_follows_mode() {
    let test = Configuration::new(Mode::Test);
    assert!(!test.must_sign_requests());

    let production = Configuration::new(Mode::Production);
    assert!(production.must_sign_requests());
}

#[test]
fn test_bundled_default_document_loads() {
    let mut configuration = Configuration::new(Mode::Test);
    configuration
        .load_from_path(DEFAULT_DOCUMENT)
        .expect("bundled document should load");

    assert_eq!(configuration.origin(), Some("bundled:default-configuration.yaml"));
    let flat = configuration.flattened();
    assert_eq!(flat.get("CAS").map(String::as_str), Some("1"));
    assert!(!configuration.must_sign_requests());
}

#[test]
fn test_filesystem_document_shadows_nothing_when_absent() {
    let mut configuration = Configuration::new(Mode::Test);
    let err = configuration
        .load_from_path("definitely/not/here.yaml")
        .unwrap_err();
    assert!(matches!(err, ConfigError::ResourceNotFound(_)));
}

#[test]
fn test_document_loaded_from_file_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("trust.yaml");
    fs::write(&path, TWO_AUTHORITIES).expect("write document");

    let mut configuration = Configuration::new(Mode::Production);
    configuration
        .load_from_path(&path)
        .expect("file document should load");

    assert_eq!(configuration.origin(), Some(path.to_string_lossy().as_ref()));
    assert_eq!(
        configuration.flattened().get("CAS").map(String::as_str),
        Some("2")
    );
}

#[test]
fn test_malformed_document_fails_immediately() {
    let mut configuration = Configuration::new(Mode::Test);
    let err = configuration
        .load_from_reader("AUTHORITIES: [unterminated".as_bytes())
        .unwrap_err();

    // Parse failures are not aggregated with parameter errors
    assert!(matches!(err, ConfigError::MalformedDocument { .. }));
}
