//! Authority and responder flattening
//!
//! This module walks the nested authority list of a loaded document and
//! re-keys it into a flat namespace of synthetically constructed identifiers:
//! `AUTH_<n>_*` for authorities and `AUTH_<n>_RESPONDER_<m>_*` for their OCSP
//! responders. Keys encode 1-based list position, so reordering the source
//! document changes every derived key; that is an accepted, documented
//! property of the format, not a defect.
//!
//! The walk never raises on missing data: it always finishes the whole
//! document and leaves every defect with the collector.

use std::collections::BTreeMap;

use log::debug;
use serde_yaml::Value;

use super::aggregator::ErrorCollector;

/// Top-level key of the authorities list
pub(crate) const AUTHORITIES_KEY: &str = "AUTHORITIES";

/// Flatten the authority tree of `document` into derived keys
///
/// Structural defects are recorded with `errors`; a missing or empty
/// authorities list produces no partial output.
pub(crate) fn flatten(
    document: &Value,
    errors: &mut ErrorCollector,
) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();

    let authorities = match document.get(AUTHORITIES_KEY).and_then(Value::as_sequence) {
        Some(list) if !list.is_empty() => list,
        _ => {
            errors.record("No certificate authorities configured");
            return flat;
        }
    };

    flat.insert("CAS".to_string(), authorities.len().to_string());
    for (index, authority) in authorities.iter().enumerate() {
        flatten_authority(index + 1, authority, &mut flat, errors);
    }

    debug!(
        "Flattened {} authorities into {} entries",
        authorities.len(),
        flat.len()
    );
    flat
}

fn flatten_authority(
    position: usize,
    authority: &Value,
    flat: &mut BTreeMap<String, String>,
    errors: &mut ErrorCollector,
) {
    let prefix = format!("AUTH_{position}");

    for field in ["NAME", "TRADENAME"] {
        match scalar_value(authority.get(field).unwrap_or(&Value::Null)) {
            Some(value) => {
                flat.insert(format!("{prefix}_{field}"), value);
            }
            None => errors.record(format!(
                "Authority {position} is missing the required {field} field"
            )),
        }
    }

    let certificates = scalar_sequence(authority.get("CERTS"));
    if certificates.is_empty() {
        errors.record(format!("Authority {position} has no certificate references"));
    }
    for (index, certificate) in certificates.iter().enumerate() {
        flat.insert(format!("{prefix}_CERT{}", index + 1), certificate.clone());
    }
    flat.insert(format!("{prefix}_CERTS"), certificates.len().to_string());

    let responders: &[Value] = authority
        .get("OCSPS")
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    flat.insert(format!("{prefix}_RESPONDERS"), responders.len().to_string());
    for (index, responder) in responders.iter().enumerate() {
        flatten_responder(position, index + 1, responder, flat, errors);
    }
}

fn flatten_responder(
    authority: usize,
    position: usize,
    responder: &Value,
    flat: &mut BTreeMap<String, String>,
    errors: &mut ErrorCollector,
) {
    let prefix = format!("AUTH_{authority}_RESPONDER_{position}");

    // The four required scalars are checked independently, so one responder
    // can contribute up to four distinct errors in a single pass.
    for field in ["CA_CN", "CA_CERT", "CN", "URL"] {
        match scalar_value(responder.get(field).unwrap_or(&Value::Null)) {
            Some(value) => {
                flat.insert(format!("{prefix}_{field}"), value);
            }
            None => errors.record(format!(
                "Responder {position} of authority {authority} is missing the required {field} field"
            )),
        }
    }

    let certificates = scalar_sequence(responder.get("CERTS"));
    if certificates.is_empty() {
        errors.record(format!(
            "Responder {position} of authority {authority} has no certificate references"
        ));
    }
    for (index, certificate) in certificates.iter().enumerate() {
        // The consumer expects a bare primary key: the first responder
        // certificate keeps the unindexed CERT suffix, later ones are
        // indexed from 2. Authority certificates are always indexed; the two
        // schemes are intentionally different and must not be unified.
        let key = if index == 0 {
            format!("{prefix}_CERT")
        } else {
            format!("{prefix}_CERT_{}", index + 1)
        };
        flat.insert(key, certificate.clone());
    }
}

/// Render a scalar node as its string form
///
/// YAML may parse unquoted booleans and numbers into typed scalars; the flat
/// namespace is string-valued, so they are rendered back.
pub(crate) fn scalar_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn scalar_sequence(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_sequence)
        .map(|sequence| sequence.iter().filter_map(scalar_value).collect())
        .unwrap_or_default()
}
