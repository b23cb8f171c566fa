//! Document loading
//!
//! This module turns an external document source into an untyped value tree.
//! A named source is resolved against the filesystem first and the bundled
//! resource registry second, so that an external file can shadow a bundled
//! default. Streams are released on every path; the value tree lives only for
//! the duration of one resolution pass.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use serde_yaml::Value;

use crate::common::{ConfigError, Result};

/// Name of the bundled default trust document
pub const DEFAULT_DOCUMENT: &str = "default-configuration.yaml";

/// Documents compiled into the library, looked up by name when no
/// filesystem file matches
static BUNDLED_DOCUMENTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([(
        DEFAULT_DOCUMENT,
        include_str!("../../resources/default-configuration.yaml"),
    )])
});

/// Load a document by name, filesystem first, bundled resources second
///
/// Returns the parsed tree together with the origin label used in error
/// reports.
pub fn load_named(name: &str) -> Result<(Value, String)> {
    let path = Path::new(name);
    if path.is_file() {
        debug!("Loading configuration document from file: {}", name);
        let file = File::open(path)?;
        let document = parse_document(file, name)?;
        return Ok((document, name.to_string()));
    }

    if let Some(content) = BUNDLED_DOCUMENTS.get(name) {
        debug!("Loading bundled configuration document: {}", name);
        let origin = format!("bundled:{name}");
        let document = parse_document(content.as_bytes(), &origin)?;
        return Ok((document, origin));
    }

    Err(ConfigError::ResourceNotFound(name.to_string()))
}

/// Load a document from an already opened byte stream
pub fn load_reader<R: Read>(reader: R, origin: &str) -> Result<Value> {
    debug!("Loading configuration document from {}", origin);
    parse_document(reader, origin)
}

/// Parse a stream into a value tree
///
/// A parse failure is a single immediate error, never aggregated with
/// parameter defects: nothing downstream is meaningful without a tree. The
/// root must be a mapping.
fn parse_document<R: Read>(reader: R, origin: &str) -> Result<Value> {
    let document: Value =
        serde_yaml::from_reader(reader).map_err(|e| ConfigError::MalformedDocument {
            origin: origin.to_string(),
            detail: e.to_string(),
        })?;

    if document.as_mapping().is_none() {
        return Err(ConfigError::MalformedDocument {
            origin: origin.to_string(),
            detail: "document root is not a mapping".to_string(),
        });
    }

    Ok(document)
}
