//! Parameter validation
//!
//! This module applies per-key type rules to raw string values before they
//! enter the resolved configuration. The rule table is a closed set keyed by
//! parameter name; keys outside the table are accepted unconditionally, only
//! known-risk parameters are checked. Validation never mutates state and
//! never aborts a pass on its own: it returns a verdict that the caller
//! aggregates.

use std::fmt;

use super::defaults::CACHE_ALL_FILES;
use super::resolver::Setting;

/// Parameters that accept case-insensitive "true"/"false" only
const BOOLEAN_PARAMETERS: [&str; 3] = ["SIGN_REQUESTS", "KEY_USAGE_CHECK", "HASHCODE_MODE"];

/// Rule violated by a rejected parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// Value must be "true" or "false", case-insensitive
    Boolean,
    /// Value must parse as a base-10 integer
    Integer,
    /// Value must be an integer no smaller than the bound
    MinimumValue(i64),
}

/// One rejected parameter value, pure data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub parameter: String,
    pub value: String,
    pub rule: ValidationRule,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            ValidationRule::Boolean => write!(
                f,
                "Configuration parameter {} should be set to true or false, but the actual value is: {}",
                self.parameter, self.value
            ),
            ValidationRule::Integer => write!(
                f,
                "Configuration parameter {} should have an integer value, but the actual value is: {}",
                self.parameter, self.value
            ),
            ValidationRule::MinimumValue(bound) => write!(
                f,
                "Configuration parameter {} should be an integer of {} or greater, but the actual value is: {}",
                self.parameter, bound, self.value
            ),
        }
    }
}

/// Validate one raw parameter value against the rule table
pub fn validate(key: &str, raw: &str) -> Result<(), ValidationError> {
    if BOOLEAN_PARAMETERS.contains(&key) {
        return validate_boolean(key, raw);
    }
    if key == Setting::MaxFileCached.key() {
        return validate_bounded_integer(key, raw, CACHE_ALL_FILES);
    }
    Ok(())
}

fn validate_boolean(key: &str, raw: &str) -> Result<(), ValidationError> {
    if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false") {
        Ok(())
    } else {
        Err(ValidationError {
            parameter: key.to_string(),
            value: raw.to_string(),
            rule: ValidationRule::Boolean,
        })
    }
}

fn validate_bounded_integer(key: &str, raw: &str, bound: i64) -> Result<(), ValidationError> {
    let parsed: i64 = raw.trim().parse().map_err(|_| ValidationError {
        parameter: key.to_string(),
        value: raw.to_string(),
        rule: ValidationRule::Integer,
    })?;

    if parsed < bound {
        return Err(ValidationError {
            parameter: key.to_string(),
            value: raw.to_string(),
            rule: ValidationRule::MinimumValue(bound),
        });
    }

    Ok(())
}
