//! Report identifiers and payloads.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Handle the remote service assigns to a queued report.
///
/// It is a plain token: copying it is free and nothing is released when it
/// is dropped. Identifiers are widened to `i64` whatever width the wire uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(i64);

impl ReportId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ReportId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for ReportId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Finished report exactly as the service returned it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportData(String);

impl ReportData {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ReportData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for ReportData {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Reject definitions that cannot describe any report.
///
/// The definition language belongs to the service, so this is the only check
/// made before sending it.
pub fn validate_definition(definition: &str) -> Result<(), ValidationError> {
    if definition.trim().is_empty() {
        return Err(ValidationError::EmptyDefinition);
    }
    Ok(())
}
