//! Canonical field identifiers and normalisation of user-supplied field specs.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace assumed for bare field names.
pub const DEFAULT_NAMESPACE: &str = "gas";

/// Canonical `(namespace, name)` pair. Both parts are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct FieldId {
    namespace: String,
    name: String,
}

impl FieldId {
    /// Build an identifier from parts that are already known to be valid.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().trim().to_string(),
            name: name.into().trim().to_string(),
        }
    }

    /// Shorthand for a field in the `gas` namespace.
    pub fn gas(name: impl Into<String>) -> Self {
        Self::new(DEFAULT_NAMESPACE, name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl From<(String, String)> for FieldId {
    fn from((namespace, name): (String, String)) -> Self {
        Self::new(namespace, name)
    }
}

impl From<FieldId> for (String, String) {
    fn from(id: FieldId) -> Self {
        (id.namespace, id.name)
    }
}

/// Field as written by a user: `density`, `gas:density` or `[gas, density]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Text(String),
    Parts(Vec<String>),
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(raw) => write!(f, "{raw}"),
            Self::Parts(parts) => write!(f, "{}", parts.join(":")),
        }
    }
}

impl From<&str> for FieldSpec {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_string())
    }
}

impl From<String> for FieldSpec {
    fn from(raw: String) -> Self {
        Self::Text(raw)
    }
}

impl From<(&str, &str)> for FieldSpec {
    fn from((namespace, name): (&str, &str)) -> Self {
        Self::Parts(vec![namespace.to_string(), name.to_string()])
    }
}

impl From<&FieldId> for FieldSpec {
    fn from(id: &FieldId) -> Self {
        Self::Parts(vec![id.namespace.clone(), id.name.clone()])
    }
}

fn checked(namespace: &str, name: &str, raw: &FieldSpec) -> CoreResult<FieldId> {
    let namespace = namespace.trim();
    let name = name.trim();
    if namespace.is_empty() || name.is_empty() {
        return Err(CoreError::InvalidFieldSpec {
            what: format!("empty namespace or name in '{raw}'"),
        });
    }
    Ok(FieldId::new(namespace, name))
}

/// Normalise a field spec into its canonical pair.
///
/// Bare names land in the `gas` namespace; `ns:name` splits on the first colon;
/// part lists use their first two entries and must have at least two.
pub fn normalize_field(spec: &FieldSpec) -> CoreResult<FieldId> {
    match spec {
        FieldSpec::Parts(parts) => {
            if parts.len() < 2 {
                return Err(CoreError::InvalidFieldSpec {
                    what: format!("field list must have at least two elements, got {}", parts.len()),
                });
            }
            checked(&parts[0], &parts[1], spec)
        }
        FieldSpec::Text(raw) => {
            let raw = raw.trim();
            match raw.split_once(':') {
                Some((namespace, name)) => checked(namespace, name, spec),
                None => checked(DEFAULT_NAMESPACE, raw, spec),
            }
        }
    }
}

/// Normalise an optional projection weight.
///
/// `None` and the literal `"None"` mean no weighting. The shortcuts `density`,
/// `cell_volume` and `cell_mass` map to fixed fields. Anything that fails
/// normal parsing is kept as a `gas` field named after the text following the
/// last colon, since a weight is never worth failing a render over.
pub fn normalize_weight_field(spec: Option<&FieldSpec>) -> Option<FieldId> {
    let spec = spec?;

    if let FieldSpec::Text(raw) = spec {
        match raw.trim() {
            "None" => return None,
            "density" => return Some(FieldId::new("gas", "density")),
            "cell_volume" => return Some(FieldId::new("index", "cell_volume")),
            "cell_mass" => return Some(FieldId::new("gas", "cell_mass")),
            _ => {}
        }
    }

    match normalize_field(spec) {
        Ok(id) => Some(id),
        Err(_) => {
            // Keep only the trailing name; a dangling separator means no weight.
            let fallback = spec.to_string();
            let name = fallback.rsplit(':').next().unwrap_or_default().trim();
            (!name.is_empty()).then(|| FieldId::gas(name))
        }
    }
}
