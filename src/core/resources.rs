//! Resource quantity parsing and the resource vector used throughout the
//! reconciliation pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AutoscalerError;

/// A mapping from resource name (`cpu`, `memory`, `pods`, ...) to a
/// non-negative quantity. CPU is in cores, memory in bytes, pod count as
/// an integer — but the vector itself is resource-name-agnostic so the
/// same type serves capacity, usage, buffers and buffered demand.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceVector(pub BTreeMap<String, f64>);

impl ResourceVector {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, resource: &str) -> f64 {
        self.0.get(resource).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, resource: impl Into<String>, value: f64) {
        self.0.insert(resource.into(), value);
    }

    pub fn add(&mut self, resource: &str, value: f64) {
        *self.0.entry(resource.to_string()).or_insert(0.0) += value;
    }

    /// Adds every entry of `other` into `self`, summing shared resource
    /// names. Used by the usage aggregator (C4) to fold pod requests into
    /// a group total.
    pub fn merge_add(&mut self, other: &ResourceVector) {
        for (resource, value) in other.0.iter() {
            self.add(resource, *value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }

    pub fn cpu(&self) -> f64 {
        self.get("cpu")
    }

    pub fn memory(&self) -> f64 {
        self.get("memory")
    }

    pub fn pods(&self) -> f64 {
        self.get("pods")
    }
}

impl FromIterator<(String, f64)> for ResourceVector {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// `sufficient(have, need) ⇔ ∀r: have[r] ≤ need[r]`. A resource present
/// in `have` but absent from `need` defaults `need[r]` to 0, so it only
/// passes if `have[r] <= 0`; a resource present only in `need` never
/// fails (`have[r]` defaults to 0).
pub fn sufficient(have: &ResourceVector, need: &ResourceVector) -> bool {
    have.0.iter().all(|(resource, value)| *value <= need.get(resource))
}

/// Parses the cluster's quantity grammar (`"100Mi"`, `"1m"`, `"2"`) into a
/// plain number. One-way decode only; round-tripping back to a quantity
/// string is not required.
pub fn parse_resource(raw: &str) -> Result<f64, AutoscalerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AutoscalerError::InvalidQuantity(raw.to_string()));
    }

    if let Some(number) = raw.strip_suffix('m') {
        return parse_plain(number, raw).map(|value| value * 1e-3);
    }

    const BINARY_SUFFIXES: [(&str, u32); 6] =
        [("Ki", 1), ("Mi", 2), ("Gi", 3), ("Ti", 4), ("Pi", 5), ("Ei", 6)];
    for (suffix, power) in BINARY_SUFFIXES {
        if let Some(number) = raw.strip_suffix(suffix) {
            return parse_plain(number, raw).map(|value| value * 1024f64.powi(power as i32));
        }
    }

    const DECIMAL_SUFFIXES: [(&str, u32); 6] =
        [("K", 1), ("M", 2), ("G", 3), ("T", 4), ("P", 5), ("E", 6)];
    for (suffix, power) in DECIMAL_SUFFIXES {
        if let Some(number) = raw.strip_suffix(suffix) {
            return parse_plain(number, raw).map(|value| value * 1000f64.powi(power as i32));
        }
    }

    parse_plain(raw, raw)
}

fn parse_plain(number: &str, original: &str) -> Result<f64, AutoscalerError> {
    number
        .parse::<f64>()
        .map_err(|_| AutoscalerError::InvalidQuantity(original.to_string()))
}
