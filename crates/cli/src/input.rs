// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! JSON point-set documents.
//!
//! ```json
//! {
//!   "keys": { "n": 4, "k": 3 },
//!   "1": { "base": "10", "value": "4" },
//!   "2": { "base": "2", "value": "111" }
//! }
//! ```

use anyhow::{anyhow, bail, Context, Result};
use rootfit_solver::Sample;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Names accepted for the control object.
const CONTROL_KEYS: [&str; 2] = ["keys", "key"];

#[derive(Debug, Deserialize)]
struct Keys {
    k: Option<usize>,
    n: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    /// Requested number of coefficients
    pub k: Option<usize>,
    /// Sample count announced by the document, if any
    pub declared_n: Option<usize>,
    pub samples: Vec<Sample>,
}

/// Read the document from `path`, or stdin when `path` is `None` or `-`.
pub fn read_document(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Could not read input file {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Could not read input from stdin")?;
            Ok(buf)
        }
    }
}

pub fn parse_point_set(document: &str) -> Result<PointSet> {
    let root: Value = serde_json::from_str(document).context("Input is not valid JSON")?;
    let Value::Object(root) = root else {
        bail!("Input must be a JSON object");
    };

    let keys = parse_keys(&root)?;

    let mut entries: Vec<(&String, &Value)> = root
        .iter()
        .filter(|(name, _)| !CONTROL_KEYS.contains(&name.as_str()))
        .collect();
    entries.sort_by_key(|(name, _)| entry_order(name));

    let mut samples = Vec::with_capacity(entries.len());
    for (name, entry) in entries {
        if let Some(sample) = parse_entry(name, entry)? {
            samples.push(sample);
        }
    }

    Ok(PointSet {
        k: keys.as_ref().and_then(|keys| keys.k),
        declared_n: keys.as_ref().and_then(|keys| keys.n),
        samples,
    })
}

fn parse_keys(root: &Map<String, Value>) -> Result<Option<Keys>> {
    let Some((name, value)) = CONTROL_KEYS
        .iter()
        .find_map(|name| root.get(*name).map(|value| (*name, value)))
    else {
        return Ok(None);
    };
    let keys = Keys::deserialize(value)
        .with_context(|| format!("Invalid \"{}\" object: expected {{\"n\", \"k\"}}", name))?;
    Ok(Some(keys))
}

/// Numeric names first in numeric order, then the rest lexically.
fn entry_order(name: &str) -> (bool, u64, String) {
    match name.parse::<u64>() {
        Ok(index) => (false, index, String::new()),
        Err(_) => (true, 0, name.to_string()),
    }
}

/// `Ok(None)` for structurally malformed entries, which are skipped.
fn parse_entry(name: &str, entry: &Value) -> Result<Option<Sample>> {
    let (Some(base), Some(value)) = (
        entry.get("base"),
        entry.get("value").and_then(Value::as_str),
    ) else {
        warn!(entry = name, "Skipping invalid entry");
        return Ok(None);
    };

    let base = match base {
        Value::String(s) => s
            .parse::<u32>()
            .map_err(|e| anyhow!("Entry \"{}\": invalid base \"{}\": {}", name, s, e))?,
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| anyhow!("Entry \"{}\": invalid base {}", name, n))?,
        _ => {
            warn!(entry = name, "Skipping invalid entry");
            return Ok(None);
        }
    };

    Ok(Some(Sample::new(name, value, base)))
}
