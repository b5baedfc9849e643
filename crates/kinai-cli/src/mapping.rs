//! Mapping instructions given on the command line or in a TOML file.
//!
//! A mapping file looks like:
//!
//! ```toml
//! [mappings]
//! time = "TIME"
//! flux = "PDCSAP_FLUX"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use kinai_core::AnalysisSession;
use serde::Deserialize;

/// Parsed mapping file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingFile {
    /// Field id to CSV column.
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

impl MappingFile {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse mapping file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read mapping file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mappings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parses a `FIELD=COLUMN` argument. The column may contain `=`.
pub fn parse_assignment(arg: &str) -> std::result::Result<(String, String), String> {
    let Some((field, column)) = arg.split_once('=') else {
        return Err(format!("expected FIELD=COLUMN, got '{arg}'"));
    };
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field id in '{arg}'"));
    }
    Ok((field.to_string(), column.to_string()))
}

/// Applies explicit assignments in order, then optionally auto-maps the
/// fields that are still unmapped.
///
/// Returns the number of fields filled in by auto-mapping.
pub fn apply_mappings<'a>(
    session: &mut AnalysisSession,
    assignments: impl IntoIterator<Item = (&'a str, &'a str)>,
    auto: bool,
) -> Result<usize> {
    for (field, column) in assignments {
        if !session.schema().contains(field) {
            bail!(
                "unknown field '{field}' for registry '{}'",
                session.schema().name()
            );
        }
        session
            .update_mapping(field, column)
            .with_context(|| format!("map field '{field}' to column '{column}'"))?;
    }

    if auto {
        let assigned = session.auto_map()?;
        tracing::debug!(assigned, "auto-mapped remaining fields");
        Ok(assigned)
    } else {
        Ok(0)
    }
}
