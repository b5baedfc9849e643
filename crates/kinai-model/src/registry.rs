//! Schema registries: fixed, ordered collections of schema fields.
//!
//! Each analysis mode has its own registry. Selecting a mode swaps the
//! active registry wholesale; registries are never edited once built.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::schema::{DataType, SchemaField};

/// An immutable, ordered list of schema fields with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaRegistry {
    name: String,
    fields: Vec<SchemaField>,
}

impl SchemaRegistry {
    /// Builds a registry, rejecting empty or duplicate field ids.
    pub fn new(name: impl Into<String>, fields: Vec<SchemaField>) -> Result<Self> {
        let name = name.into();
        let mut seen = HashSet::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if field.id.trim().is_empty() {
                return Err(ModelError::EmptyFieldId {
                    registry: name,
                    position,
                });
            }
            if !seen.insert(field.id.as_str()) {
                return Err(ModelError::DuplicateFieldId {
                    registry: name,
                    id: field.id.clone(),
                });
            }
        }
        Ok(Self { name, fields })
    }

    /// Loads a registry from a JSON array of field objects.
    ///
    /// Each object needs `id`, `label` and `dataType`; `required`,
    /// `description` and `example` are optional.
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self> {
        let name = name.into();
        let fields: Vec<SchemaField> =
            serde_json::from_str(json).map_err(|e| ModelError::InvalidDefinition {
                registry: name.clone(),
                message: e.to_string(),
            })?;
        Self::new(name, fields)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Analysis mode selected by the user. Each mode carries its own registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Light-curve columns, scored by the fast model.
    #[default]
    Simple,
    /// Transit and stellar parameters, scored by the deep model.
    Complex,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Simple => "simple",
            AnalysisMode::Complex => "complex",
        }
    }

    /// Returns the built-in registry for this mode.
    pub fn registry(&self) -> SchemaRegistry {
        match self {
            AnalysisMode::Simple => light_curve_schema(),
            AnalysisMode::Complex => extended_schema(),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(AnalysisMode::Simple),
            "complex" => Ok(AnalysisMode::Complex),
            _ => Err(format!("Unknown analysis mode: {s}")),
        }
    }
}

/// Minimal light-curve schema: time series of flux measurements.
pub fn light_curve_schema() -> SchemaRegistry {
    builtin(
        "light_curve",
        vec![
            SchemaField::new("time", "Time", DataType::Number)
                .required()
                .with_description("Observation time (days, hours, or timestamps)")
                .with_example("2451545.0"),
            SchemaField::new("flux", "Flux", DataType::Number)
                .required()
                .with_description("Observed light flux (normalized or in specific units)")
                .with_example("0.9998"),
            SchemaField::new("flux_error", "Flux Error", DataType::Number)
                .required()
                .with_description("Uncertainty in flux measurement")
                .with_example("0.0001"),
            SchemaField::new("quality_flag", "Quality Flag", DataType::Number)
                .required()
                .with_description("Quality indicator of the measurement")
                .with_example("0"),
        ],
    )
}

/// Extended schema: per-candidate transit and stellar parameters.
///
/// `global_view` and `local_view` carry serialized view vectors and are
/// passed through as text.
pub fn extended_schema() -> SchemaRegistry {
    builtin(
        "extended",
        vec![
            SchemaField::new("search_id", "ID", DataType::String)
                .required()
                .with_description("Unique identifier for the search")
                .with_example("K00752.01"),
            SchemaField::new("num_planet", "No. of Planet", DataType::Number)
                .required()
                .with_description("Planet number in the system")
                .with_example("1"),
            SchemaField::new("disposition", "Disposition", DataType::Number)
                .required()
                .with_description("Planet disposition status")
                .with_example("1"),
            SchemaField::new("ror", "Ratio Planet - Star", DataType::Number)
                .required()
                .with_description("Planet-to-star radius ratio")
                .with_example("0.1"),
            SchemaField::new("stellar_mass", "Stellar Mass", DataType::Number)
                .required()
                .with_description("Mass of the host star")
                .with_example("1.0"),
            SchemaField::new("ss_gravity", "Stellar Gravity", DataType::Number)
                .required()
                .with_description("Surface gravity of the star")
                .with_example("4.44"),
            SchemaField::new("global_view", "Global View", DataType::String)
                .required()
                .with_description("Global view parameters")
                .with_example("[]"),
            SchemaField::new("local_view", "Local View", DataType::String)
                .required()
                .with_description("Local view parameters")
                .with_example("[]"),
        ],
    )
}

fn builtin(name: &str, fields: Vec<SchemaField>) -> SchemaRegistry {
    // Built-in ids are literals above and unique by construction.
    SchemaRegistry {
        name: name.to_string(),
        fields,
    }
}
