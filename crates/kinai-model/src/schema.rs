//! Schema field definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Declared type of a schema field. Drives value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(DataType::String),
            "number" => Ok(DataType::Number),
            "boolean" => Ok(DataType::Boolean),
            "date" => Ok(DataType::Date),
            other => Err(ModelError::UnknownDataType(other.to_string())),
        }
    }
}

/// A named, typed target attribute that an uploaded column may be mapped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub data_type: DataType,
}

impl SchemaField {
    /// Creates an optional field with no documentation strings.
    pub fn new(id: impl Into<String>, label: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            example: None,
            required: false,
            data_type,
        }
    }

    /// Marks the field as required for completeness gating.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_round_trips_through_str() {
        for dt in [
            DataType::String,
            DataType::Number,
            DataType::Boolean,
            DataType::Date,
        ] {
            assert_eq!(dt.as_str().parse::<DataType>().unwrap(), dt);
        }
        assert!("json".parse::<DataType>().is_err());
        assert_eq!(" Number ".parse::<DataType>().unwrap(), DataType::Number);
    }

    #[test]
    fn field_uses_camel_case_keys() {
        let field = SchemaField::new("flux", "Flux", DataType::Number)
            .required()
            .with_example("0.9998");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["dataType"], "number");
        assert_eq!(json["required"], true);
        assert_eq!(json["example"], "0.9998");
        assert!(json.get("description").is_none());
    }
}
