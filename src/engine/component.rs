//! Component types and their declared property definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type of a configurable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    /// String value that must never be shown in clear text
    Password,
    Url,
    /// Multi-valued string split on the definition's value delimiter
    List,
}

impl PropertyType {
    /// Human-readable type name shown by management tooling.
    pub fn display_name(self) -> &'static str {
        match self {
            PropertyType::String => "String",
            PropertyType::Integer => "Integer",
            PropertyType::Long => "Long",
            PropertyType::Float => "Float",
            PropertyType::Double => "Double",
            PropertyType::Boolean => "Boolean",
            PropertyType::Password => "Password",
            PropertyType::Url => "URL",
            PropertyType::List => "List",
        }
    }

    /// Name of the underlying value representation.
    pub fn representation(self) -> &'static str {
        match self {
            PropertyType::String | PropertyType::Password | PropertyType::Url => "string",
            PropertyType::Integer => "i32",
            PropertyType::Long => "i64",
            PropertyType::Float => "f32",
            PropertyType::Double => "f64",
            PropertyType::Boolean => "bool",
            PropertyType::List => "list<string>",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How many values a property accepts. `maximum: None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiplicity {
    pub minimum: u32,
    pub maximum: Option<u32>,
}

impl Default for Multiplicity {
    fn default() -> Self {
        Multiplicity {
            minimum: 0,
            maximum: Some(1),
        }
    }
}

/// Metadata for one property declared by a component type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub allowed_values: Vec<String>,
    #[serde(default)]
    pub constrained_to_allowed_values: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub multiplicity: Multiplicity,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_true")]
    pub modifiable: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub expert: bool,
    #[serde(default)]
    pub preferred: bool,
    #[serde(default)]
    pub masked: bool,
    #[serde(default)]
    pub requires_restart: bool,
    #[serde(default)]
    pub value_delimiter: Option<String>,
}

fn default_true() -> bool {
    true
}

impl PropertyDefinition {
    /// Plain optional string property; display name defaults to the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        PropertyDefinition {
            display_name: name.clone(),
            name,
            short_description: String::new(),
            property_type: PropertyType::String,
            allowed_values: Vec::new(),
            constrained_to_allowed_values: false,
            default_value: None,
            multiplicity: Multiplicity::default(),
            required: false,
            modifiable: true,
            hidden: false,
            expert: false,
            preferred: false,
            masked: false,
            requires_restart: false,
            value_delimiter: None,
        }
    }

    pub fn with_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.short_description = description.into();
        self
    }

    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self.constrained_to_allowed_values = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.multiplicity.minimum = self.multiplicity.minimum.max(1);
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }
}

/// A registered kind of component with its declared properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentType {
    pub name: String,
    /// Declared properties, in declaration order
    #[serde(default)]
    pub definitions: Vec<PropertyDefinition>,
}

impl ComponentType {
    pub fn new(name: impl Into<String>) -> Self {
        ComponentType {
            name: name.into(),
            definitions: Vec::new(),
        }
    }

    pub fn with_definition(mut self, definition: PropertyDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Declared definition for a property, if any.
    pub fn definition(&self, property: &str) -> Option<&PropertyDefinition> {
        self.definitions.iter().find(|d| d.name == property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_lookup() {
        let ctype = ComponentType::new("Oracle")
            .with_definition(PropertyDefinition::new("URL").required())
            .with_definition(PropertyDefinition::new("Password").masked());
        assert!(ctype.definition("URL").is_some_and(|d| d.required));
        assert!(ctype.definition("Password").is_some_and(|d| d.masked));
        assert!(ctype.definition("User").is_none());
    }

    #[test]
    fn test_required_raises_minimum_multiplicity() {
        let def = PropertyDefinition::new("Host").required();
        assert_eq!(def.multiplicity.minimum, 1);
        assert_eq!(def.multiplicity.maximum, Some(1));
    }

    #[test]
    fn test_property_type_names() {
        assert_eq!(PropertyType::Integer.display_name(), "Integer");
        assert_eq!(PropertyType::Integer.representation(), "i32");
        assert_eq!(PropertyType::Password.representation(), "string");
        assert_eq!(PropertyType::Url.to_string(), "URL");
    }

    #[test]
    fn test_definition_serde_defaults() {
        let def: PropertyDefinition = serde_json::from_str(r#"{"name": "Port"}"#).unwrap();
        assert!(def.modifiable);
        assert!(!def.masked);
        assert_eq!(def.property_type, PropertyType::String);
        assert_eq!(def.multiplicity, Multiplicity::default());
    }
}
