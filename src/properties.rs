//! Property Definition Views
//!
//! Merges the property metadata a component type declares with the live
//! values of one component, producing [`admin::PropertyDefinition`] views.
//! Without type metadata, a flat property map still yields minimal views.

use crate::admin;
use crate::engine::{ComponentType, Properties};
use crate::error::{AdminError, AdminResult};
use crate::services::CryptoService;

/// Builds property definition views.
pub struct PropertyDefinitionBuilder;

impl PropertyDefinitionBuilder {
    /// One view per property the type declares, in declaration order.
    ///
    /// Values come from `live` by property name; a property with no live
    /// value gets `None`. Live entries the type does not declare are ignored.
    pub fn from_component_type(
        ctype: &ComponentType,
        live: &Properties,
    ) -> Vec<admin::PropertyDefinition> {
        ctype
            .definitions
            .iter()
            .map(|def| {
                let mut view = admin::PropertyDefinition::new(def.name.as_str());
                view.allowed_values.clone_from(&def.allowed_values);
                view.constrained_to_allowed_values = def.constrained_to_allowed_values;
                view.default_value.clone_from(&def.default_value);
                view.description.clone_from(&def.short_description);
                view.display_name.clone_from(&def.display_name);
                view.expert = def.expert;
                view.hidden = def.hidden;
                view.masked = def.masked;
                view.minimum_multiplicity = def.multiplicity.minimum;
                view.maximum_multiplicity = def.multiplicity.maximum;
                view.modifiable = def.modifiable;
                view.preferred = def.preferred;
                view.property_type = Some(def.property_type.display_name().to_string());
                view.property_type_representation =
                    Some(def.property_type.representation().to_string());
                view.required = def.required;
                view.requires_restart = def.requires_restart;
                view.value_delimiter.clone_from(&def.value_delimiter);
                view.value = live.get(&def.name).cloned();
                view
            })
            .collect()
    }

    /// Minimal view per map entry: display name is the key, no constraints.
    pub fn from_properties(properties: &Properties) -> Vec<admin::PropertyDefinition> {
        properties
            .iter()
            .map(|(key, value)| {
                let mut view = admin::PropertyDefinition::new(key.as_str());
                view.value = Some(value.clone());
                view
            })
            .collect()
    }

    /// Encrypt `value` when the type marks the property masked, otherwise
    /// return it unchanged.
    pub fn protect_value(
        name: &str,
        value: &str,
        ctype: Option<&ComponentType>,
        crypto: &dyn CryptoService,
    ) -> AdminResult<String> {
        if is_masked_property(name, ctype) {
            crypto.encrypt_string(value).map_err(AdminError::from)
        } else {
            Ok(value.to_string())
        }
    }
}

/// True only when `ctype` is known, declares `name`, and marks it masked.
///
/// Fails open: with no type metadata every property reads as not masked.
pub fn is_masked_property(name: &str, ctype: Option<&ComponentType>) -> bool {
    ctype
        .and_then(|t| t.definition(name))
        .is_some_and(|d| d.masked)
}
