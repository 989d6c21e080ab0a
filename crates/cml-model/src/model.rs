//! Models, their type parameters and attributes.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashSet;

use bitflags::bitflags;

use crate::error::ConstructionError;
use crate::types::Type;

bitflags! {
    /// Flags that may be declared on a model.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct ModelFlags: u8 {
        /// The model is provided by the toolchain rather than declared by a user.
        const BUILTIN = 1;
    }
}

/// A named generic placeholder declared by a model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeParameter {
    name: String,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A named, typed member of a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    name: String,
    ty: Type,
}

impl Attribute {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }
}

/// A named, optionally generic record type.
///
/// Attributes are kept as a set keyed by name, so two models declaring the
/// same attributes in a different order are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Model {
    name: String,
    flags: ModelFlags,
    type_parameters: Vec<TypeParameter>,
    attributes: BTreeMap<String, Attribute>,
}

impl Model {
    /// Build a model, rejecting duplicate type parameters, duplicate
    /// attributes and attribute types that use undeclared type parameters.
    pub fn new(
        name: impl Into<String>,
        flags: ModelFlags,
        type_parameters: impl IntoIterator<Item = TypeParameter>,
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> Result<Self, ConstructionError> {
        let name = name.into();
        let type_parameters: Vec<TypeParameter> = type_parameters.into_iter().collect();

        let mut declared = HashSet::new();
        for parameter in &type_parameters {
            if !declared.insert(parameter.name()) {
                return Err(ConstructionError::DuplicateTypeParameter {
                    model: name,
                    parameter: parameter.name().to_string(),
                });
            }
        }

        let mut by_name = BTreeMap::new();
        for attribute in attributes {
            if let Some(parameter) = attribute
                .ty()
                .parameter_names()
                .into_iter()
                .find(|parameter| !declared.contains(parameter))
            {
                return Err(ConstructionError::UndeclaredTypeParameter {
                    model: name,
                    attribute: attribute.name().to_string(),
                    parameter: parameter.to_string(),
                });
            }

            match by_name.entry(attribute.name().to_string()) {
                btree_map::Entry::Occupied(_) => {
                    return Err(ConstructionError::DuplicateAttribute {
                        model: name,
                        attribute: attribute.name().to_string(),
                    });
                }
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(attribute);
                }
            }
        }

        Ok(Self {
            name,
            flags,
            type_parameters,
            attributes: by_name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> ModelFlags {
        self.flags
    }

    pub fn is_builtin(&self) -> bool {
        self.flags.contains(ModelFlags::BUILTIN)
    }

    /// Type parameters in declaration order.
    pub fn type_parameters(&self) -> &[TypeParameter] {
        &self.type_parameters
    }

    /// Attributes ordered by name.
    pub fn attributes(&self) -> btree_map::Values<'_, String, Attribute> {
        self.attributes.values()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}
