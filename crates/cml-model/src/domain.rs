//! Domains: named namespaces owning a set of models.

use std::collections::btree_map::{self, BTreeMap};
use std::sync::Arc;

use bitflags::bitflags;

use crate::error::{CombineError, ConstructionError};
use crate::model::Model;

bitflags! {
    /// Flags that may be declared on a domain.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct DomainFlags: u8 {
        /// Models of this domain are visible everywhere without qualification.
        const UBIQUITOUS = 1;
    }
}

/// A named group of models.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    name: String,
    flags: DomainFlags,
    models: BTreeMap<String, Arc<Model>>,
}

impl Domain {
    /// Build a domain, rejecting two models with the same name.
    pub fn new(
        name: impl Into<String>,
        flags: DomainFlags,
        models: impl IntoIterator<Item = Model>,
    ) -> Result<Self, ConstructionError> {
        let name = name.into();
        let mut by_name = BTreeMap::new();

        for model in models {
            match by_name.entry(model.name().to_string()) {
                btree_map::Entry::Occupied(_) => {
                    return Err(ConstructionError::DuplicateModel {
                        domain: name,
                        model: model.name().to_string(),
                    });
                }
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(Arc::new(model));
                }
            }
        }

        Ok(Self {
            name,
            flags,
            models: by_name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> DomainFlags {
        self.flags
    }

    pub fn is_ubiquitous(&self) -> bool {
        self.flags.contains(DomainFlags::UBIQUITOUS)
    }

    /// Models ordered by name.
    pub fn models(&self) -> impl Iterator<Item = &Model> + '_ {
        self.models.values().map(Arc::as_ref)
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name).map(Arc::as_ref)
    }

    pub fn contains_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Merge two declarations of the same domain into one.
    ///
    /// Both sides must agree on name and flags, and no model may be declared
    /// on both sides, not even an identical one. The result does not depend
    /// on which side is the receiver.
    pub fn combine(&self, other: &Domain) -> Result<Domain, CombineError> {
        if self.name != other.name {
            return Err(CombineError::NameMismatch {
                left: self.name.clone(),
                right: other.name.clone(),
            });
        }

        if self.flags != other.flags {
            return Err(CombineError::FlagMismatch {
                domain: self.name.clone(),
            });
        }

        let mut models = self.models.clone();
        for (name, model) in &other.models {
            match models.entry(name.clone()) {
                btree_map::Entry::Occupied(_) => {
                    return Err(CombineError::ModelCollision {
                        domain: self.name.clone(),
                        model: name.clone(),
                    });
                }
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(Arc::clone(model));
                }
            }
        }

        tracing::debug!(
            domain = %self.name,
            models = models.len(),
            "combined domain declarations"
        );

        Ok(Domain {
            name: self.name.clone(),
            flags: self.flags,
            models,
        })
    }
}
