//! Tables mapping CML types to translation targets.
//!
//! A translator registers a target (a class name, a template, ...) per CML
//! type. Keys may be generic; looking up a concrete type picks the most
//! specific key the type derives from.

use std::collections::btree_map::{self, BTreeMap};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::derivation::derivation;
use crate::env::Environment;
use crate::error::MappingError;
use crate::normalize::normalize;
use crate::types::Type;

/// One entry of a mapping document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMapping<T> {
    pub cml_type: Type,
    pub target: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingDocument<T> {
    #[serde(default = "Vec::new")]
    type_mappings: Vec<TypeMapping<T>>,
}

/// The result of [`TypeMappings::best_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a, T> {
    pub cml_type: &'a Type,
    pub target: &'a T,
    /// Derivation score of the queried type against `cml_type`.
    pub score: u32,
}

/// A set of mappings with at most one target per CML type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMappings<T> {
    mappings: BTreeMap<Type, T>,
}

impl<T> Default for TypeMappings<T> {
    fn default() -> Self {
        Self {
            mappings: BTreeMap::new(),
        }
    }
}

impl<T> TypeMappings<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `{ "typeMappings": [ { "cmlType": ..., "target": ... } ] }` document.
    pub fn from_json(source: &str) -> Result<Self, MappingError>
    where
        T: DeserializeOwned,
    {
        let document: MappingDocument<T> = serde_json::from_str(source)?;
        let mut mappings = Self::new();
        for mapping in document.type_mappings {
            mappings.insert(mapping.cml_type, mapping.target)?;
        }
        Ok(mappings)
    }

    /// Add a mapping, rejecting a second target for the same type.
    pub fn insert(&mut self, cml_type: Type, target: T) -> Result<(), MappingError> {
        match self.mappings.entry(cml_type) {
            btree_map::Entry::Occupied(slot) => Err(MappingError::DuplicateKey {
                key: slot.key().to_string(),
            }),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(target);
                Ok(())
            }
        }
    }

    /// Re-normalize every key against `env`, so keys written with other
    /// parameter names or relative ubiquitous names match canonical types.
    pub fn canonicalize(self, env: &Environment) -> Result<Self, MappingError> {
        let mut canonical = Self::new();
        for (cml_type, target) in self.mappings {
            canonical.insert(normalize(&cml_type, env, None)?, target)?;
        }
        Ok(canonical)
    }

    /// Combine two tables. Where both map the same type, `self` wins.
    pub fn merge(mut self, secondary: Self) -> Self {
        for (cml_type, target) in secondary.mappings {
            self.mappings.entry(cml_type).or_insert(target);
        }
        self
    }

    /// The target registered for exactly `cml_type`.
    pub fn get(&self, cml_type: &Type) -> Option<&T> {
        self.mappings.get(cml_type)
    }

    /// Find the most specific mapping `ty` derives from.
    ///
    /// `ty` should be normalized. The lowest derivation score wins, so an
    /// exact key beats a generic one; ties go to the smallest key.
    pub fn best_match(&self, ty: &Type) -> Option<Match<'_, T>> {
        let found = self
            .mappings
            .iter()
            .filter_map(|(cml_type, target)| {
                derivation(ty, cml_type).map(|score| Match {
                    cml_type,
                    target,
                    score,
                })
            })
            .min_by_key(|candidate| candidate.score);

        if let Some(candidate) = &found {
            tracing::trace!(
                query = %ty,
                key = %candidate.cml_type,
                score = candidate.score,
                "selected type mapping"
            );
        }

        found
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Type, &T)> + '_ {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
