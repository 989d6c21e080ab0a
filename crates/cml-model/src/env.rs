//! The environment: every domain visible to a compilation, and name resolution over them.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::Domain;
use crate::error::ConstructionError;
use crate::model::Model;

/// Separator between the domain part and the model part of a qualified name.
pub const QUALIFIER: char = '.';

/// Render the fully qualified name `domain.model`.
pub fn qualified_name(domain: &Domain, model: &Model) -> String {
    format!("{}{}{}", domain.name(), QUALIFIER, model.name())
}

/// An immutable set of domains with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    domains: BTreeMap<String, Arc<Domain>>,
}

impl Environment {
    /// Build an environment, rejecting duplicate domain names and models
    /// declared by more than one ubiquitous domain.
    pub fn new(domains: impl IntoIterator<Item = Domain>) -> Result<Self, ConstructionError> {
        let mut by_name = BTreeMap::new();

        for domain in domains {
            match by_name.entry(domain.name().to_string()) {
                btree_map::Entry::Occupied(_) => {
                    return Err(ConstructionError::DuplicateDomain {
                        name: domain.name().to_string(),
                    });
                }
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(Arc::new(domain));
                }
            }
        }

        // Ubiquitous models are visible unqualified from every domain.
        let mut visible: HashMap<&str, &str> = HashMap::new();
        for domain in by_name.values().filter(|domain| domain.is_ubiquitous()) {
            for model in domain.models() {
                if let Some(first) = visible.insert(model.name(), domain.name()) {
                    return Err(ConstructionError::CollidingUbiquitousModels {
                        model: model.name().to_string(),
                        first: first.to_string(),
                        second: domain.name().to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            domains = by_name.len(),
            ubiquitous_models = visible.len(),
            "environment assembled"
        );

        Ok(Self { domains: by_name })
    }

    /// Domains ordered by name.
    pub fn domains(&self) -> impl Iterator<Item = &Domain> + '_ {
        self.domains.values().map(Arc::as_ref)
    }

    /// Look up a domain by its exact name.
    pub fn resolve_domain(&self, name: &str) -> Option<&Domain> {
        self.domains.get(name).map(Arc::as_ref)
    }

    /// Resolve a possibly qualified model name.
    ///
    /// A name containing `.` is split at the last `.` and looked up in that
    /// domain only, ignoring `context`. A bare name is looked up in `context`
    /// first and then in the ubiquitous domains.
    pub fn resolve_model<'a>(
        &'a self,
        name: &str,
        context: Option<&'a Domain>,
    ) -> Option<(&'a Domain, &'a Model)> {
        if name.starts_with(QUALIFIER) || name.ends_with(QUALIFIER) {
            return None;
        }

        if let Some((domain_name, model_name)) = name.rsplit_once(QUALIFIER) {
            let domain = self.resolve_domain(domain_name)?;
            return domain.model(model_name).map(|model| (domain, model));
        }

        if let Some(found) = context.and_then(|domain| domain.model(name).map(|model| (domain, model))) {
            return Some(found);
        }

        self.domains()
            .filter(|domain| domain.is_ubiquitous())
            .find_map(|domain| domain.model(name).map(|model| (domain, model)))
    }

    /// Resolve a fully qualified model name without any context.
    pub fn resolve_qualified(&self, name: &str) -> Option<(&Domain, &Model)> {
        self.resolve_model(name, None)
    }

    /// Number of models across all domains.
    pub fn model_count(&self) -> usize {
        self.domains().map(|domain| domain.models().count()).sum()
    }
}
