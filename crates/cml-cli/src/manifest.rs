//! Environment manifests: JSON descriptions of domains and their models.

use std::collections::btree_map::{self, BTreeMap};
use std::path::Path;

use cml_model::{
    builtin, Attribute, Domain, DomainFlags, Environment, Model, ModelFlags, Type, TypeParameter,
};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub domains: Vec<DomainEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DomainEntry {
    pub name: String,
    #[serde(default)]
    pub ubiquitous: bool,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelEntry {
    pub name: String,
    #[serde(default)]
    pub builtin: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot read environment manifest {}", path.display()))?;
        Self::from_json(&source)
            .wrap_err_with(|| format!("invalid environment manifest {}", path.display()))
    }

    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).into_diagnostic()
    }

    /// Build the environment. Entries sharing a domain name are combined;
    /// the builtin domain is added when `builtins` is set.
    pub fn into_environment(self, builtins: bool) -> Result<Environment> {
        let mut domains: BTreeMap<String, Domain> = BTreeMap::new();

        for entry in self.domains {
            let domain = entry.into_domain()?;
            match domains.entry(domain.name().to_string()) {
                btree_map::Entry::Occupied(mut slot) => {
                    let combined = slot.get().combine(&domain)?;
                    slot.insert(combined);
                }
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(domain);
                }
            }
        }

        let mut domains: Vec<Domain> = domains.into_values().collect();
        if builtins {
            domains.push(builtin::domain()?);
        }

        let env = Environment::new(domains)?;
        tracing::info!(
            domains = env.domains().count(),
            models = env.model_count(),
            "loaded environment"
        );
        Ok(env)
    }
}

impl DomainEntry {
    fn into_domain(self) -> Result<Domain> {
        let flags = if self.ubiquitous {
            DomainFlags::UBIQUITOUS
        } else {
            DomainFlags::empty()
        };
        let models = self
            .models
            .into_iter()
            .map(ModelEntry::into_model)
            .collect::<Result<Vec<_>>>()?;

        Ok(Domain::new(self.name, flags, models)?)
    }
}

impl ModelEntry {
    fn into_model(self) -> Result<Model> {
        let flags = if self.builtin {
            ModelFlags::BUILTIN
        } else {
            ModelFlags::empty()
        };

        Ok(Model::new(
            self.name,
            flags,
            self.type_parameters.into_iter().map(TypeParameter::new),
            self.attributes
                .into_iter()
                .map(|attribute| Attribute::new(attribute.name, attribute.ty)),
        )?)
    }
}
