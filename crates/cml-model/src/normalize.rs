//! Canonicalization of types.
//!
//! A normalized type refers to every model by its fully qualified name and
//! names its type parameters `P1`, `P2`, ... in order of first appearance, so
//! two normalized types are equal exactly when they denote the same type.

use std::collections::HashMap;

use crate::domain::Domain;
use crate::env::{qualified_name, Environment};
use crate::error::TypeError;
use crate::model::Model;
use crate::types::{ModelType, Type};

/// Rewrite `ty` into its canonical form.
///
/// Model names are resolved against `env` from `context`; parameter numbering
/// starts over on every call.
pub fn normalize(ty: &Type, env: &Environment, context: Option<&Domain>) -> Result<Type, TypeError> {
    Normalizer::new(env, context).normalize(ty)
}

/// The most generic type of `model`: the model applied to its own type
/// parameters, normalized. Used as the key of a model in mapping tables.
pub fn type_of_model(env: &Environment, domain: &Domain, model: &Model) -> Result<Type, TypeError> {
    let ty = Type::model(
        model.name(),
        model
            .type_parameters()
            .iter()
            .map(|parameter| Type::parameter(parameter.name()))
            .collect(),
    );

    normalize(&ty, env, Some(domain))
}

struct Normalizer<'a> {
    env: &'a Environment,
    context: Option<&'a Domain>,
    /// Original parameter name to canonical name.
    parameters: HashMap<String, String>,
}

impl<'a> Normalizer<'a> {
    fn new(env: &'a Environment, context: Option<&'a Domain>) -> Self {
        Self {
            env,
            context,
            parameters: HashMap::new(),
        }
    }

    fn normalize(&mut self, ty: &Type) -> Result<Type, TypeError> {
        match ty {
            Type::Parameter(parameter) => {
                let next = self.parameters.len() + 1;
                let canonical = self
                    .parameters
                    .entry(parameter.type_parameter_name.clone())
                    .or_insert_with(|| format!("P{}", next));
                Ok(Type::parameter(canonical.clone()))
            }
            Type::Model(model) => self.normalize_model(model),
        }
    }

    fn normalize_model(&mut self, model: &ModelType) -> Result<Type, TypeError> {
        let (domain, resolved) = self
            .env
            .resolve_model(&model.model_name, self.context)
            .ok_or_else(|| TypeError::UnresolvedReference {
                name: model.model_name.clone(),
                context: self.context.map(|domain| domain.name().to_string()),
            })?;
        let name = qualified_name(domain, resolved);

        let arguments = model
            .type_arguments
            .iter()
            .map(|argument| self.normalize(argument))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Type::model(name, arguments))
    }
}
