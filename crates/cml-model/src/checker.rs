//! Reference checking for complete environments.

use crate::domain::Domain;
use crate::env::{qualified_name, Environment};
use crate::error::{AttributeError, TypeError};
use crate::types::Type;

/// Check that every model referenced by an attribute type resolves from the
/// attribute's domain and is applied to the right number of arguments.
///
/// All problems are reported, not just the first one.
pub fn check_references(env: &Environment) -> Result<(), Vec<AttributeError>> {
    let mut checker = Checker::new(env);
    checker.check_environment();

    if checker.errors.is_empty() {
        Ok(())
    } else {
        Err(checker.errors)
    }
}

struct Checker<'a> {
    env: &'a Environment,
    errors: Vec<AttributeError>,
}

impl<'a> Checker<'a> {
    fn new(env: &'a Environment) -> Self {
        Self {
            env,
            errors: Vec::new(),
        }
    }

    fn check_environment(&mut self) {
        let env = self.env;
        for domain in env.domains() {
            for model in domain.models() {
                let prefix = qualified_name(domain, model);
                for attribute in model.attributes() {
                    let path = format!("{}.{}", prefix, attribute.name());
                    self.check_type(attribute.ty(), domain, &path);
                }
            }
        }
    }

    fn check_type(&mut self, ty: &Type, domain: &Domain, path: &str) {
        let Type::Model(model_type) = ty else {
            return;
        };

        let env = self.env;
        match env.resolve_model(&model_type.model_name, Some(domain)) {
            None => self.report(
                path,
                TypeError::UnresolvedReference {
                    name: model_type.model_name.clone(),
                    context: Some(domain.name().to_string()),
                },
            ),
            Some((owner, model)) if model.type_parameters().len() != model_type.type_arguments.len() => {
                self.report(
                    path,
                    TypeError::ArityMismatch {
                        model: qualified_name(owner, model),
                        expected: model.type_parameters().len(),
                        found: model_type.type_arguments.len(),
                    },
                )
            }
            Some(_) => {}
        }

        for argument in &model_type.type_arguments {
            self.check_type(argument, domain, path);
        }
    }

    fn report(&mut self, path: &str, source: TypeError) {
        self.errors.push(AttributeError {
            attribute: path.to_string(),
            source,
        });
    }
}
