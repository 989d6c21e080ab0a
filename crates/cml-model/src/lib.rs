//! Semantic core of the CML modeling language.
//!
//! This crate provides:
//! - Type definitions (`types`)
//! - Models, domains and the environment with name resolution (`model`, `domain`, `env`)
//! - Canonicalization of types (`normalize`)
//! - The textual type notation (`notation`)
//! - Derivation scores between types (`derivation`)
//! - Reference checking for environments (`checker`)
//! - Builtin models and type-mapping tables (`builtin`, `mapping`)

pub mod types;
pub mod model;
pub mod domain;
pub mod env;
pub mod error;
pub mod normalize;
pub mod notation;
pub mod derivation;
pub mod checker;
pub mod builtin;
pub mod mapping;

pub use types::{ModelType, ParameterType, Type};
pub use model::{Attribute, Model, ModelFlags, TypeParameter};
pub use domain::{Domain, DomainFlags};
pub use env::{qualified_name, Environment};
pub use error::{AttributeError, CombineError, ConstructionError, MappingError, NotationError, TypeError};
pub use normalize::{normalize, type_of_model};
pub use notation::{parse_notation, to_notation};
pub use derivation::{compute_derivation_score, derivation, is_derivation, INCOMPATIBLE};
pub use checker::check_references;
pub use mapping::{Match, TypeMapping, TypeMappings};
