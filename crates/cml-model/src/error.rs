//! Error definitions.

use miette::Diagnostic;
use thiserror::Error;

/// A value could not be built because it would violate one of its invariants.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("duplicate model '{model}' in domain '{domain}'")]
    #[diagnostic(code(cml::construction::duplicate_model))]
    DuplicateModel { domain: String, model: String },

    #[error("duplicate domain '{name}' in environment")]
    #[diagnostic(code(cml::construction::duplicate_domain))]
    DuplicateDomain { name: String },

    #[error("duplicate type parameter '{parameter}' in model '{model}'")]
    #[diagnostic(code(cml::construction::duplicate_type_parameter))]
    DuplicateTypeParameter { model: String, parameter: String },

    #[error("duplicate attribute '{attribute}' in model '{model}'")]
    #[diagnostic(code(cml::construction::duplicate_attribute))]
    DuplicateAttribute { model: String, attribute: String },

    #[error(
        "attribute '{attribute}' of model '{model}' uses undeclared type parameter '{parameter}'"
    )]
    #[diagnostic(
        code(cml::construction::invalid_attribute_type),
        help("declare '{parameter}' in the type parameter list of '{model}'")
    )]
    UndeclaredTypeParameter {
        model: String,
        attribute: String,
        parameter: String,
    },

    #[error("model '{model}' is declared by the ubiquitous domains '{first}' and '{second}'")]
    #[diagnostic(
        code(cml::construction::colliding_ubiquitous_models),
        help("ubiquitous models are visible without qualification, so their names must be unique")
    )]
    CollidingUbiquitousModels {
        model: String,
        first: String,
        second: String,
    },
}

/// Two domain declarations could not be merged.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CombineError {
    #[error("cannot combine domain '{left}' with domain '{right}'")]
    #[diagnostic(code(cml::combine::name_mismatch))]
    NameMismatch { left: String, right: String },

    #[error("declarations of domain '{domain}' disagree on their flags")]
    #[diagnostic(code(cml::combine::flag_mismatch))]
    FlagMismatch { domain: String },

    #[error("model '{model}' is declared more than once in domain '{domain}'")]
    #[diagnostic(code(cml::combine::model_collision))]
    ModelCollision { domain: String, model: String },
}

/// A type could not be interpreted against an environment.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("unresolvable type reference '{name}'")]
    #[diagnostic(code(cml::type_error::unresolved_reference))]
    UnresolvedReference {
        name: String,
        context: Option<String>,
    },

    #[error("model '{model}' expects {expected} type argument(s), found {found}")]
    #[diagnostic(code(cml::type_error::arity_mismatch))]
    ArityMismatch {
        model: String,
        expected: usize,
        found: usize,
    },
}

/// A type error located at one attribute of a model.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("attribute '{attribute}': {source}")]
#[diagnostic(code(cml::type_error::attribute))]
pub struct AttributeError {
    /// Fully qualified attribute path, `domain.model.attribute`.
    pub attribute: String,
    #[source]
    pub source: TypeError,
}

/// The textual type notation could not be parsed.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("unknown type category prefix at offset {offset}")]
    #[diagnostic(
        code(cml::notation::unknown_prefix),
        help("a type starts with 'P:', 'M:' or 'GM:'")
    )]
    UnknownPrefix { offset: usize },

    #[error("empty name at offset {offset}")]
    #[diagnostic(code(cml::notation::empty_name))]
    EmptyName { offset: usize },

    #[error("unmatched generic delimiter at offset {offset}")]
    #[diagnostic(code(cml::notation::unmatched_delimiter))]
    UnmatchedDelimiter { offset: usize },

    #[error("empty generic argument at offset {offset}")]
    #[diagnostic(code(cml::notation::empty_argument))]
    EmptyArgument { offset: usize },

    #[error("unexpected character '{found}' at offset {offset}")]
    #[diagnostic(code(cml::notation::unexpected_character))]
    UnexpectedCharacter { offset: usize, found: char },
}

impl NotationError {
    /// Byte offset into the parsed text where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            NotationError::UnknownPrefix { offset } => *offset,
            NotationError::EmptyName { offset } => *offset,
            NotationError::UnmatchedDelimiter { offset } => *offset,
            NotationError::EmptyArgument { offset } => *offset,
            NotationError::UnexpectedCharacter { offset, .. } => *offset,
        }
    }

    /// Moves the reported offset by `by` bytes, used when a nested argument was parsed on its own.
    pub(crate) fn at(self, by: usize) -> Self {
        match self {
            NotationError::UnknownPrefix { offset } => NotationError::UnknownPrefix { offset: offset + by },
            NotationError::EmptyName { offset } => NotationError::EmptyName { offset: offset + by },
            NotationError::UnmatchedDelimiter { offset } => {
                NotationError::UnmatchedDelimiter { offset: offset + by }
            }
            NotationError::EmptyArgument { offset } => NotationError::EmptyArgument { offset: offset + by },
            NotationError::UnexpectedCharacter { offset, found } => NotationError::UnexpectedCharacter {
                offset: offset + by,
                found,
            },
        }
    }
}

/// A type mapping table could not be loaded or combined.
#[derive(Error, Diagnostic, Debug)]
pub enum MappingError {
    #[error("invalid mapping document: {0}")]
    #[diagnostic(code(cml::mapping::json))]
    Json(#[from] serde_json::Error),

    #[error("type '{key}' is mapped more than once")]
    #[diagnostic(code(cml::mapping::duplicate_key))]
    DuplicateKey { key: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Type(#[from] TypeError),
}
