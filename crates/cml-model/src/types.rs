//! Type definitions for CML.

use std::fmt;

/// A CML type: either a reference to a model or a type parameter hole.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    Model(ModelType),
    Parameter(ParameterType),
}

/// A reference to a model, applied to one argument per type parameter of that model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelType {
    /// Relative (`Model`) or qualified (`domain.Model`) model name.
    pub model_name: String,
    pub type_arguments: Vec<Type>,
}

/// A reference to a type parameter of the enclosing model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterType {
    pub type_parameter_name: String,
}

impl Type {
    /// Create a model type with the given arguments.
    pub fn model(name: impl Into<String>, type_arguments: Vec<Type>) -> Self {
        Type::Model(ModelType {
            model_name: name.into(),
            type_arguments,
        })
    }

    /// Create a model type without arguments.
    pub fn simple(name: impl Into<String>) -> Self {
        Type::model(name, Vec::new())
    }

    /// Create a type parameter reference.
    pub fn parameter(name: impl Into<String>) -> Self {
        Type::Parameter(ParameterType {
            type_parameter_name: name.into(),
        })
    }

    pub fn as_model(&self) -> Option<&ModelType> {
        match self {
            Type::Model(model) => Some(model),
            Type::Parameter(_) => None,
        }
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self, Type::Parameter(_))
    }

    /// Visit every parameter name in pre-order, left to right.
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_parameter_names(&mut names);
        names
    }

    fn collect_parameter_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Type::Parameter(parameter) => names.push(&parameter.type_parameter_name),
            Type::Model(model) => {
                for argument in &model.type_arguments {
                    argument.collect_parameter_names(names);
                }
            }
        }
    }
}

/// Renders the textual notation verbatim, without normalizing names first.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Parameter(parameter) => write!(f, "P:{}", parameter.type_parameter_name),
            Type::Model(model) if model.type_arguments.is_empty() => {
                write!(f, "M:{}", model.model_name)
            }
            Type::Model(model) => {
                write!(f, "GM:{}<", model.model_name)?;
                for (i, argument) in model.type_arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", argument)?;
                }
                f.write_str(">")
            }
        }
    }
}

impl From<ModelType> for Type {
    fn from(model: ModelType) -> Self {
        Type::Model(model)
    }
}

impl From<ParameterType> for Type {
    fn from(parameter: ParameterType) -> Self {
        Type::Parameter(parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parameter() {
        assert_eq!(Type::parameter("T").to_string(), "P:T");
    }

    #[test]
    fn test_display_simple_model() {
        assert_eq!(Type::simple("t.SimpleModel").to_string(), "M:t.SimpleModel");
    }

    #[test]
    fn test_display_nested_generic() {
        let ty = Type::model(
            "t.Map",
            vec![
                Type::model("t.List", vec![Type::simple("p.Int32")]),
                Type::parameter("P1"),
            ],
        );
        assert_eq!(ty.to_string(), "GM:t.Map<GM:t.List<M:p.Int32>,P:P1>");
    }

    #[test]
    fn test_structural_equality() {
        let a = Type::model("List", vec![Type::parameter("T")]);
        let b = Type::model(String::from("List"), vec![Type::parameter(String::from("T"))]);
        assert_eq!(a, b);
        assert_ne!(a, Type::model("List", vec![Type::parameter("U")]));
        assert_ne!(Type::simple("T"), Type::parameter("T"));
    }

    #[test]
    fn test_parameter_names_preorder() {
        let ty = Type::model(
            "Map",
            vec![
                Type::model("List", vec![Type::parameter("B")]),
                Type::parameter("A"),
                Type::parameter("B"),
            ],
        );
        assert_eq!(ty.parameter_names(), vec!["B", "A", "B"]);
    }
}
