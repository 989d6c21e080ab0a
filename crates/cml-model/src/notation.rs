//! Textual notation for types.
//!
//! ```text
//! ParamType  := "P:" Identifier
//! ModelType  := "M:" QualifiedName
//!            |  "GM:" QualifiedName "<" TypeList ">"
//! TypeList   := Type ("," Type)*
//! ```

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::Domain;
use crate::env::Environment;
use crate::error::{NotationError, TypeError};
use crate::normalize::normalize;
use crate::types::Type;

const PARAMETER_PREFIX: &str = "P:";
const MODEL_PREFIX: &str = "M:";
const GENERIC_MODEL_PREFIX: &str = "GM:";

const GENERIC_OPEN: char = '<';
const GENERIC_CLOSE: char = '>';
const SEPARATOR: char = ',';

/// Render the canonical notation of `ty`.
///
/// The type is normalized first, so every spelling of the same type yields
/// the same string.
pub fn to_notation(ty: &Type, env: &Environment, context: Option<&Domain>) -> Result<String, TypeError> {
    Ok(normalize(ty, env, context)?.to_string())
}

/// Parse a type from its notation. No environment is needed; names are
/// taken as written.
pub fn parse_notation(text: &str) -> Result<Type, NotationError> {
    parse_at(text, 0)
}

impl FromStr for Type {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_notation(s)
    }
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

fn parse_at(text: &str, base: usize) -> Result<Type, NotationError> {
    if let Some(rest) = text.strip_prefix(PARAMETER_PREFIX) {
        let offset = base + PARAMETER_PREFIX.len();
        check_name(rest, offset)?;
        return Ok(Type::parameter(rest));
    }

    if let Some(rest) = text.strip_prefix(MODEL_PREFIX) {
        let offset = base + MODEL_PREFIX.len();
        check_name(rest, offset)?;
        return Ok(Type::simple(rest));
    }

    if let Some(rest) = text.strip_prefix(GENERIC_MODEL_PREFIX) {
        let offset = base + GENERIC_MODEL_PREFIX.len();
        let end = base + text.len();

        let open = rest
            .find(GENERIC_OPEN)
            .ok_or(NotationError::UnmatchedDelimiter { offset: end })?;
        let name = &rest[..open];
        check_name(name, offset)?;

        let inner = rest[open + 1..]
            .strip_suffix(GENERIC_CLOSE)
            .ok_or(NotationError::UnmatchedDelimiter { offset: end })?;
        let inner_offset = offset + open + 1;

        let arguments = split_arguments(inner)
            .map_err(|e| e.at(inner_offset))?
            .into_iter()
            .map(|(start, argument)| parse_at(argument, inner_offset + start))
            .collect::<Result<Vec<_>, _>>()?;

        return Ok(Type::model(name, arguments));
    }

    Err(NotationError::UnknownPrefix { offset: base })
}

fn check_name(name: &str, offset: usize) -> Result<(), NotationError> {
    if name.is_empty() {
        return Err(NotationError::EmptyName { offset });
    }

    match name
        .char_indices()
        .find(|(_, c)| matches!(*c, GENERIC_OPEN | GENERIC_CLOSE | SEPARATOR) || c.is_whitespace())
    {
        Some((i, found)) => Err(NotationError::UnexpectedCharacter {
            offset: offset + i,
            found,
        }),
        None => Ok(()),
    }
}

/// Split a generic argument list at top-level separators, returning each
/// argument with its byte offset inside `inner`.
fn split_arguments(inner: &str) -> Result<Vec<(usize, &str)>, NotationError> {
    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match c {
            GENERIC_OPEN => depth += 1,
            GENERIC_CLOSE => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(NotationError::UnmatchedDelimiter { offset: i })?;
            }
            SEPARATOR if depth == 0 => {
                arguments.push(argument(inner, start, i)?);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(NotationError::UnmatchedDelimiter { offset: inner.len() });
    }

    arguments.push(argument(inner, start, inner.len())?);
    Ok(arguments)
}

fn argument(inner: &str, start: usize, end: usize) -> Result<(usize, &str), NotationError> {
    if start == end {
        return Err(NotationError::EmptyArgument { offset: start });
    }
    Ok((start, &inner[start..end]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainFlags;
    use crate::model::{Model, ModelFlags, TypeParameter};

    fn parse(text: &str) -> Type {
        parse_notation(text).unwrap()
    }

    #[test]
    fn test_parse_parameter() {
        assert_eq!(parse("P:P1"), Type::parameter("P1"));
    }

    #[test]
    fn test_parse_simple_model() {
        assert_eq!(parse("M:t.SimpleModel"), Type::simple("t.SimpleModel"));
    }

    #[test]
    fn test_parse_nested_generic() {
        let ty = parse("GM:t.Map<GM:t.Map<GM:t.List<P:P1>,GM:t.List<P:P2>>,P:P3>");

        assert_eq!(
            ty,
            Type::model(
                "t.Map",
                vec![
                    Type::model(
                        "t.Map",
                        vec![
                            Type::model("t.List", vec![Type::parameter("P1")]),
                            Type::model("t.List", vec![Type::parameter("P2")]),
                        ],
                    ),
                    Type::parameter("P3"),
                ],
            )
        );
    }

    #[test]
    fn test_display_parses_back() {
        let text = "GM:t.Map<GM:t.List<M:p.Int32>,P:P1>";
        assert_eq!(parse(text).to_string(), text);
    }

    #[test]
    fn test_parse_unknown_prefix() {
        assert_eq!(
            parse_notation("X:Thing"),
            Err(NotationError::UnknownPrefix { offset: 0 })
        );
        assert!(parse_notation("").is_err());
        assert!(parse_notation("t.Sequence<P:P1>").is_err());
    }

    #[test]
    fn test_parse_inverted_delimiters() {
        assert!(matches!(
            parse_notation("GM:SomeModel>P:P1<"),
            Err(NotationError::UnmatchedDelimiter { .. } | NotationError::UnexpectedCharacter { .. })
        ));
    }

    #[test]
    fn test_parse_empty_generic() {
        assert_eq!(
            parse_notation("GM:SomeModel<>"),
            Err(NotationError::EmptyArgument { offset: 13 })
        );
    }

    #[test]
    fn test_parse_empty_argument() {
        assert_eq!(
            parse_notation("GM:Map<P:A,>"),
            Err(NotationError::EmptyArgument { offset: 11 })
        );
        assert!(matches!(
            parse_notation("GM:Map<,P:A>"),
            Err(NotationError::EmptyArgument { offset: 7 })
        ));
    }

    #[test]
    fn test_parse_unmatched_delimiters() {
        assert!(matches!(
            parse_notation("GM:List<GM:List<P:A>"),
            Err(NotationError::UnmatchedDelimiter { .. })
        ));
        assert!(matches!(
            parse_notation("GM:List<P:A>>"),
            Err(NotationError::UnmatchedDelimiter { .. })
        ));
        assert!(matches!(
            parse_notation("GM:List"),
            Err(NotationError::UnmatchedDelimiter { offset: 7 })
        ));
        assert!(matches!(
            parse_notation("GM:List<P:A>tail"),
            Err(NotationError::UnmatchedDelimiter { .. })
        ));
    }

    #[test]
    fn test_parse_nested_error_offset() {
        assert_eq!(
            parse_notation("GM:Map<P:A,Q:B>"),
            Err(NotationError::UnknownPrefix { offset: 11 })
        );
    }

    #[test]
    fn test_parse_empty_names() {
        assert_eq!(parse_notation("P:"), Err(NotationError::EmptyName { offset: 2 }));
        assert_eq!(parse_notation("M:"), Err(NotationError::EmptyName { offset: 2 }));
        assert_eq!(parse_notation("GM:<P:A>"), Err(NotationError::EmptyName { offset: 3 }));
    }

    #[test]
    fn test_parse_rejects_delimiters_in_names() {
        assert_eq!(
            parse_notation("M:List<P:A>"),
            Err(NotationError::UnexpectedCharacter { offset: 6, found: '<' })
        );
        assert!(parse_notation("P:A B").is_err());
    }

    #[test]
    fn test_to_notation_normalizes() {
        let list = Model::new(
            "List",
            ModelFlags::empty(),
            vec![TypeParameter::new("T")],
            Vec::new(),
        )
        .unwrap();
        let int = Model::new("Int", ModelFlags::empty(), Vec::new(), Vec::new()).unwrap();
        let domain = Domain::new("core", DomainFlags::empty(), vec![list, int]).unwrap();
        let env = Environment::new(vec![domain.clone()]).unwrap();

        let relative = Type::model("List", vec![Type::parameter("Element")]);
        let qualified = Type::model("core.List", vec![Type::parameter("T")]);

        assert_eq!(
            to_notation(&relative, &env, Some(&domain)).unwrap(),
            "GM:core.List<P:P1>"
        );
        assert_eq!(
            to_notation(&qualified, &env, None).unwrap(),
            "GM:core.List<P:P1>"
        );
        assert_eq!(
            to_notation(&Type::simple("Int"), &env, Some(&domain)).unwrap(),
            "M:core.Int"
        );
        assert!(to_notation(&Type::simple("Int"), &env, None).is_err());
    }

    #[test]
    fn test_serde_uses_notation() {
        let ty = Type::model("core.List", vec![Type::parameter("P1")]);

        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(json, r#""GM:core.List<P:P1>""#);

        let back: Type = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);

        assert!(serde_json::from_str::<Type>(r#""GM:core.List<>""#).is_err());
    }
}
