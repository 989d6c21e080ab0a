//! Models provided by the toolchain.

use crate::domain::{Domain, DomainFlags};
use crate::error::ConstructionError;
use crate::model::{Model, ModelFlags, TypeParameter};
use crate::types::Type;

/// Name of the ubiquitous domain holding the builtin models.
pub const DOMAIN: &str = "cml.__builtin__";

/// A datatype with exactly two instances.
pub const BIT: &str = "Bit";

/// A simple collection of elements.
pub const SEQUENCE: &str = "Sequence";

/// The builtin domain. Ubiquitous, so its models resolve without qualification.
pub fn domain() -> Result<Domain, ConstructionError> {
    let bit = Model::new(BIT, ModelFlags::BUILTIN, Vec::new(), Vec::new())?;
    let sequence = Model::new(
        SEQUENCE,
        ModelFlags::BUILTIN,
        vec![TypeParameter::new("Element")],
        Vec::new(),
    )?;

    Domain::new(DOMAIN, DomainFlags::UBIQUITOUS, vec![bit, sequence])
}

/// Canonical type of `Bit`.
pub fn bit() -> Type {
    Type::simple(format!("{}.{}", DOMAIN, BIT))
}

/// Canonical type of `Sequence<element>`.
pub fn sequence(element: Type) -> Type {
    Type::model(format!("{}.{}", DOMAIN, SEQUENCE), vec![element])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use crate::normalize::{normalize, type_of_model};

    #[test]
    fn test_builtin_domain() {
        let domain = domain().unwrap();

        assert!(domain.is_ubiquitous());
        assert!(domain.models().all(Model::is_builtin));
        assert_eq!(domain.model(SEQUENCE).unwrap().type_parameters().len(), 1);
    }

    #[test]
    fn test_builtin_types_are_canonical() {
        let builtin = domain().unwrap();
        let env = Environment::new(vec![builtin.clone()]).unwrap();

        assert_eq!(bit().to_string(), "M:cml.__builtin__.Bit");
        assert_eq!(normalize(&Type::simple("Bit"), &env, None).unwrap(), bit());

        let sequence_model = builtin.model(SEQUENCE).unwrap();
        assert_eq!(
            type_of_model(&env, &builtin, sequence_model).unwrap(),
            sequence(Type::parameter("P1"))
        );
    }
}
