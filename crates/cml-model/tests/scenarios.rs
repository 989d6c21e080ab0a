use cml_model::{
    builtin, check_references, compute_derivation_score, is_derivation, normalize, qualified_name,
    to_notation, type_of_model, Attribute, ConstructionError, Domain, DomainFlags, Environment,
    Model, ModelFlags, Type, TypeMappings, TypeParameter,
};
use pretty_assertions::assert_eq;

fn ty(text: &str) -> Type {
    text.parse().unwrap()
}

fn simple(name: &str) -> Model {
    Model::new(name, ModelFlags::empty(), Vec::new(), Vec::new()).unwrap()
}

fn organization() -> Environment {
    let first = Domain::new("org.example.1", DomainFlags::empty(), vec![simple("TestModel")]).unwrap();
    let second = Domain::new("org.example.2", DomainFlags::empty(), vec![simple("TestModel")]).unwrap();
    let external = Domain::new("org.extern", DomainFlags::UBIQUITOUS, vec![simple("Shared")]).unwrap();
    Environment::new(vec![first, second, external]).unwrap()
}

#[test]
fn test_model_derives_from_bare_parameter_with_score_one() {
    assert_eq!(compute_derivation_score(&ty("M:t.SimpleModel"), &ty("P:P1")), 1);
}

#[test]
fn test_unrelated_models_are_incompatible() {
    assert_eq!(compute_derivation_score(&ty("M:t.FirstModel"), &ty("M:t.SecondModel")), -1);
}

#[test]
fn test_generic_model_derives_from_any_parameter() {
    assert!(is_derivation(&ty("GM:SomeModel<P:P1>"), &ty("P:SomeParameter")));
}

#[test]
fn test_most_generic_type_of_complex_model() {
    let model = Model::new(
        "ComplexModel",
        ModelFlags::empty(),
        ["Param1", "SecondPar", "Par3", "_4thPar"].map(TypeParameter::new),
        Vec::new(),
    )
    .unwrap();
    let domain = Domain::new("__test_domain__", DomainFlags::empty(), vec![model]).unwrap();
    let env = Environment::new(vec![domain]).unwrap();
    let domain = env.resolve_domain("__test_domain__").unwrap();
    let model = domain.model("ComplexModel").unwrap();

    assert_eq!(
        type_of_model(&env, domain, model).unwrap(),
        ty("GM:__test_domain__.ComplexModel<P:P1,P:P2,P:P3,P:P4>")
    );
}

#[test]
fn test_qualified_lookup_ignores_context() {
    let env = organization();
    let second = env.resolve_domain("org.example.2").unwrap();
    let external = env.resolve_domain("org.extern").unwrap();

    for context in [None, Some(second), Some(external)] {
        let (domain, model) = env.resolve_model("org.example.1.TestModel", context).unwrap();
        assert_eq!(qualified_name(domain, model), "org.example.1.TestModel");
    }
}

#[test]
fn test_relative_lookup_uses_context_then_ubiquitous_domains() {
    let env = organization();
    let second = env.resolve_domain("org.example.2").unwrap();

    let (domain, _) = env.resolve_model("TestModel", Some(second)).unwrap();
    assert_eq!(domain.name(), "org.example.2");

    let (domain, _) = env.resolve_model("Shared", Some(second)).unwrap();
    assert_eq!(domain.name(), "org.extern");

    assert!(env.resolve_model("TestModel", None).is_none());
}

#[test]
fn test_colliding_ubiquitous_models_are_rejected() {
    let first = Domain::new("first", DomainFlags::UBIQUITOUS, vec![simple("CollidingModel")]).unwrap();
    let second = Domain::new("second", DomainFlags::UBIQUITOUS, vec![simple("CollidingModel")]).unwrap();

    assert_eq!(
        Environment::new(vec![first, second]),
        Err(ConstructionError::CollidingUbiquitousModels {
            model: "CollidingModel".into(),
            first: "first".into(),
            second: "second".into(),
        })
    );
}

#[test]
fn test_self_referential_model_is_supported() {
    let node = Model::new(
        "Node",
        ModelFlags::empty(),
        vec![TypeParameter::new("Value")],
        vec![
            Attribute::new("value", Type::parameter("Value")),
            Attribute::new("next", Type::model("Node", vec![Type::parameter("Value")])),
        ],
    )
    .unwrap();
    let graph = Domain::new("graph", DomainFlags::empty(), vec![node]).unwrap();
    let env = Environment::new(vec![graph, builtin::domain().unwrap()]).unwrap();
    let graph = env.resolve_domain("graph").unwrap();

    assert_eq!(check_references(&env), Ok(()));
    assert_eq!(
        to_notation(&ty("GM:Node<GM:Node<M:Bit>>"), &env, Some(graph)).unwrap(),
        "GM:graph.Node<GM:graph.Node<M:cml.__builtin__.Bit>>"
    );
}

#[test]
fn test_translator_picks_most_specific_mapping() {
    let env = Environment::new(vec![builtin::domain().unwrap()]).unwrap();
    let mappings: TypeMappings<String> = TypeMappings::from_json(
        r#"{ "typeMappings": [
            { "cmlType": "M:Bit", "target": "boolean" },
            { "cmlType": "GM:Sequence<P:E>", "target": "java.util.List" },
            { "cmlType": "GM:Sequence<M:Bit>", "target": "java.util.BitSet" }
        ] }"#,
    )
    .unwrap()
    .canonicalize(&env)
    .unwrap();

    let bits = normalize(&ty("GM:Sequence<M:Bit>"), &env, None).unwrap();
    let nested = normalize(&ty("GM:Sequence<GM:Sequence<M:Bit>>"), &env, None).unwrap();

    assert_eq!(mappings.best_match(&bits).unwrap().target, "java.util.BitSet");
    assert_eq!(mappings.best_match(&nested).unwrap().target, "java.util.List");
    assert_eq!(mappings.best_match(&builtin::bit()).unwrap().target, "boolean");
}
