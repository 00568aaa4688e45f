//! End-to-end dispatch scenarios.

use manifold::{Call, DispatchError, Expr, Namespace, Param, Signature, Value};

/// Route bind/resolution tracing to the test writer; `RUST_LOG=manifold=trace`
/// shows per-candidate verdicts.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn greeting_namespace() -> Namespace {
    init_tracing();
    let mut greetings = Namespace::new("greetings");
    for (lang, text) in [("English", "Hello"), ("French", "Bonjour")] {
        greetings
            .bind(
                "hello",
                Signature::new()
                    .param(Param::new("name").ty("str"))
                    .param(
                        Param::new("lang")
                            .ty("str")
                            .guard(Expr::name("lang").eq(Expr::str(lang))),
                    ),
                move |args| match args[0].as_str() {
                    Some(name) => Ok(Value::str(format!("{text}, {name}"))),
                    None => Err(DispatchError::implementation("name must be a string")),
                },
            )
            .unwrap();
    }
    greetings
        .bind(
            "hello",
            Signature::new()
                .param(Param::new("name").ty("str"))
                .param(Param::new("lang")),
            |_| Ok(Value::str("(unsupported language)")),
        )
        .unwrap();
    greetings
}

#[test]
fn language_predicates_pick_the_matching_greeting() {
    let greetings = greeting_namespace();

    let call = Call::new().arg("Ada").arg("English");
    assert_eq!(
        greetings.call("hello", &call).unwrap(),
        Value::str("Hello, Ada")
    );

    let call = Call::new().arg("Ada").arg("French");
    assert_eq!(
        greetings.call("hello", &call).unwrap(),
        Value::str("Bonjour, Ada")
    );
}

#[test]
fn unmodeled_language_falls_through_to_the_fallback() {
    let greetings = greeting_namespace();
    let call = Call::new().arg("Ada").arg("Lojban");
    assert_eq!(
        greetings.call("hello", &call).unwrap(),
        Value::str("(unsupported language)")
    );
}

#[test]
fn keyword_form_matches_the_positional_form() {
    let greetings = greeting_namespace();
    let positional = Call::new().arg("Ada").arg("English");
    let keyword = Call::new().kw("lang", "English").kw("name", "Ada");
    assert_eq!(
        greetings.call("hello", &positional).unwrap(),
        greetings.call("hello", &keyword).unwrap()
    );
}

#[test]
fn one_step_subclass_wins_in_the_parameter_it_specializes() {
    let mut namespace = Namespace::new("Disp");
    let special = namespace.register_type("SpecialInt", &["int"]).unwrap();

    for (a, b, tag) in [
        ("int", "int", "int,int"),
        ("SpecialInt", "int", "SpecialInt,int"),
        ("int", "SpecialInt", "int,SpecialInt"),
    ] {
        namespace
            .bind(
                "show",
                Signature::new()
                    .param(Param::new("a").ty(a))
                    .param(Param::new("b").ty(b)),
                move |_| Ok(Value::str(tag)),
            )
            .unwrap();
    }

    let n = Value::instance(special, vec![Value::int(13)]);

    let call = Call::new().arg(n.clone()).arg(Value::int(7));
    assert_eq!(
        namespace.call("show", &call).unwrap(),
        Value::str("SpecialInt,int")
    );

    let call = Call::new().arg(Value::int(11)).arg(n.clone());
    assert_eq!(
        namespace.call("show", &call).unwrap(),
        Value::str("int,SpecialInt")
    );

    let call = Call::new().arg(Value::int(11)).arg(Value::int(3));
    assert_eq!(namespace.call("show", &call).unwrap(), Value::str("int,int"));
}

#[test]
fn no_match_error_carries_the_original_call() {
    let greetings = greeting_namespace();
    let call = Call::new().arg(Value::int(42)).kw("lang", "English");
    match greetings.call("hello", &call) {
        Err(DispatchError::NoMatch(error)) => {
            assert_eq!(error.function, "hello");
            assert_eq!(error.positional, vec![Value::int(42)]);
            assert_eq!(
                error.keyword,
                vec![("lang".to_string(), Value::str("English"))]
            );
        }
        other => panic!("expected NoMatch, got {other:?}"),
    }
}

#[test]
fn registry_stays_open_for_extension() {
    let mut greetings = greeting_namespace();
    let call = Call::new().arg(Value::int(42)).arg("English");
    assert!(matches!(
        greetings.call("hello", &call),
        Err(DispatchError::NoMatch(_))
    ));

    // Binding a fully permissive implementation afterwards handles the
    // previously unmatched call without disturbing existing winners.
    greetings
        .bind(
            "hello",
            Signature::new().param(Param::new("name")).param(Param::new("lang")),
            |_| Ok(Value::str("(whoever you are)")),
        )
        .unwrap();

    assert_eq!(
        greetings.call("hello", &call).unwrap(),
        Value::str("(whoever you are)")
    );
    let call = Call::new().arg("Ada").arg("English");
    assert_eq!(
        greetings.call("hello", &call).unwrap(),
        Value::str("Hello, Ada")
    );
}
