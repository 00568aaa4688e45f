//! Snapshot of the diagnostic description format.

use manifold::{Expr, Namespace, Param, PredicateError, Signature, Value};

fn build() -> Namespace {
    let mut nums = Namespace::new("nums");
    nums.binder()
        .using_fn("len", |args| match args {
            [Value::Str(s)] => Ok(Value::Int(s.len() as i64)),
            _ => Err(PredicateError::Host("len: expected one string".to_string())),
        })
        .bind(
            "is_prime",
            Signature::new()
                .param(
                    Param::new("n").ty("int").guard(
                        Expr::int(0)
                            .lt(Expr::name("n"))
                            .and(Expr::name("n").lt(Expr::int(1 << 16))),
                    ),
                )
                .param(
                    Param::new("color")
                        .ty("str")
                        .guard(Expr::call("len", [Expr::name("color")]).gt(Expr::int(3)))
                        .default("blue"),
                ),
            |_| Ok(Value::Bool(true)),
        )
        .unwrap();
    nums.bind(
        "is_prime",
        Signature::new()
            .param(Param::new("n").guard(Expr::name("n").lt(Expr::int(1 << 32))))
            .param(Param::new("color").default("red")),
        |_| Ok(Value::Bool(true)),
    )
    .unwrap();
    nums.binder()
        .name("is_prime")
        .bind(
            "miller_rabin",
            Signature::new()
                .param(Param::new("n").ty("int").guard(Expr::name("n").ge(Expr::int(1 << 32))))
                .param(Param::new("color").ty("str").default("green")),
            |_| Ok(Value::Bool(true)),
        )
        .unwrap();
    nums
}

#[test]
fn describe_renders_every_binding_in_order() {
    let nums = build();
    insta::assert_snapshot!(nums.describe().to_string(), @r#"
    nums bound implementations:
    - 0: is_prime(n: int & 0 < n && n < 65536, color: str & len(color) > 3)
    - 1: is_prime(n: * & n < 4294967296, color: * & true)
    - 2: is_prime(n: int & n >= 4294967296, color: str & true) (re-bound 'miller_rabin')
    "#);
}

#[test]
fn listing_round_trips_through_json() {
    let nums = build();
    let listing = nums.describe();
    let json = serde_json::to_string(&listing).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["namespace"], "nums");
    assert_eq!(parsed["functions"][0]["name"], "is_prime");
    assert_eq!(
        parsed["functions"][0]["implementations"][2]["original_name"],
        "miller_rabin"
    );
}
