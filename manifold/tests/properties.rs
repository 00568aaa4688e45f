//! Property tests for the resolution algorithm.

use manifold::{Call, Expr, Namespace, Param, Signature, Value};
use proptest::prelude::*;

const ADD_SIGNATURES: [(&str, &str, &str); 4] = [
    ("int", "int", "int+int"),
    ("Red", "Red", "Red+Red"),
    ("Red", "Blue", "Red+Blue"),
    ("Red", "int", "Red+int"),
];

/// Bind the `add` overload set in the given order over the hierarchy
/// `int ← Red ← Crimson`, `int ← Blue`.
fn color_namespace(order: &[usize]) -> Namespace {
    let mut namespace = Namespace::new("colors");
    namespace.register_type("Red", &["int"]).unwrap();
    namespace.register_type("Crimson", &["Red"]).unwrap();
    namespace.register_type("Blue", &["int"]).unwrap();

    for &index in order {
        let (a, b, tag) = ADD_SIGNATURES[index];
        namespace
            .bind(
                "add",
                Signature::new()
                    .param(Param::new("a").ty(a))
                    .param(Param::new("b").ty(b)),
                move |_| Ok(Value::str(tag)),
            )
            .unwrap();
    }
    namespace
}

fn crimson(namespace: &Namespace, n: i64) -> Value {
    let ty = namespace.hierarchy().lookup("Crimson").unwrap();
    Value::instance(ty, vec![Value::int(n)])
}

fn blue(namespace: &Namespace, n: i64) -> Value {
    let ty = namespace.hierarchy().lookup("Blue").unwrap();
    Value::instance(ty, vec![Value::int(n)])
}

proptest! {
    /// Bind order never changes the winner when the surviving candidates
    /// have distinct specificity scores.
    #[test]
    fn bind_order_is_irrelevant_under_strict_specificity(
        order in Just(vec![0usize, 1, 2, 3]).prop_shuffle()
    ) {
        let namespace = color_namespace(&order);

        let call = Call::new().arg(crimson(&namespace, 17)).arg(Value::int(19));
        prop_assert_eq!(namespace.call("add", &call).unwrap(), Value::str("Red+int"));

        let call = Call::new().arg(crimson(&namespace, 17)).arg(blue(&namespace, 21));
        prop_assert_eq!(namespace.call("add", &call).unwrap(), Value::str("Red+Blue"));
    }

    /// A fixed registry and a fixed call always produce the same winner
    /// and the same ranking.
    #[test]
    fn resolution_is_deterministic(a in any::<i64>(), b in any::<i64>()) {
        let namespace = color_namespace(&[0, 1, 2, 3]);
        let call = Call::new().arg(Value::int(a)).arg(Value::int(b));

        let first = namespace.resolve("add", &call).unwrap();
        let second = namespace.resolve("add", &call).unwrap();
        prop_assert_eq!(first.bind_index, second.bind_index);
        prop_assert_eq!(first.score(), second.score());

        let ranking: Vec<usize> = namespace
            .rank("add", &call)
            .unwrap()
            .iter()
            .map(|candidate| candidate.bind_index)
            .collect();
        let again: Vec<usize> = namespace
            .rank("add", &call)
            .unwrap()
            .iter()
            .map(|candidate| candidate.bind_index)
            .collect();
        prop_assert_eq!(ranking, again);
    }

    /// A guarded implementation is selected exactly when its predicate
    /// holds; otherwise the unguarded one catches the call.
    #[test]
    fn predicate_partition_is_exhaustive(n in any::<i64>()) {
        let mut namespace = Namespace::new("ns");
        namespace
            .bind(
                "f",
                Signature::new().param(
                    Param::new("n").ty("int").guard(Expr::name("n").ge(Expr::int(0))),
                ),
                |_| Ok(Value::str("non-negative")),
            )
            .unwrap();
        namespace
            .bind(
                "f",
                Signature::new().param(Param::new("n").ty("int")),
                |_| Ok(Value::str("any int")),
            )
            .unwrap();

        let call = Call::new().arg(Value::int(n));
        let expected = if n >= 0 { "non-negative" } else { "any int" };
        prop_assert_eq!(namespace.call("f", &call).unwrap(), Value::str(expected));
    }
}
