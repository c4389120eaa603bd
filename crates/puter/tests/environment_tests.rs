//! Environment scoping as seen from programs and the public API

use pretty_assertions::assert_eq;
use puter::value::Map;
use puter::*;

#[test]
fn test_globals_keep_input_order() {
    let mut inputs = Map::new();
    inputs.insert("b".into(), Value::Int(1));
    inputs.insert("a".into(), Value::Int(2));

    let mut env = Environment::new();
    env.extend_from(inputs);
    eval_source("c = a + b", &mut env, &EvalContext::default()).unwrap();

    let names: Vec<_> = env.globals().keys().cloned().collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

#[test]
fn test_scope_guard_discards_locals() {
    let mut env = Environment::new();
    env.assign("x", Value::Int(1));
    {
        let mut scope = env.scope_guard();
        scope.set_local("x", Value::Int(2));
        scope.set_local("y", Value::Int(3));
        assert_eq!(scope.get("x"), Some(&Value::Int(2)));
        assert_eq!(scope.depth(), 2);
    }
    assert_eq!(env.get("x"), Some(&Value::Int(1)));
    assert!(!env.contains("y"));
    assert!(env.is_global_scope());
}

#[test]
fn test_assign_inside_frame_lands_in_globals() {
    let mut env = Environment::new();
    env.push_frame();
    env.set_local("v", Value::Int(9));
    env.assign("total", Value::Int(10));
    env.pop_frame();

    assert_eq!(env.get("total"), Some(&Value::Int(10)));
    assert!(!env.contains("v"));
}

#[test]
fn test_comprehension_variable_shadows_then_restores() {
    let mut env = Environment::new();
    let ctx = EvalContext::default();
    env.assign("x", Value::Int(100));
    let out = eval_source("[x + 1 for x in [1, 2]]", &mut env, &ctx).unwrap();
    assert_eq!(out, Value::list(vec![Value::Int(2), Value::Int(3)]));
    assert_eq!(env.get("x"), Some(&Value::Int(100)));
    assert_eq!(env.len(), 1);
}

#[test]
fn test_nested_comprehensions_see_outer_names() {
    let mut env = Environment::new();
    let ctx = EvalContext::default();
    let out = eval_source(
        "[[a * b for b in [1, 2]] for a in [10, 20]]",
        &mut env,
        &ctx,
    )
    .unwrap();
    assert_eq!(
        out,
        Value::list(vec![
            Value::list(vec![Value::Int(10), Value::Int(20)]),
            Value::list(vec![Value::Int(20), Value::Int(40)]),
        ])
    );
    assert!(env.is_empty());
}
