use std::panic::{catch_unwind, AssertUnwindSafe};

use kb_ir::Name;

use super::*;
use crate::environment::Reference;
use crate::types::Type;
use crate::value::Value;

fn declare_x(scoped: &mut ScopedInterpreter<'_>, value: i32) {
    let scope = scoped.env.current().expect("active scope");
    scope
        .borrow_mut()
        .declare(Name::new("x"), Reference::new(Type::INT, Value::Int(value), false))
        .expect("fresh scope");
}

#[test]
fn test_scoped_interpreter_drops_on_normal_exit() {
    let mut interp = Interpreter::new();
    assert_eq!(interp.env.depth(), 1);

    {
        let scoped = interp.scoped();
        assert_eq!(scoped.env.depth(), 2);
    }

    assert_eq!(interp.env.depth(), 1);
}

#[test]
fn test_scoped_interpreter_drops_on_panic() {
    let mut interp = Interpreter::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let scoped = interp.scoped();
        assert_eq!(scoped.env.depth(), 2);
        panic!("test panic");
    }));

    assert!(result.is_err());
    assert_eq!(interp.env.depth(), 1);
}

#[test]
fn test_nested_scopes_unwind_together() {
    let mut interp = Interpreter::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        interp.with_env_scope(|outer| {
            outer.with_env_scope(|inner| {
                assert_eq!(inner.env.depth(), 3);
                panic!("deep panic");
            })
        })
    }));

    assert!(result.is_err());
    assert_eq!(interp.env.depth(), 1);
}

#[test]
fn test_bindings_disappear_with_the_scope() {
    let mut interp = Interpreter::new();

    let seen = interp.with_env_scope(|scoped| {
        declare_x(scoped, 7);
        scoped.value_of("x")
    });

    assert_eq!(seen, Some(Value::Int(7)));
    assert_eq!(interp.value_of("x"), None);
}

#[test]
fn test_scope_in_hides_caller_locals() {
    let mut interp = Interpreter::new();
    let global = interp.env.global().clone();

    interp.with_env_scope(|caller| {
        declare_x(caller, 1);
        caller.with_scope_in(global, |callee| {
            assert_eq!(callee.value_of("x"), None);
        });
        assert_eq!(caller.value_of("x"), Some(Value::Int(1)));
    });
}
