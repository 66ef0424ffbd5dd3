#![allow(clippy::unwrap_used, reason = "tests can panic")]

use mgn_ir::{AstBuilder, BinaryOp, Span, StringInterner};

use super::*;
use crate::errors::{EvalError, EvalErrorKind};
use crate::eval_mode::EvalMode;

/// Build a program with `build` and evaluate its root in a fresh root scope.
fn run(interner: &StringInterner, build: impl FnOnce(&AstBuilder<'_>) -> ExprId) -> EvalResult {
    let (arena, root) = program(interner, build);
    Interpreter::new(interner, arena).evaluate(root, &Scope::root())
}

fn program(
    interner: &StringInterner,
    build: impl FnOnce(&AstBuilder<'_>) -> ExprId,
) -> (SharedArena, ExprId) {
    let b = AstBuilder::new(interner);
    let root = build(&b);
    (SharedArena::new(b.finish()), root)
}

fn show(interner: &StringInterner, value: &Value) -> String {
    value.display(interner).to_string()
}

fn runtime_kind(result: EvalResult) -> EvalErrorKind {
    match result {
        Err(Failure::Runtime(err)) => err.kind,
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalars() {
        let interner = StringInterner::new();
        assert_eq!(run(&interner, |b| b.int(42)).unwrap(), Value::Int(42));
        assert_eq!(run(&interner, |b| b.float(1.5)).unwrap(), Value::Float(1.5));
        assert_eq!(run(&interner, |b| b.bool(true)).unwrap(), Value::Bool(true));
        assert!(run(&interner, |b| b.null()).unwrap().is_null());
        assert_eq!(show(&interner, &run(&interner, |b| b.atom("ok")).unwrap()), ":ok");
    }

    #[test]
    fn empty_literal_is_not_structurally_equal_to_other_values() {
        let interner = StringInterner::new();
        let empty = run(&interner, |b| b.empty()).unwrap();
        assert_ne!(empty, Value::Int(42));
        assert_eq!(empty, Value::Empty);
    }

    #[test]
    fn string_literals_are_fresh_each_evaluation() {
        let interner = StringInterner::new();
        // f := fn() 'a'; s := f(); s << 'b'; f()
        let result = run(&interner, |b| {
            b.block([
                b.assign(b.ident("f"), b.function(None, &[], b.string("a"))),
                b.assign(b.ident("s"), b.call(b.ident("f"), [])),
                b.binary(BinaryOp::Push, b.ident("s"), b.string("b")),
                b.call(b.ident("f"), []),
            ])
        });
        assert_eq!(result.unwrap(), Value::from("a"));
    }

    #[test]
    fn list_and_object() {
        let interner = StringInterner::new();
        let value = run(&interner, |b| {
            b.object([
                (b.ident("a"), b.list([b.int(1), b.int(2)])),
                (b.string("b c"), b.null()),
                (b.int(3), b.bool(false)),
            ])
        })
        .unwrap();
        assert_eq!(show(&interner, &value), "{3: false, a: [1, 2], b c: ?}");
    }

    #[test]
    fn later_duplicate_keys_win() {
        let interner = StringInterner::new();
        let value = run(&interner, |b| {
            b.object([(b.ident("a"), b.int(1)), (b.string("a"), b.int(2))])
        })
        .unwrap();
        assert_eq!(show(&interner, &value), "{a: 2}");
    }

    #[test]
    fn invalid_object_key() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| b.object([(b.bool(true), b.int(1))]));
        assert_eq!(
            runtime_kind(result),
            EvalErrorKind::InvalidKeyType {
                type_name: "bool".into()
            }
        );
    }
}

mod scoping {
    use super::*;
    use pretty_assertions::assert_eq;

    /// `n := 10; { n <op> 30 }; n`
    fn outer_after_block(nonlocal: bool) -> Value {
        let interner = StringInterner::new();
        run(&interner, |b| {
            let inner = if nonlocal {
                b.assign_nonlocal(b.ident("n"), b.int(30))
            } else {
                b.assign(b.ident("n"), b.int(30))
            };
            b.block([
                b.assign(b.ident("n"), b.int(10)),
                b.block([inner]),
                b.ident("n"),
            ])
        })
        .unwrap()
    }

    #[test]
    fn nonlocal_assignment_mutates_outer_binding() {
        assert_eq!(outer_after_block(true), Value::Int(30));
    }

    #[test]
    fn local_assignment_shadows() {
        assert_eq!(outer_after_block(false), Value::Int(10));
    }

    #[test]
    fn nonlocal_assignment_to_unbound_name_fails() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| {
            b.block([b.assign_nonlocal(b.ident("ghost"), b.int(1))])
        });
        assert_eq!(
            runtime_kind(result),
            EvalErrorKind::UndefinedVariable {
                name: "ghost".into()
            }
        );
    }

    #[test]
    fn undefined_variable_carries_its_span() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| {
            let missing = b.at(Span::new(4, 9)).ident("nope");
            b.at(Span::new(0, 12)).block([missing])
        });
        let err = result.unwrap_err();
        let err = err.as_runtime().unwrap();
        assert_eq!(err.message, "nope is not defined");
        assert_eq!(err.span, Some(Span::new(4, 9)));
    }

    #[test]
    fn assignment_evaluates_to_the_value() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| {
            b.block([b.assign(b.ident("y"), b.assign(b.ident("x"), b.int(5)))])
        });
        assert_eq!(result.unwrap(), Value::Int(5));
    }

    #[test]
    fn empty_block_is_null() {
        let interner = StringInterner::new();
        assert!(run(&interner, |b| b.block([])).unwrap().is_null());
    }
}

mod closures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn closure_sees_later_nonlocal_mutation() {
        let interner = StringInterner::new();
        // x := 1; get := fn() x; x <- 2; get()
        let result = run(&interner, |b| {
            b.block([
                b.assign(b.ident("x"), b.int(1)),
                b.assign(b.ident("get"), b.function(None, &[], b.ident("x"))),
                b.assign_nonlocal(b.ident("x"), b.int(2)),
                b.call(b.ident("get"), []),
            ])
        });
        assert_eq!(result.unwrap(), Value::Int(2));
    }

    #[test]
    fn counter_shares_captured_scope() {
        let interner = StringInterner::new();
        // make := fn() { n := 0; fn() n <- n + 1 }; c := make(); c(); c()
        let result = run(&interner, |b| {
            let bump = b.assign_nonlocal(
                b.ident("n"),
                b.binary(BinaryOp::Add, b.ident("n"), b.int(1)),
            );
            let make_body = b.block([
                b.assign(b.ident("n"), b.int(0)),
                b.function(None, &[], bump),
            ]);
            b.block([
                b.assign(b.ident("make"), b.function(None, &[], make_body)),
                b.assign(b.ident("c"), b.call(b.ident("make"), [])),
                b.call(b.ident("c"), []),
                b.call(b.ident("c"), []),
            ])
        });
        assert_eq!(result.unwrap(), Value::Int(2));
    }

    #[test]
    fn named_function_can_recurse() {
        let interner = StringInterner::new();
        // fn fact(n) if n { 0 -> 1, _ -> n * fact(n - 1) }; fact(10)
        let result = run(&interner, |b| {
            let recurse = b.binary(
                BinaryOp::Mul,
                b.ident("n"),
                b.call(
                    b.ident("fact"),
                    [b.binary(BinaryOp::Sub, b.ident("n"), b.int(1))],
                ),
            );
            let body = b.if_match(b.ident("n"), [(b.int(0), b.int(1)), (b.empty(), recurse)]);
            b.block([
                b.function(Some("fact"), &["n"], body),
                b.call(b.ident("fact"), [b.int(10)]),
            ])
        });
        assert_eq!(result.unwrap(), Value::Int(3_628_800));
    }

    #[test]
    fn missing_arguments_are_null_and_extras_ignored() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| {
            b.block([
                b.function(Some("pair"), &["a", "b"], b.list([b.ident("a"), b.ident("b")])),
                b.list([
                    b.call(b.ident("pair"), [b.int(1)]),
                    b.call(b.ident("pair"), [b.int(1), b.int(2), b.int(3)]),
                ]),
            ])
        });
        assert_eq!(show(&interner, &result.unwrap()), "[[1, ?], [1, 2]]");
    }

    #[test]
    fn calling_a_number_fails_before_arguments_run() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| {
            b.block([
                b.assign(b.ident("x"), b.int(0)),
                b.call(b.int(1), [b.assign_nonlocal(b.ident("x"), b.int(9))]),
            ])
        });
        assert_eq!(
            runtime_kind(result),
            EvalErrorKind::NotCallable {
                type_name: "int".into()
            }
        );
    }

    #[test]
    fn with_appends_callback_argument() {
        let interner = StringInterner::new();
        // fn apply(x, f) f(x); with apply(20) fn(v) v + 1
        let result = run(&interner, |b| {
            let apply = b.function(
                Some("apply"),
                &["x", "f"],
                b.call(b.ident("f"), [b.ident("x")]),
            );
            let callback =
                b.function(None, &["v"], b.binary(BinaryOp::Add, b.ident("v"), b.int(1)));
            let call = b.call(b.ident("apply"), [b.int(20)]);
            b.block([apply, b.with_callback(call, callback)])
        });
        assert_eq!(result.unwrap(), Value::Int(21));
    }

    #[test]
    fn closure_runs_in_its_own_arena() {
        let interner = StringInterner::new();
        let (lib, lib_root) = program(&interner, |b| {
            b.function(Some("twice"), &["x"], b.binary(BinaryOp::Mul, b.ident("x"), b.int(2)))
        });
        let scope = Scope::root();
        let twice = Interpreter::new(&interner, lib)
            .evaluate(lib_root, &scope)
            .unwrap();

        let (main, main_root) = program(&interner, |b| b.call(b.ident("twice"), [b.int(21)]));
        let result = Interpreter::new(&interner, main).evaluate(main_root, &scope);
        assert_eq!(result.unwrap(), Value::Int(42));
        assert!(matches!(twice, Value::Function(_)));
    }
}

mod if_match {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_matching_branch_wins() {
        let interner = StringInterner::new();
        // if [0, 5] { [0, 0] -> :a, [0, _] -> :b, [_, 0] -> :c, _ -> :d }
        let result = run(&interner, |b| {
            b.if_match(
                b.list([b.int(0), b.int(5)]),
                [
                    (b.list([b.int(0), b.int(0)]), b.atom("a")),
                    (b.list([b.int(0), b.empty()]), b.atom("b")),
                    (b.list([b.empty(), b.int(0)]), b.atom("c")),
                    (b.empty(), b.atom("d")),
                ],
            )
        });
        assert_eq!(show(&interner, &result.unwrap()), ":b");
    }

    #[test]
    fn later_patterns_are_not_evaluated() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| {
            b.if_match(
                b.int(1),
                [(b.int(1), b.atom("hit")), (b.ident("undefined"), b.atom("miss"))],
            )
        });
        assert_eq!(show(&interner, &result.unwrap()), ":hit");
    }

    #[test]
    fn no_match_is_null() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| b.if_match(b.int(1), [(b.int(2), b.int(0))]));
        assert!(result.unwrap().is_null());
    }
}

mod properties {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_index_bounds() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| {
            let s = || b.string("abc");
            b.list([
                b.property(s(), b.int(1)),
                b.property(s(), b.int(3)),
                b.property(s(), b.unary(mgn_ir::UnaryOp::Neg, b.int(1))),
            ])
        });
        assert_eq!(show(&interner, &result.unwrap()), "['b', ?, ?]");
    }

    #[test]
    fn push_mutates_every_alias() {
        let interner = StringInterner::new();
        // xs := [1, 2, 3]; ys := xs; xs << 4; ys
        let result = run(&interner, |b| {
            b.block([
                b.assign(b.ident("xs"), b.list([b.int(1), b.int(2), b.int(3)])),
                b.assign(b.ident("ys"), b.ident("xs")),
                b.binary(BinaryOp::Push, b.ident("xs"), b.int(4)),
                b.ident("ys"),
            ])
        });
        assert_eq!(show(&interner, &result.unwrap()), "[1, 2, 3, 4]");
    }

    #[test]
    fn list_pushed_into_itself() {
        let interner = StringInterner::new();
        // l := []; l << l; [l = l, l]
        let result = run(&interner, |b| {
            b.block([
                b.assign(b.ident("l"), b.list([])),
                b.binary(BinaryOp::Push, b.ident("l"), b.ident("l")),
                b.list([
                    b.binary(BinaryOp::Eq, b.ident("l"), b.ident("l")),
                    b.ident("l"),
                ]),
            ])
        });
        assert_eq!(show(&interner, &result.unwrap()), "[true, [[...]]]");
    }

    #[test]
    fn object_stored_in_itself() {
        let interner = StringInterner::new();
        // o := {}; o.me := o; o = o
        let result = run(&interner, |b| {
            b.block([
                b.assign(b.ident("o"), b.object([])),
                b.assign(b.dot(b.ident("o"), "me"), b.ident("o")),
                b.binary(BinaryOp::Eq, b.ident("o"), b.ident("o")),
            ])
        });
        assert_eq!(result.unwrap(), Value::Bool(true));
    }

    #[test]
    fn property_assignment() {
        let interner = StringInterner::new();
        // o := {}; xs := [0]; s := 'abc'; o.k := 1; xs.1 := 2; s.(2) := 'xyz'; [o, xs, s]
        let result = run(&interner, |b| {
            b.block([
                b.assign(b.ident("o"), b.object([])),
                b.assign(b.ident("xs"), b.list([b.int(0)])),
                b.assign(b.ident("s"), b.string("abc")),
                b.assign(b.dot(b.ident("o"), "k"), b.int(1)),
                b.assign(b.property(b.ident("xs"), b.int(1)), b.int(2)),
                b.assign(b.property(b.ident("s"), b.int(2)), b.string("xyz")),
                b.list([b.ident("o"), b.ident("xs"), b.ident("s")]),
            ])
        });
        assert_eq!(show(&interner, &result.unwrap()), "[{k: 1}, [0, 2], 'abxyz']");
    }

    #[test]
    fn list_write_past_end_fails() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| {
            b.assign(b.property(b.list([]), b.int(1)), b.int(0))
        });
        assert!(matches!(
            runtime_kind(result),
            EvalErrorKind::IndexTypeError { .. }
        ));
    }

    #[test]
    fn indexing_a_number_fails() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| b.dot(b.int(1), "x"));
        assert_eq!(
            runtime_kind(result),
            EvalErrorKind::NotIndexable {
                type_name: "int".into()
            }
        );
    }
}

mod destructuring {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_list_pattern() {
        let interner = StringInterner::new();
        // [a, _, [b, c]] := [1, 2, [3, 4]]; [a, b, c]
        let result = run(&interner, |b| {
            let pattern = b.list([
                b.ident("a"),
                b.empty(),
                b.list([b.ident("b"), b.ident("c")]),
            ]);
            let value = b.list([b.int(1), b.int(2), b.list([b.int(3), b.int(4)])]);
            b.block([
                b.assign(pattern, value),
                b.list([b.ident("a"), b.ident("b"), b.ident("c")]),
            ])
        });
        assert_eq!(show(&interner, &result.unwrap()), "[1, 3, 4]");
    }

    #[test]
    fn list_arity_mismatch() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| {
            b.assign(b.list([b.ident("a"), b.ident("b")]), b.list([b.int(1)]))
        });
        assert_eq!(
            runtime_kind(result),
            EvalErrorKind::DestructureArityError {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn list_pattern_needs_a_list() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| b.assign(b.list([b.ident("a")]), b.int(1)));
        assert!(matches!(
            runtime_kind(result),
            EvalErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn object_pattern_missing_key_is_null() {
        let interner = StringInterner::new();
        // {name: n, age: a} := {name: 'x'}; [n, a]
        let result = run(&interner, |b| {
            let pattern = b.object([
                (b.ident("name"), b.ident("n")),
                (b.ident("age"), b.ident("a")),
            ]);
            b.block([
                b.assign(pattern, b.object([(b.ident("name"), b.string("x"))])),
                b.list([b.ident("n"), b.ident("a")]),
            ])
        });
        assert_eq!(show(&interner, &result.unwrap()), "['x', ?]");
    }

    #[test]
    fn literal_target_is_rejected() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| b.assign(b.int(1), b.int(2)));
        assert_eq!(
            runtime_kind(result),
            EvalErrorKind::InvalidAssignmentTarget {
                target: "a number literal".into()
            }
        );
    }
}

mod call_stack {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn backtrace_lists_calls_innermost_first() {
        let interner = StringInterner::new();
        // fn inner() boom; fn outer() inner(); outer()
        let result = run(&interner, |b| {
            b.block([
                b.function(Some("inner"), &[], b.ident("boom")),
                b.assign(
                    b.ident("outer"),
                    b.function(Some("outer"), &[], b.call(b.ident("inner"), [])),
                ),
                b.at(Span::new(30, 37)).call(b.ident("outer"), []),
            ])
        });
        let failure = result.unwrap_err();
        let err = failure.as_runtime().unwrap();
        let backtrace = err.backtrace.as_ref().unwrap();
        assert_eq!(backtrace.names().collect::<Vec<_>>(), ["inner", "outer"]);
        assert_eq!(backtrace.frames()[1].span, Span::new(30, 37));
    }

    #[test]
    fn anonymous_frames_are_labelled() {
        let interner = StringInterner::new();
        let result = run(&interner, |b| {
            b.call(b.function(None, &[], b.call(b.int(0), [])), [])
        });
        let failure = result.unwrap_err();
        let backtrace = failure.as_runtime().unwrap().backtrace.clone().unwrap();
        assert_eq!(
            backtrace.names().collect::<Vec<_>>(),
            [crate::diagnostics::ANONYMOUS_FN]
        );
    }

    #[test]
    fn stack_is_empty_after_an_error() {
        let interner = StringInterner::new();
        let (arena, root) = program(&interner, |b| {
            b.block([
                b.function(Some("f"), &[], b.ident("missing")),
                b.call(b.ident("f"), []),
            ])
        });
        let mut interpreter = Interpreter::new(&interner, arena);
        assert!(interpreter.evaluate(root, &Scope::root()).is_err());
        assert_eq!(interpreter.call_depth(), 0);
    }

    #[test]
    fn bounded_mode_stops_runaway_recursion() {
        let interner = StringInterner::new();
        let (arena, root) = program(&interner, |b| {
            b.block([
                b.function(Some("loop"), &[], b.call(b.ident("loop"), [])),
                b.call(b.ident("loop"), []),
            ])
        });
        let mut interpreter = InterpreterBuilder::new(&interner, arena)
            .mode(EvalMode::Bounded { max_call_depth: 64 })
            .build();
        let result = interpreter.evaluate(root, &Scope::root());
        assert_eq!(
            runtime_kind(result),
            EvalErrorKind::StackOverflow { depth: 64 }
        );
        assert_eq!(interpreter.call_depth(), 0);
    }

    #[test]
    fn deep_recursion_grows_the_stack() {
        let interner = StringInterner::new();
        // fn down(n) if n { 0 -> :done, _ -> down(n - 1) }; down(20000)
        let result = run(&interner, |b| {
            let recurse = b.call(
                b.ident("down"),
                [b.binary(BinaryOp::Sub, b.ident("n"), b.int(1))],
            );
            let body = b.if_match(b.ident("n"), [(b.int(0), b.atom("done")), (b.empty(), recurse)]);
            b.block([
                b.function(Some("down"), &["n"], body),
                b.call(b.ident("down"), [b.int(20_000)]),
            ])
        });
        assert_eq!(show(&interner, &result.unwrap()), ":done");
    }
}

mod builtins {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_receives_evaluated_arguments() {
        let interner = StringInterner::new();
        let scope = Scope::root();
        let len = Value::builtin("len", |args| match args.first() {
            Some(Value::List(items)) => Ok(Value::Int(items.borrow().len() as i64)),
            _ => Err(EvalError::new("len expects a list")),
        });
        scope.borrow_mut().bind(interner.intern("len"), len);

        let (arena, root) = program(&interner, |b| {
            b.call(b.ident("len"), [b.list([b.int(1), b.int(2)])])
        });
        let result = Interpreter::new(&interner, arena).evaluate(root, &scope);
        assert_eq!(result.unwrap(), Value::Int(2));
    }

    #[test]
    fn builtin_errors_get_the_call_span() {
        let interner = StringInterner::new();
        let scope = Scope::root();
        let fail = Value::builtin("fail", |_| Err(EvalError::new("nope")));
        scope.borrow_mut().bind(interner.intern("fail"), fail);

        let (arena, root) = program(&interner, |b| {
            b.at(Span::new(3, 9)).call(b.ident("fail"), [])
        });
        let failure = Interpreter::new(&interner, arena)
            .evaluate(root, &scope)
            .unwrap_err();
        let err = failure.as_runtime().unwrap();
        assert_eq!(err.message, "nope");
        assert_eq!(err.span, Some(Span::new(3, 9)));
        assert!(err.backtrace.is_none());
    }
}

mod faults {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dangling_expression_is_an_internal_fault() {
        let interner = StringInterner::new();
        let arena = SharedArena::new(ExprArena::new());
        let result = Interpreter::new(&interner, arena).evaluate(ExprId::new(7), &Scope::root());
        match result {
            Err(Failure::Internal(fault)) => {
                assert_eq!(fault, InternalFault::DanglingExpr { index: 7 });
            }
            other => panic!("expected an internal fault, got {other:?}"),
        }
    }
}

mod inherited_stack {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::diagnostics::{CallFrame, CallStack};

    #[test]
    fn inherited_call_stack_shows_in_backtraces() {
        let interner = StringInterner::new();
        let mut stack = CallStack::new(None);
        stack
            .push(CallFrame {
                name: interner.intern("host"),
                call_span: Span::DUMMY,
            })
            .unwrap();
        let (arena, root) = program(&interner, |b| {
            b.block([
                b.function(Some("f"), &[], b.ident("missing")),
                b.call(b.ident("f"), []),
            ])
        });
        let mut interpreter = InterpreterBuilder::new(&interner, arena)
            .call_stack(stack)
            .build();
        assert_eq!(interpreter.call_depth(), 1);

        let failure = interpreter.evaluate(root, &Scope::root()).unwrap_err();
        let backtrace = failure.as_runtime().unwrap().backtrace.clone().unwrap();
        assert_eq!(backtrace.names().collect::<Vec<_>>(), ["f", "host"]);
    }
}
