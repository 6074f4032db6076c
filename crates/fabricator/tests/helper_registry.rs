//! Integration tests for helper registration and dispatch.

use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use fabricator::{
    CallArgs, EvalContext, Expr, HelperError, HelperRegistry, ObjectRow, Value, field_vars,
};

// =============================================================================
// Registration Surface
// =============================================================================

#[test]
fn standard_helpers_are_registered_under_their_fixed_names() {
    let registry = HelperRegistry::standard();
    let expected = [
        "choice",
        "random_choice",
        "if",
        "date",
        "datetime",
        "date_between",
        "i18n_fake",
        "random_number",
        "reference",
        "int",
    ];
    for name in expected {
        assert!(registry.get(name).is_some(), "missing helper '{name}'");
    }
    assert_eq!(registry.names().count(), expected.len());
}

#[test]
fn laziness_is_a_declared_per_helper_contract() {
    let registry = HelperRegistry::standard();
    for name in ["choice", "random_choice", "if"] {
        assert!(!registry.get(name).unwrap().eager_args(), "'{name}' must be lazy");
    }
    for name in ["date", "datetime", "date_between", "i18n_fake", "random_number", "reference", "int"]
    {
        assert!(registry.get(name).unwrap().eager_args(), "'{name}' must be eager");
    }
}

#[test]
fn unknown_helper_names_are_an_error() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(1);
    let result = registry.call("shuffle", &mut ctx, &CallArgs::new());
    assert!(matches!(result, Err(HelperError::UnknownHelper { .. })));
}

#[test]
fn missing_arguments_are_an_error() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(1);
    let args = CallArgs::new().named_arg("year", Expr::lit(2024));
    let result = registry.call("date", &mut ctx, &args);
    assert!(matches!(
        result,
        Err(HelperError::MissingArgument { helper: "date", name: "month" })
    ));
}

// =============================================================================
// Eager and Lazy Dispatch
// =============================================================================

#[test]
fn eager_helpers_receive_evaluated_arguments() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(1);

    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let deferred = Expr::deferred(move |_| {
        counter.set(counter.get() + 1);
        Ok(Value::from("42"))
    });

    let value = registry.call("int", &mut ctx, &CallArgs::new().arg(deferred)).unwrap();
    assert_eq!(value, Value::Number(42));
    assert_eq!(calls.get(), 1);
}

#[test]
fn eager_helpers_reject_choice_construct_arguments() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(1);
    let args = CallArgs::new().arg(Expr::choice(Expr::lit(1), None, None));
    let result = registry.call("int", &mut ctx, &args);
    assert!(matches!(result, Err(HelperError::ChoiceOutsideSelection)));
}

#[test]
fn lazy_dispatch_never_evaluates_the_losing_branch() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(1);

    let loser_evals = Rc::new(Cell::new(0));
    let counter = Rc::clone(&loser_evals);
    let loser_pick = Expr::deferred(move |_| {
        counter.set(counter.get() + 1);
        Ok(Value::from("loser"))
    });

    // Nested calls go through eval_call, producing choice constructs.
    let winner = registry
        .eval_call(
            "choice",
            &mut ctx,
            &CallArgs::new()
                .named_arg("pick", Expr::lit("winner"))
                .named_arg("when", Expr::lit(true)),
        )
        .unwrap();
    let loser = registry
        .eval_call("choice", &mut ctx, &CallArgs::new().named_arg("pick", loser_pick))
        .unwrap();

    let args = CallArgs::positional(vec![winner, loser]);
    let value = registry.call("if", &mut ctx, &args).unwrap();
    assert_eq!(value, Value::from("winner"));
    assert_eq!(loser_evals.get(), 0);
}

#[test]
fn top_level_choice_constructs_have_no_value() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(1);
    let args = CallArgs::new().named_arg("pick", Expr::lit("A"));
    let result = registry.call("choice", &mut ctx, &args);
    assert!(matches!(result, Err(HelperError::ChoiceOutsideSelection)));
}

// =============================================================================
// End-to-End Helper Calls
// =============================================================================

#[test]
fn random_choice_dispatches_in_uniform_mode() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(2);
    let args = CallArgs::positional(vec![Expr::lit("x"), Expr::lit("y"), Expr::lit("z")]);
    let value = registry.call("random_choice", &mut ctx, &args).unwrap();
    let Value::String(s) = value else { panic!("expected a string") };
    assert!(["x", "y", "z"].contains(&s.as_str()));
}

#[test]
fn random_choice_dispatches_in_weighted_mode() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(2);
    let certain = registry
        .eval_call(
            "choice",
            &mut ctx,
            &CallArgs::new()
                .named_arg("pick", Expr::lit("sure thing"))
                .named_arg("probability", Expr::lit("100%")),
        )
        .unwrap();
    let never = registry
        .eval_call(
            "choice",
            &mut ctx,
            &CallArgs::new()
                .named_arg("pick", Expr::lit("no chance"))
                .named_arg("probability", Expr::lit("0%")),
        )
        .unwrap();

    let args = CallArgs::positional(vec![certain, never]);
    for _ in 0..50 {
        let value = registry.call("random_choice", &mut ctx, &args).unwrap();
        assert_eq!(value, Value::from("sure thing"));
    }
}

#[test]
fn date_accepts_named_arguments() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(1);
    let args = CallArgs::new()
        .named_arg("year", Expr::lit("2024"))
        .named_arg("month", Expr::lit(3))
        .named_arg("day", Expr::lit(15));
    let value = registry.call("date", &mut ctx, &args).unwrap();
    assert_eq!(value, Value::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
}

#[test]
fn datetime_time_components_default_to_zero() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(1);
    let args = CallArgs::positional(vec![Expr::lit(2024), Expr::lit(3), Expr::lit(15)]);
    let value = registry.call("datetime", &mut ctx, &args).unwrap();
    let expected = NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_micro_opt(0, 0, 0, 0)
        .unwrap();
    assert_eq!(value, Value::DateTime(expected));
}

#[test]
fn date_between_dispatches_with_named_bounds() {
    let registry = HelperRegistry::standard();
    let mut ctx = EvalContext::from_seed(1);
    let args = CallArgs::new()
        .named_arg("start_date", Expr::lit("2020-01-01"))
        .named_arg("end_date", Expr::lit("2020-01-31"));
    let value = registry.call("date_between", &mut ctx, &args).unwrap();
    let Value::Date(picked) = value else { panic!("expected a date") };
    assert!(picked.to_string().starts_with("2020-01"));
}

#[test]
fn reference_dispatches_through_field_vars() {
    let registry = HelperRegistry::standard();
    let row = ObjectRow::builder().object_type("Account".to_string()).id(9).build();
    let mut ctx =
        EvalContext::from_seed(1).with_field_vars(field_vars! { "account" => row.clone() });

    let args = CallArgs::new().arg(Expr::lit("account"));
    let value = registry.call("reference", &mut ctx, &args).unwrap();
    assert_eq!(value, Value::Row(row));
}

#[test]
fn same_seed_reproduces_a_template_run() {
    let registry = HelperRegistry::standard();
    let args = CallArgs::positional(vec![Expr::lit("x"), Expr::lit("y"), Expr::lit("z")]);

    let run = |seed: u64| {
        let mut ctx = EvalContext::from_seed(seed);
        (0..10)
            .map(|_| registry.call("random_choice", &mut ctx, &args).unwrap())
            .collect::<Vec<_>>()
    };

    assert_eq!(run(123), run(123));
}
