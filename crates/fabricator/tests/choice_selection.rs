//! Integration tests for `random_choice` and the weighted sampling core.

use std::cell::Cell;
use std::rc::Rc;

use fabricator::helpers::choice::{parse_weight, random_choice, weighted_choice};
use fabricator::{EvalContext, Expr, HelperError, Value};

/// A weighted `choice` entry with a literal pick.
fn weighted(pick: &str, weight: impl Into<Value>) -> Expr {
    Expr::choice(Expr::lit(pick), Some(Expr::lit(weight)), None)
}

/// A deferred pick that counts how many times it was evaluated.
fn counting_pick(result: &'static str, counter: &Rc<Cell<u32>>) -> Expr {
    let counter = Rc::clone(counter);
    Expr::deferred(move |_| {
        counter.set(counter.get() + 1);
        Ok(Value::from(result))
    })
}

// =============================================================================
// Weight Parsing
// =============================================================================

#[test]
fn percent_suffix_is_cosmetic() {
    let mut ctx = EvalContext::from_seed(1);
    assert_eq!(parse_weight(&mut ctx, &Expr::lit("60%")).unwrap(), 60);
    assert_eq!(parse_weight(&mut ctx, &Expr::lit("60")).unwrap(), 60);
    assert_eq!(parse_weight(&mut ctx, &Expr::lit(60)).unwrap(), 60);
}

#[test]
fn weight_may_be_a_deferred_expression() {
    let mut ctx = EvalContext::from_seed(1);
    let weight = Expr::deferred(|_| Ok(Value::from("40%")));
    assert_eq!(parse_weight(&mut ctx, &weight).unwrap(), 40);
}

#[test]
fn non_integer_weight_is_an_error() {
    let mut ctx = EvalContext::from_seed(1);
    let result = parse_weight(&mut ctx, &Expr::lit("abc"));
    assert!(matches!(result, Err(HelperError::InvalidWeight { .. })));

    let result = parse_weight(&mut ctx, &Expr::lit(2.5));
    assert!(matches!(result, Err(HelperError::InvalidWeight { .. })));
}

// =============================================================================
// Weighted Sampler
// =============================================================================

#[test]
fn zero_weight_entries_are_never_selected() {
    let mut ctx = EvalContext::from_seed(42);
    let entries = [(0_i64, "never"), (5, "always")];
    for _ in 0..200 {
        assert_eq!(*weighted_choice(ctx.rng_mut(), &entries).unwrap(), "always");
    }
}

#[test]
fn all_zero_weights_are_rejected() {
    let mut ctx = EvalContext::from_seed(42);
    let entries = [(0_i64, "a"), (0, "b")];
    let result = weighted_choice(ctx.rng_mut(), &entries);
    assert!(matches!(result, Err(HelperError::WeightedSelection { .. })));
}

#[test]
fn empty_weight_set_is_rejected() {
    let mut ctx = EvalContext::from_seed(42);
    let entries: [(i64, &str); 0] = [];
    let result = weighted_choice(ctx.rng_mut(), &entries);
    assert!(matches!(result, Err(HelperError::WeightedSelection { .. })));
}

// =============================================================================
// Weighted Mode
// =============================================================================

#[test]
fn weighted_frequencies_match_weights() {
    let mut ctx = EvalContext::from_seed(7);
    let choices = vec![weighted("a", 1), weighted("b", 0), weighted("c", 3)];

    let draws = 10_000;
    let mut a_count = 0;
    let mut b_count = 0;
    let mut c_count = 0;
    for _ in 0..draws {
        match random_choice(&mut ctx, &choices).unwrap() {
            Value::String(s) if s == "a" => a_count += 1,
            Value::String(s) if s == "b" => b_count += 1,
            Value::String(s) if s == "c" => c_count += 1,
            other => panic!("unexpected selection: {other:?}"),
        }
    }

    // Expected frequencies: a = 1/4, b = 0, c = 3/4.
    assert_eq!(b_count, 0);
    assert!((2200..=2800).contains(&a_count), "a drawn {a_count} times");
    assert!((7200..=7800).contains(&c_count), "c drawn {c_count} times");
}

#[test]
fn percent_weights_select_like_integers() {
    let mut ctx = EvalContext::from_seed(3);
    let choices = vec![weighted("won", "100%"), weighted("lost", "0%")];
    for _ in 0..100 {
        assert_eq!(random_choice(&mut ctx, &choices).unwrap(), Value::from("won"));
    }
}

#[test]
fn only_the_winning_pick_is_evaluated() {
    let counters: Vec<Rc<Cell<u32>>> = (0..3).map(|_| Rc::new(Cell::new(0))).collect();
    let choices = vec![
        Expr::choice(counting_pick("a", &counters[0]), Some(Expr::lit(1)), None),
        Expr::choice(counting_pick("b", &counters[1]), Some(Expr::lit(1)), None),
        Expr::choice(counting_pick("c", &counters[2]), Some(Expr::lit(1)), None),
    ];

    let mut ctx = EvalContext::from_seed(11);
    for round in 1..=20_u32 {
        random_choice(&mut ctx, &choices).unwrap();
        let total: u32 = counters.iter().map(|c| c.get()).sum();
        assert_eq!(total, round, "exactly one pick evaluated per draw");
    }
}

// =============================================================================
// Uniform Mode
// =============================================================================

#[test]
fn flat_lists_select_uniformly() {
    let mut ctx = EvalContext::from_seed(13);
    let choices = vec![Expr::lit("x"), Expr::lit("y"), Expr::lit("z")];

    let mut x_count = 0;
    let mut y_count = 0;
    let mut z_count = 0;
    for _ in 0..3_000 {
        match random_choice(&mut ctx, &choices).unwrap() {
            Value::String(s) if s == "x" => x_count += 1,
            Value::String(s) if s == "y" => y_count += 1,
            Value::String(s) if s == "z" => z_count += 1,
            other => panic!("unexpected selection: {other:?}"),
        }
    }
    for count in [x_count, y_count, z_count] {
        assert!((850..=1150).contains(&count), "uniform count out of range: {count}");
    }
}

#[test]
fn uniform_mode_evaluates_a_selected_deferred_entry() {
    let counter = Rc::new(Cell::new(0));
    let choices = vec![counting_pick("only", &counter)];

    let mut ctx = EvalContext::from_seed(5);
    let value = random_choice(&mut ctx, &choices).unwrap();
    assert_eq!(value, Value::from("only"));
    assert_eq!(counter.get(), 1);
}

#[test]
fn uniform_mode_leaves_losing_entries_untouched() {
    let counters: Vec<Rc<Cell<u32>>> = (0..4).map(|_| Rc::new(Cell::new(0))).collect();
    let choices: Vec<Expr> = counters
        .iter()
        .map(|counter| counting_pick("v", counter))
        .collect();

    let mut ctx = EvalContext::from_seed(17);
    for round in 1..=40_u32 {
        random_choice(&mut ctx, &choices).unwrap();
        let total: u32 = counters.iter().map(|c| c.get()).sum();
        assert_eq!(total, round);
    }
}

// =============================================================================
// Mode Detection and Structure
// =============================================================================

#[test]
fn empty_choice_list_is_a_structural_error() {
    let mut ctx = EvalContext::from_seed(1);
    let result = random_choice(&mut ctx, &[]);
    assert!(matches!(result, Err(HelperError::EmptyChoices { helper: "random_choice" })));
}

#[test]
fn weighted_mode_rejects_plain_entries() {
    let mut ctx = EvalContext::from_seed(1);
    let choices = vec![weighted("a", 1), Expr::lit("plain")];
    let result = random_choice(&mut ctx, &choices);
    assert!(matches!(result, Err(HelperError::ExpectedChoice { helper: "random_choice", .. })));
}

#[test]
fn weighted_mode_rejects_entries_without_probability() {
    let mut ctx = EvalContext::from_seed(1);
    let choices = vec![
        weighted("a", 1),
        Expr::choice(Expr::lit("b"), None, Some(Expr::lit(true))),
    ];
    let result = random_choice(&mut ctx, &choices);
    assert!(matches!(result, Err(HelperError::MissingProbability)));
}
