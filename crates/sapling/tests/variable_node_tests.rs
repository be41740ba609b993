use sapling::*;

// ═══════════════════════════════════════════════════════════════════════
// y-Variable Atom: Value Tracking
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_y_atom_returns_context_value() {
    let node = Node::y();
    for v in [3.5, -2.0, 0.0, -0.0, 0.125, 1e-300, -123456.789] {
        let ctx = EvalContext::with_vars(0.0, v);
        assert_eq!(node.evaluate(&ctx).unwrap(), v);
    }
}

#[test]
fn test_y_atom_scenario_three_and_a_half() {
    let expr = Expression::parse("y").unwrap();
    let ctx = EvalContext::with_vars(0.0, 3.5);
    assert_eq!(expr.evaluate(&ctx).unwrap(), 3.5);
    assert!(expr.is_variable());
}

#[test]
fn test_y_atom_observes_updates() {
    let expr = Expression::parse("y").unwrap();
    let mut ctx = EvalContext::new();

    ctx.set_y(-2.0);
    assert_eq!(expr.evaluate(&ctx).unwrap(), -2.0);

    ctx.set_y(10.0);
    assert_eq!(expr.evaluate(&ctx).unwrap(), 10.0);
}

#[test]
fn test_y_atom_inside_tree_observes_updates() {
    let expr = Expression::parse("y * y + 1").unwrap();
    let mut ctx = EvalContext::new();
    let mut seen = Vec::new();
    for v in [1.0, 2.0, 3.0] {
        ctx.set(Axis::Y, v);
        seen.push(expr.evaluate(&ctx).unwrap());
    }
    assert_eq!(seen, vec![2.0, 5.0, 10.0]);
}

#[test]
fn test_y_atom_ignores_x() {
    let node = Node::y();
    let mut ctx = EvalContext::with_vars(1.0, 4.0);
    assert_eq!(node.evaluate(&ctx).unwrap(), 4.0);
    ctx.set_x(-50.0);
    assert_eq!(node.evaluate(&ctx).unwrap(), 4.0);
}

// ═══════════════════════════════════════════════════════════════════════
// y-Variable Atom: Classification
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_y_atom_is_always_variable() {
    let node = Node::y();
    for v in [f64::NAN, f64::INFINITY, 0.0, -1.0] {
        let _ctx = EvalContext::with_vars(0.0, v);
        assert!(node.is_variable());
        assert_eq!(node.kind(), ElementKind::Variable);
    }
}

#[test]
fn test_other_kinds_are_not_variables() {
    for src in ["1", "pi", "-y", "y + 0", "sin(y)"] {
        let expr = Expression::parse(src).unwrap();
        assert!(!expr.is_variable(), "`{}` should not be a variable", src);
    }
}

#[test]
fn test_x_atom_symmetry() {
    let expr = Expression::parse("x").unwrap();
    assert!(expr.is_variable());
    assert_eq!(expr.eval_at(-7.25, 1.0).unwrap(), -7.25);
}

// ═══════════════════════════════════════════════════════════════════════
// Malformed Atoms
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_invalid_atom_fails_instead_of_returning_value() {
    let node = Node::Variable(Variable::with_kind(Axis::Y, ElementKind::Invalid));
    let ctx = EvalContext::with_vars(0.0, 3.5);
    let err = node.evaluate(&ctx).unwrap_err();
    assert_eq!(
        err,
        EvalError::InvalidExpression {
            kind: "invalid".to_string()
        }
    );
}

#[test]
fn test_invalid_atom_error_surfaces_through_tree() {
    let bad = Node::Variable(Variable::with_kind(Axis::Y, ElementKind::Invalid));
    let tree = Node::call(Function::Sin, vec![Node::add(Node::x(), bad)]);
    let ctx = EvalContext::with_vars(1.0, 2.0);
    assert!(matches!(
        tree.evaluate(&ctx),
        Err(EvalError::InvalidExpression { .. })
    ));
}
