use crate::ir::def::{BinOp, Expr, ExprKind, ValueKind};

/// Checks if evaluating an expression is free of observable effects.
///
/// Calls are never pure here; the optimizer has no inter-procedural view.
/// Integer division and modulo trap on a zero divisor, so they only count
/// as pure when the divisor is a nonzero literal. Loads and allocations
/// whose results go unused are unobservable in this memory model.
pub fn expr_is_pure<A>(expr: &Expr<A>) -> bool {
    match &expr.kind {
        ExprKind::Value(_) => true,
        ExprKind::Binary {
            op: BinOp::IDiv | BinOp::Mod,
            rhs,
            ..
        } => matches!(&rhs.kind, ValueKind::Num(n) if *n != 0),
        ExprKind::Binary { .. } | ExprKind::Unary { .. } => true,
        ExprKind::Call { .. } => false,
        ExprKind::Alloc { .. } => true,
        ExprKind::Load { .. } => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::def::{UnOp, Value};

    fn expr(kind: ExprKind<()>) -> Expr<()> {
        Expr::new(kind, ())
    }

    fn num(n: i128) -> Value<()> {
        Value::new(ValueKind::Num(n), ())
    }

    fn id(name: &str) -> Value<()> {
        Value::new(ValueKind::Id(name.to_string()), ())
    }

    #[test]
    fn division_by_variable_may_trap() {
        let e = expr(ExprKind::Binary {
            op: BinOp::IDiv,
            lhs: id("a"),
            rhs: id("b"),
        });
        assert!(!expr_is_pure(&e));
    }

    #[test]
    fn division_by_nonzero_literal_is_pure() {
        let e = expr(ExprKind::Binary {
            op: BinOp::IDiv,
            lhs: id("a"),
            rhs: num(4),
        });
        assert!(expr_is_pure(&e));
    }

    #[test]
    fn division_by_zero_literal_is_not_pure() {
        let e = expr(ExprKind::Binary {
            op: BinOp::Mod,
            lhs: id("a"),
            rhs: num(0),
        });
        assert!(!expr_is_pure(&e));
    }

    #[test]
    fn calls_are_never_pure() {
        let e = expr(ExprKind::Call {
            callee: "len".to_string(),
            args: vec![id("xs")],
        });
        assert!(!expr_is_pure(&e));
    }

    #[test]
    fn arithmetic_and_memory_reads_are_pure() {
        assert!(expr_is_pure(&expr(ExprKind::Binary {
            op: BinOp::Add,
            lhs: id("a"),
            rhs: num(1),
        })));
        assert!(expr_is_pure(&expr(ExprKind::Unary {
            op: UnOp::Not,
            operand: id("b"),
        })));
        assert!(expr_is_pure(&expr(ExprKind::Load {
            base: id("p"),
            offset: num(0),
        })));
        assert!(expr_is_pure(&expr(ExprKind::Alloc { amount: num(2) })));
    }
}
