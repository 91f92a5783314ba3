use crate::ir::def::{BasicBlock, BinOp, Expr, ExprKind, Stmt, Value, ValueKind};

/// Algebraic identity rewrites over binops with one variable operand.
/// Reading a variable is effect-free, so each rewrite preserves behavior:
///
///   x + 0, 0 + x, x - 0  ->  x
///   x - x                ->  0
///   x * 1, 1 * x         ->  x
///   x * 0, 0 * x         ->  0
///   x // 1               ->  x
///
/// Fully literal operand pairs are the constant folder's job and are not
/// handled here.
pub fn simplify_expr<A: Clone>(expr: &Expr<A>) -> Option<Expr<A>> {
    let ExprKind::Binary { op, lhs, rhs } = &expr.kind else {
        return None;
    };

    let replacement = match op {
        BinOp::Add => {
            if is_zero(rhs) {
                lhs.clone()
            } else if is_zero(lhs) {
                rhs.clone()
            } else {
                return None;
            }
        }
        BinOp::Sub => {
            if is_zero(rhs) {
                lhs.clone()
            } else if same_variable(lhs, rhs) {
                Value::new(ValueKind::Num(0), lhs.annot.clone())
            } else {
                return None;
            }
        }
        BinOp::Mul => {
            if is_one(rhs) {
                lhs.clone()
            } else if is_one(lhs) {
                rhs.clone()
            } else if is_zero(rhs) || is_zero(lhs) {
                Value::new(ValueKind::Num(0), lhs.annot.clone())
            } else {
                return None;
            }
        }
        BinOp::IDiv => {
            if is_one(rhs) {
                lhs.clone()
            } else {
                return None;
            }
        }
        _ => return None,
    };

    Some(Expr::new(
        ExprKind::Value(replacement),
        expr.annot.clone(),
    ))
}

fn is_zero<A>(value: &Value<A>) -> bool {
    matches!(value.kind, ValueKind::Num(0))
}

fn is_one<A>(value: &Value<A>) -> bool {
    matches!(value.kind, ValueKind::Num(1))
}

fn same_variable<A>(lhs: &Value<A>, rhs: &Value<A>) -> bool {
    match (&lhs.kind, &rhs.kind) {
        (ValueKind::Id(a), ValueKind::Id(b)) => a == b,
        _ => false,
    }
}

pub fn simplify_stmt<A: Clone>(stmt: &Stmt<A>) -> (Stmt<A>, bool) {
    match stmt {
        Stmt::Assign { dst, src } => match simplify_expr(src) {
            Some(simplified) => (
                Stmt::Assign {
                    dst: dst.clone(),
                    src: simplified,
                },
                true,
            ),
            None => (stmt.clone(), false),
        },
        Stmt::Eval { expr } => match simplify_expr(expr) {
            Some(simplified) => (Stmt::Eval { expr: simplified }, true),
            None => (stmt.clone(), false),
        },
        _ => (stmt.clone(), false),
    }
}

pub fn simplify_block<A: Clone>(block: &BasicBlock<A>) -> (BasicBlock<A>, usize) {
    let mut hits = 0;
    let stmts = block
        .stmts
        .iter()
        .map(|stmt| {
            let (simplified, changed) = simplify_stmt(stmt);
            if changed {
                hits += 1;
            }
            simplified
        })
        .collect();
    (
        BasicBlock {
            label: block.label.clone(),
            stmts,
        },
        hits,
    )
}
