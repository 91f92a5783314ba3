use crate::ir::def::{BasicBlock, BinOp, Expr, ExprKind, Stmt, UnOp, Value, ValueKind};

/// Attempts to fold a binop or uniop over literal operands into a single
/// value. `Option::None` means the expression is not foldable and must be
/// left intact.
///
/// Arithmetic is checked: a fold that would overflow, or divide or take a
/// remainder by a literal zero, is declined so the runtime behavior is
/// preserved. The folded value inherits the annotation of the left (unary:
/// the only) operand; the enclosing expression keeps its own.
pub fn fold_expr<A: Clone>(expr: &Expr<A>) -> Option<Expr<A>> {
    let folded = match &expr.kind {
        ExprKind::Binary { op, lhs, rhs } => {
            if is_literal(&lhs.kind) && is_literal(&rhs.kind) {
                let kind = fold_binary(*op, &lhs.kind, &rhs.kind)?;
                Value::new(kind, lhs.annot.clone())
            } else {
                return None;
            }
        }
        ExprKind::Unary { op, operand } => {
            if matches!(operand.kind, ValueKind::Num(_) | ValueKind::Bool(_)) {
                let kind = fold_unary(*op, &operand.kind)?;
                Value::new(kind, operand.annot.clone())
            } else {
                return None;
            }
        }
        _ => return None,
    };
    Some(Expr::new(ExprKind::Value(folded), expr.annot.clone()))
}

fn is_literal(kind: &ValueKind) -> bool {
    !matches!(kind, ValueKind::Id(_))
}

fn fold_binary(op: BinOp, lhs: &ValueKind, rhs: &ValueKind) -> Option<ValueKind> {
    use ValueKind::{Bool, Num};
    match (op, lhs, rhs) {
        (BinOp::Add, Num(a), Num(b)) => a.checked_add(*b).map(Num),
        (BinOp::Sub, Num(a), Num(b)) => a.checked_sub(*b).map(Num),
        (BinOp::Mul, Num(a), Num(b)) => a.checked_mul(*b).map(Num),
        (BinOp::IDiv, Num(a), Num(b)) if *b != 0 => a.checked_div(*b).map(Num),
        (BinOp::Mod, Num(a), Num(b)) if *b != 0 => a.checked_rem(*b).map(Num),
        (BinOp::Lt, Num(a), Num(b)) => Some(Bool(a < b)),
        (BinOp::Le, Num(a), Num(b)) => Some(Bool(a <= b)),
        (BinOp::Gt, Num(a), Num(b)) => Some(Bool(a > b)),
        (BinOp::Ge, Num(a), Num(b)) => Some(Bool(a >= b)),
        (BinOp::Eq, _, _) | (BinOp::Ne, _, _) => fold_equality(op, lhs, rhs),
        (BinOp::And, Bool(a), Bool(b)) => Some(Bool(*a && *b)),
        (BinOp::Or, Bool(a), Bool(b)) => Some(Bool(*a || *b)),
        _ => None,
    }
}

fn fold_equality(op: BinOp, lhs: &ValueKind, rhs: &ValueKind) -> Option<ValueKind> {
    let eq = match (lhs, rhs) {
        // The language defines comparison against `none` as equal.
        (ValueKind::None, _) | (_, ValueKind::None) => true,
        (ValueKind::Num(a), ValueKind::Num(b)) => a == b,
        (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
        // num-to-bool comparison is rejected by the checker upstream.
        _ => return None,
    };
    Some(ValueKind::Bool(if op == BinOp::Eq { eq } else { !eq }))
}

fn fold_unary(op: UnOp, operand: &ValueKind) -> Option<ValueKind> {
    match (op, operand) {
        (UnOp::Neg, ValueKind::Num(n)) => n.checked_neg().map(ValueKind::Num),
        (UnOp::Not, ValueKind::Bool(b)) => Some(ValueKind::Bool(!b)),
        _ => None,
    }
}

pub fn fold_stmt<A: Clone>(stmt: &Stmt<A>) -> (Stmt<A>, bool) {
    match stmt {
        Stmt::Assign { dst, src } => match fold_expr(src) {
            Some(folded) => (
                Stmt::Assign {
                    dst: dst.clone(),
                    src: folded,
                },
                true,
            ),
            None => (stmt.clone(), false),
        },
        Stmt::Eval { expr } => match fold_expr(expr) {
            Some(folded) => (Stmt::Eval { expr: folded }, true),
            None => (stmt.clone(), false),
        },
        _ => (stmt.clone(), false),
    }
}

/// Folds every statement of a block, returning the rewritten block and the
/// number of statements that changed.
pub fn fold_block<A: Clone>(block: &BasicBlock<A>) -> (BasicBlock<A>, usize) {
    let mut hits = 0;
    let stmts = block
        .stmts
        .iter()
        .map(|stmt| {
            let (folded, changed) = fold_stmt(stmt);
            if changed {
                hits += 1;
            }
            folded
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
