pub mod effects;
pub mod live;
pub mod needed;
pub mod reach;

use crate::ir::def::{Expr, ExprKind, Value};
use rustc_hash::FxHashSet;

pub type NameSet = FxHashSet<String>;

/// Adds the variable read by a value, if any.
pub(crate) fn value_uses<A>(value: &Value<A>, out: &mut NameSet) {
    if let Some(name) = value.id_name() {
        out.insert(name.to_string());
    }
}

/// Adds every variable an expression reads. Sub-expressions are always
/// values, so one level of traversal is exhaustive.
pub(crate) fn expr_uses<A>(expr: &Expr<A>, out: &mut NameSet) {
    match &expr.kind {
        ExprKind::Value(v) => value_uses(v, out),
        ExprKind::Binary { lhs, rhs, .. } => {
            value_uses(lhs, out);
            value_uses(rhs, out);
        }
        ExprKind::Unary { operand, .. } => value_uses(operand, out),
        ExprKind::Call { args, .. } => {
            for arg in args {
                value_uses(arg, out);
            }
        }
        ExprKind::Alloc { amount } => value_uses(amount, out),
        ExprKind::Load { base, offset } => {
            value_uses(base, out);
            value_uses(offset, out);
        }
    }
}
