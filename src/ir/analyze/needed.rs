use super::{NameSet, expr_uses, value_uses};
use crate::ir::def::{BasicBlock, BinOp, Expr, ExprKind, Line, Stmt};
use rustc_hash::FxHashMap;

/// Needed-in set per statement line.
pub type NeedMap = FxHashMap<Line, NameSet>;

/// Backward neededness: liveness refined to the variables that are
/// transitively required for the program's observable behavior.
///
/// Three rules drive the transfer: a variable participating in a side
/// effect or control observation at a line is needed there; a variable
/// needed at the successor stays needed unless the line assigns it; and
/// when an assigned name is needed downstream, everything its right-hand
/// side reads becomes needed too.
pub fn analyze<A>(blocks: &[BasicBlock<A>]) -> NeedMap {
    let mut needed: NeedMap = FxHashMap::default();
    let mut changed = true;
    while changed {
        changed = false;
        for (bi, block) in blocks.iter().enumerate().rev() {
            for (si, stmt) in block.stmts.iter().enumerate().rev() {
                let succ = successor_set(&needed, blocks, bi, si);
                let new_set = transfer(stmt, &succ, &needed);
                let line = Line::new(block.label.clone(), si);
                let entry = needed.entry(line).or_default();
                if *entry != new_set {
                    *entry = new_set;
                    changed = true;
                }
            }
        }
    }
    needed
}

fn successor_set<A>(needed: &NeedMap, blocks: &[BasicBlock<A>], bi: usize, si: usize) -> NameSet {
    let block = &blocks[bi];
    if si + 1 < block.stmts.len() {
        needed
            .get(&Line::new(block.label.clone(), si + 1))
            .cloned()
            .unwrap_or_default()
    } else if bi + 1 < blocks.len() {
        needed
            .get(&Line::entry(&blocks[bi + 1].label))
            .cloned()
            .unwrap_or_default()
    } else {
        NameSet::default()
    }
}

fn transfer<A>(stmt: &Stmt<A>, succ: &NameSet, needed: &NeedMap) -> NameSet {
    match stmt {
        Stmt::Assign { dst, src } => {
            let mut set = succ.clone();
            let target_needed = set.remove(dst);
            if target_needed {
                expr_uses(src, &mut set);
            }
            necessity(src, &mut set);
            set
        }
        Stmt::Eval { expr } => {
            let mut set = succ.clone();
            expr_uses(expr, &mut set);
            set
        }
        Stmt::Return { value } => {
            let mut set = NameSet::default();
            value_uses(value, &mut set);
            set
        }
        Stmt::If {
            cond,
            then_lbl,
            else_lbl,
        } => {
            let mut set = needed
                .get(&Line::entry(then_lbl))
                .cloned()
                .unwrap_or_default();
            if let Some(other) = needed.get(&Line::entry(else_lbl)) {
                set.extend(other.iter().cloned());
            }
            value_uses(cond, &mut set);
            set
        }
        Stmt::Goto { target } => needed.get(&Line::entry(target)).cloned().unwrap_or_default(),
        Stmt::Store {
            base,
            offset,
            value,
        } => {
            let mut set = succ.clone();
            value_uses(base, &mut set);
            value_uses(offset, &mut set);
            value_uses(value, &mut set);
            set
        }
        Stmt::Pass => succ.clone(),
    }
}

/// Variables whose values participate in a side effect or trap when the
/// expression is evaluated. Integer division and modulo may trap on a zero
/// divisor, so both operands count; calls may do anything, so every
/// argument counts; an allocation observes its size; a load observes its
/// offset but not its base.
fn necessity<A>(expr: &Expr<A>, out: &mut NameSet) {
    match &expr.kind {
        ExprKind::Binary {
            op: BinOp::IDiv | BinOp::Mod,
            lhs,
            rhs,
        } => {
            value_uses(lhs, out);
            value_uses(rhs, out);
        }
        ExprKind::Value(_) | ExprKind::Binary { .. } | ExprKind::Unary { .. } => {}
        ExprKind::Call { args, .. } => {
            for arg in args {
                value_uses(arg, out);
            }
        }
        ExprKind::Alloc { amount } => value_uses(amount, out),
        ExprKind::Load { offset, .. } => value_uses(offset, out),
    }
}
