use super::{NameSet, expr_uses, value_uses};
use crate::ir::def::{BasicBlock, Line, Stmt};
use rustc_hash::FxHashMap;

/// Live-in set per statement line.
pub type LiveMap = FxHashMap<Line, NameSet>;

/// Backward liveness: for each line, the variables whose values may still
/// be read on some path from that point.
///
/// Saturates by sweeping blocks in reverse textual order and statements in
/// reverse index until no set changes.
pub fn analyze<A>(blocks: &[BasicBlock<A>]) -> LiveMap {
    let mut live: LiveMap = FxHashMap::default();
    let mut changed = true;
    while changed {
        changed = false;
        for (bi, block) in blocks.iter().enumerate().rev() {
            for (si, stmt) in block.stmts.iter().enumerate().rev() {
                let succ = successor_set(&live, blocks, bi, si);
                let new_set = transfer(stmt, &succ, &live);
                let line = Line::new(block.label.clone(), si);
                let entry = live.entry(line).or_default();
                if *entry != new_set {
                    *entry = new_set;
                    changed = true;
                }
            }
        }
    }
    live
}

/// Live-in of the textual successor: the next statement in the block, or
/// the entry of the next block on fall-through. Terminators never consult
/// this.
fn successor_set<A>(live: &LiveMap, blocks: &[BasicBlock<A>], bi: usize, si: usize) -> NameSet {
    let block = &blocks[bi];
    if si + 1 < block.stmts.len() {
        live.get(&Line::new(block.label.clone(), si + 1))
            .cloned()
            .unwrap_or_default()
    } else if bi + 1 < blocks.len() {
        live.get(&Line::entry(&blocks[bi + 1].label))
            .cloned()
            .unwrap_or_default()
    } else {
        NameSet::default()
    }
}

fn transfer<A>(stmt: &Stmt<A>, succ: &NameSet, live: &LiveMap) -> NameSet {
    match stmt {
        Stmt::Assign { dst, src } => {
            let mut set = succ.clone();
            set.remove(dst);
            expr_uses(src, &mut set);
            set
        }
        Stmt::Eval { expr } => {
            let mut set = NameSet::default();
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
            let mut set = live
                .get(&Line::entry(then_lbl))
                .cloned()
                .unwrap_or_default();
            if let Some(other) = live.get(&Line::entry(else_lbl)) {
                set.extend(other.iter().cloned());
            }
            value_uses(cond, &mut set);
            set
        }
        Stmt::Goto { target } => live.get(&Line::entry(target)).cloned().unwrap_or_default(),
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
