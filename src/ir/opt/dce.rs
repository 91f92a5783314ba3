use crate::ir::analyze::NameSet;
use crate::ir::analyze::effects;
use crate::ir::analyze::needed::NeedMap;
use crate::ir::def::{BasicBlock, Line, Stmt};

/// Union of every needed set in the map. An assignment whose target is
/// absent here feeds no observable behavior on any path.
pub fn needed_anywhere(needed: &NeedMap) -> NameSet {
    let mut all = NameSet::default();
    for set in needed.values() {
        all.extend(set.iter().cloned());
    }
    all
}

/// Drops assignments whose target is needed neither at their own line nor
/// anywhere else in the body, provided the right-hand side cannot trap or
/// perform effects. Non-assign statements are preserved verbatim, in
/// order. Returns the rewritten block and the number of dropped
/// statements.
pub fn sweep_block<A: Clone>(
    block: &BasicBlock<A>,
    needed: &NeedMap,
    anywhere: &NameSet,
) -> (BasicBlock<A>, usize) {
    let mut dropped = 0;
    let mut stmts = Vec::with_capacity(block.stmts.len());
    for (index, stmt) in block.stmts.iter().enumerate() {
        if let Stmt::Assign { dst, src } = stmt {
            let line = Line::new(block.label.clone(), index);
            let needed_here = needed.get(&line).is_some_and(|set| set.contains(dst));
            if !needed_here && !anywhere.contains(dst) && effects::expr_is_pure(src) {
                dropped += 1;
                continue;
            }
        }
        stmts.push(stmt.clone());
    }
    (
        BasicBlock {
            label: block.label.clone(),
            stmts,
        },
        dropped,
    )
}
