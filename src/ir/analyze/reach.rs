use crate::ir::def::{BasicBlock, Line, Stmt, VarInit};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::Write;

/// Per-variable may-reach definition sites at one program point.
pub type DefSites = FxHashMap<String, FxHashSet<Line>>;

#[derive(Debug, Clone)]
pub struct ReachEntry {
    pub line: Line,
    pub defs: DefSites,
}

/// Result of reaching-definitions analysis: one entry per statement, in
/// program order, addressable positionally or by line.
#[derive(Debug, Clone)]
pub struct Reaching {
    pub entries: Vec<ReachEntry>,
    line2num: FxHashMap<Line, usize>,
}

impl Reaching {
    pub fn at(&self, line: &Line) -> Option<&DefSites> {
        self.line2num.get(line).map(|&i| &self.entries[i].defs)
    }

    /// Diagnostic rendering, sorted so output is stable across runs.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(out, "{}", entry.line);
            let mut vars: Vec<_> = entry.defs.iter().collect();
            vars.sort_by(|a, b| a.0.cmp(b.0));
            for (name, sites) in vars {
                let mut rendered: Vec<String> = sites.iter().map(|l| l.to_string()).collect();
                rendered.sort();
                let _ = writeln!(out, "  {}: ({})", name, rendered.join(", "));
            }
        }
        out
    }
}

/// Forward worklist propagation over the body's control-flow graph.
///
/// Entry 0 seeds every `VarInit` name: a synthetic `$varInit` site when the
/// init value is a real binding, the empty set when it is `none` (meaning
/// the variable is not yet definitely defined).
pub fn analyze<A>(inits: &[VarInit<A>], blocks: &[BasicBlock<A>]) -> Reaching {
    let mut lines: Vec<Line> = Vec::new();
    let mut stmts: Vec<&Stmt<A>> = Vec::new();
    let mut line2num: FxHashMap<Line, usize> = FxHashMap::default();
    for block in blocks {
        for (index, stmt) in block.stmts.iter().enumerate() {
            let line = Line::new(block.label.clone(), index);
            line2num.insert(line.clone(), lines.len());
            lines.push(line);
            stmts.push(stmt);
        }
    }

    let mut maps: Vec<DefSites> = vec![DefSites::default(); lines.len()];
    if lines.is_empty() {
        return Reaching {
            entries: Vec::new(),
            line2num,
        };
    }

    for init in inits {
        let sites = if init.value.is_none() {
            FxHashSet::default()
        } else {
            let mut s = FxHashSet::default();
            s.insert(Line::var_init());
            s
        };
        maps[0].insert(init.name.clone(), sites);
    }

    // LIFO worklist of entry indices.
    let mut worklist: Vec<usize> = vec![0];
    while let Some(num) = worklist.pop() {
        let stmt = stmts[num];
        for succ in successors(stmt, num, &line2num, lines.len()) {
            if propagate(num, succ, stmt, &lines, &mut maps) {
                worklist.push(succ);
            }
        }
    }

    let entries = lines
        .into_iter()
        .zip(maps)
        .map(|(line, defs)| ReachEntry { line, defs })
        .collect();
    Reaching { entries, line2num }
}

fn successors<A>(
    stmt: &Stmt<A>,
    num: usize,
    line2num: &FxHashMap<Line, usize>,
    total: usize,
) -> Vec<usize> {
    match stmt {
        Stmt::Return { .. } => Vec::new(),
        Stmt::If {
            then_lbl, else_lbl, ..
        } => {
            let mut succs = Vec::new();
            if let Some(&n) = line2num.get(&Line::entry(then_lbl)) {
                succs.push(n);
            }
            if let Some(&n) = line2num.get(&Line::entry(else_lbl)) {
                succs.push(n);
            }
            succs
        }
        Stmt::Goto { target } => line2num
            .get(&Line::entry(target))
            .copied()
            .into_iter()
            .collect(),
        // Non-terminators flow to the next entry in program order, which
        // also covers fall-through from the end of a block.
        _ => {
            if num + 1 < total {
                vec![num + 1]
            } else {
                Vec::new()
            }
        }
    }
}

/// Unions the bindings at `from` into `to`. An assignment kills its own
/// name and contributes `{current line}` for it instead. Returns whether
/// `to` grew.
fn propagate<A>(
    from: usize,
    to: usize,
    stmt: &Stmt<A>,
    lines: &[Line],
    maps: &mut [DefSites],
) -> bool {
    // `from == to` is possible for a self-looping block, so the source
    // bindings are snapshotted before writing.
    let src = maps[from].clone();
    let dst = &mut maps[to];
    let mut changed = false;

    let killed = match stmt {
        Stmt::Assign { dst: name, .. } => Some(name),
        _ => None,
    };

    for (name, sites) in &src {
        if killed == Some(name) {
            continue;
        }
        let entry = dst.entry(name.clone()).or_default();
        for site in sites {
            if entry.insert(site.clone()) {
                changed = true;
            }
        }
    }

    if let Some(name) = killed {
        let entry = dst.entry(name.clone()).or_default();
        if entry.insert(lines[from].clone()) {
            changed = true;
        }
    }

    changed
}
