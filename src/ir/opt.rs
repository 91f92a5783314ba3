use crate::ir::analyze::{needed, reach};
use crate::ir::def::{BasicBlock, ClassDef, FunDef, Program, VarInit};
use crate::ir::verify::{self, VerifyError};
use std::env;

pub mod dce;
pub mod fold;
pub mod simplify;

/// Fixed-point driver: folds, simplifies and sweeps every body until an
/// iteration changes nothing. The input program is never mutated; every
/// iteration rebuilds fresh IR.
pub struct Optimizer;

#[derive(Debug, Default, Clone, Copy)]
pub struct OptStats {
    pub folded: usize,
    pub simplified: usize,
    pub removed: usize,
    pub iterations: usize,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer {
    pub fn new() -> Self {
        Self
    }

    fn env_bool(key: &str, default_v: bool) -> bool {
        match env::var(key) {
            Ok(v) => matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ),
            Err(_) => default_v,
        }
    }

    fn env_usize(key: &str, default_v: usize) -> usize {
        env::var(key)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(default_v)
    }

    fn trace_enabled() -> bool {
        Self::env_bool("PYRITE_TRACE_OPT", false)
    }

    fn verify_each_pass() -> bool {
        Self::env_bool("PYRITE_VERIFY_EACH_PASS", false)
    }

    // Termination is monotone; the cap only guards against regressions.
    fn max_opt_iterations() -> usize {
        Self::env_usize("PYRITE_OPT_MAX_ITERS", 32)
    }

    pub fn run<A: Clone>(&self, program: &Program<A>) -> Result<Program<A>, VerifyError> {
        self.run_with_stats(program).map(|(p, _)| p)
    }

    pub fn run_with_stats<A: Clone>(
        &self,
        program: &Program<A>,
    ) -> Result<(Program<A>, OptStats), VerifyError> {
        verify::verify_program(program)?;

        let mut current = program.clone();
        let mut stats = OptStats::default();
        let max_iters = Self::max_opt_iterations();
        loop {
            if Self::trace_enabled() {
                Self::trace_reaching(&current);
            }

            let mut changed = false;
            current = Self::rewrite_program(&current, &mut stats, &mut changed);
            stats.iterations += 1;

            if Self::trace_enabled() {
                eprintln!("opt: iteration {} changed={}", stats.iterations, changed);
            }
            if Self::verify_each_pass() {
                verify::verify_program(&current)?;
            }
            if !changed || stats.iterations >= max_iters {
                break;
            }
        }
        Ok((current, stats))
    }

    fn rewrite_program<A: Clone>(
        program: &Program<A>,
        stats: &mut OptStats,
        changed: &mut bool,
    ) -> Program<A> {
        Program {
            inits: program.inits.clone(),
            funs: program
                .funs
                .iter()
                .map(|fun| Self::rewrite_fun(fun, stats, changed))
                .collect(),
            classes: program
                .classes
                .iter()
                .map(|class| ClassDef {
                    name: class.name.clone(),
                    methods: class
                        .methods
                        .iter()
                        .map(|method| Self::rewrite_fun(method, stats, changed))
                        .collect(),
                })
                .collect(),
            body: Self::rewrite_body(&program.body, stats, changed),
        }
    }

    fn rewrite_fun<A: Clone>(
        fun: &FunDef<A>,
        stats: &mut OptStats,
        changed: &mut bool,
    ) -> FunDef<A> {
        FunDef {
            name: fun.name.clone(),
            inits: fun.inits.clone(),
            body: Self::rewrite_body(&fun.body, stats, changed),
        }
    }

    /// One iteration over a single body: fold and simplify every
    /// statement, then recompute neededness and sweep dead assignments.
    fn rewrite_body<A: Clone>(
        blocks: &[BasicBlock<A>],
        stats: &mut OptStats,
        changed: &mut bool,
    ) -> Vec<BasicBlock<A>> {
        let mut rewritten: Vec<BasicBlock<A>> = Vec::with_capacity(blocks.len());
        for block in blocks {
            let (folded, fold_hits) = fold::fold_block(block);
            let (simplified, simplify_hits) = simplify::simplify_block(&folded);
            stats.folded += fold_hits;
            stats.simplified += simplify_hits;
            if fold_hits + simplify_hits > 0 {
                *changed = true;
            }
            rewritten.push(simplified);
        }

        let needed_map = needed::analyze(&rewritten);
        let anywhere = dce::needed_anywhere(&needed_map);
        rewritten
            .iter()
            .map(|block| {
                let (swept, dropped) = dce::sweep_block(block, &needed_map, &anywhere);
                stats.removed += dropped;
                if dropped > 0 {
                    *changed = true;
                }
                swept
            })
            .collect()
    }

    fn trace_reaching<A>(program: &Program<A>) {
        fn dump<A>(name: &str, inits: &[VarInit<A>], blocks: &[BasicBlock<A>]) {
            let reaching = reach::analyze(inits, blocks);
            eprintln!("reaching definitions for {}:\n{}", name, reaching.dump());
        }

        dump("<main>", &program.inits, &program.body);
        for fun in &program.funs {
            dump(&fun.name, &fun.inits, &fun.body);
        }
        for class in &program.classes {
            for method in &class.methods {
                let name = format!("{}.{}", class.name, method.name);
                dump(&name, &method.inits, &method.body);
            }
        }
    }
}
