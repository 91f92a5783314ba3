use crate::ir::def::{BasicBlock, Label, Program, Stmt};
use rustc_hash::FxHashSet;
use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    DuplicateLabel {
        label: Label,
    },
    UnknownTarget {
        block: Label,
        target: Label,
    },
    /// A terminator is followed by further statements in the same block.
    TrailingStmts {
        block: Label,
        index: usize,
    },
    DuplicateInit {
        name: String,
    },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::DuplicateLabel { label } => {
                write!(f, "Duplicate block label: {}", label)
            }
            VerifyError::UnknownTarget { block, target } => {
                write!(f, "Block {} jumps to unknown label {}", block, target)
            }
            VerifyError::TrailingStmts { block, index } => {
                write!(
                    f,
                    "Block {} has statements after its terminator (index {})",
                    block, index
                )
            }
            VerifyError::DuplicateInit { name } => {
                write!(f, "Variable {} is initialized twice", name)
            }
        }
    }
}

impl error::Error for VerifyError {}

pub fn verify_program<A>(program: &Program<A>) -> Result<(), VerifyError> {
    check_inits(program.inits.iter().map(|i| i.name.as_str()))?;
    verify_body(&program.body)?;
    for fun in &program.funs {
        check_inits(fun.inits.iter().map(|i| i.name.as_str()))?;
        verify_body(&fun.body)?;
    }
    for class in &program.classes {
        for method in &class.methods {
            check_inits(method.inits.iter().map(|i| i.name.as_str()))?;
            verify_body(&method.body)?;
        }
    }
    Ok(())
}

pub fn verify_body<A>(blocks: &[BasicBlock<A>]) -> Result<(), VerifyError> {
    let mut labels: FxHashSet<&str> = FxHashSet::default();
    for block in blocks {
        if !labels.insert(block.label.as_str()) {
            return Err(VerifyError::DuplicateLabel {
                label: block.label.clone(),
            });
        }
    }

    for block in blocks {
        for (index, stmt) in block.stmts.iter().enumerate() {
            if stmt.is_terminator() && index + 1 != block.stmts.len() {
                return Err(VerifyError::TrailingStmts {
                    block: block.label.clone(),
                    index: index + 1,
                });
            }
            match stmt {
                Stmt::If {
                    then_lbl, else_lbl, ..
                } => {
                    check_target(&labels, &block.label, then_lbl)?;
                    check_target(&labels, &block.label, else_lbl)?;
                }
                Stmt::Goto { target } => check_target(&labels, &block.label, target)?,
                _ => {}
            }
        }
    }
    Ok(())
}

fn check_target(
    labels: &FxHashSet<&str>,
    block: &str,
    target: &str,
) -> Result<(), VerifyError> {
    if labels.contains(target) {
        Ok(())
    } else {
        Err(VerifyError::UnknownTarget {
            block: block.to_string(),
            target: target.to_string(),
        })
    }
}

fn check_inits<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), VerifyError> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for name in names {
        if !seen.insert(name) {
            return Err(VerifyError::DuplicateInit {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
