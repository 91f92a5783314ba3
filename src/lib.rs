//! IR-level optimizer for the Pyrite compiler.
//!
//! The front end lowers a typed Python-like surface language into the
//! block-structured IR defined in [`ir::def`]; this crate analyzes and
//! rewrites that IR before it is handed to the code generator. The entry
//! point is [`ir::opt::Optimizer`], which folds constants, simplifies
//! algebraic identities and removes assignments that neededness analysis
//! proves dead, iterating the three until nothing changes.

pub mod ir;
pub mod utils;
