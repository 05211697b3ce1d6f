// src/exec/mod.rs

//! Compiler process execution layer.
//!
//! - [`backend`] provides the `JobExecutor` trait the runtime talks to, so
//!   tests can swap in a fake executor that never spawns processes.
//! - [`pool`] is the production implementation: a bounded pool of compiler
//!   processes run via `tokio::process`, reporting completions back to the
//!   runtime as `BuildEvent`s.

pub mod backend;
pub mod pool;

pub use backend::JobExecutor;
pub use pool::ProcessPool;
