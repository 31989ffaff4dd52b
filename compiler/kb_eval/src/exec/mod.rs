//! Control-flow plumbing shared by the statement executors.
//!
//! Signals are ordinary results: every statement executor returns a
//! [`Flow`], and loops, `do` blocks, switches and subroutine boundaries decide
//! whether to consume a signal or hand it to their caller.

pub mod control;
mod signal;

pub use signal::{ExecResult, Flow, Signal};
