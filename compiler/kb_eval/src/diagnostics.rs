//! Live call stack.
//!
//! Every sub invocation pushes a [`CallFrame`]; the optional depth limit is
//! checked on push. When an error leaves a sub, the frames are snapshotted
//! into the error's [`EvalBacktrace`].

use kb_ir::Span;

use crate::errors::{stack_overflow, BacktraceFrame, EvalBacktrace, EvalError};

#[derive(Clone, Debug)]
pub struct CallFrame {
    /// Signature of the called overload.
    pub signature: String,
    /// Where the call was made.
    pub call_span: Span,
}

#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `None` means unlimited; native stack growth still applies.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, failing with `StackOverflow` at the limit.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(stack_overflow(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop on empty stack");
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Snapshot, innermost call first.
    pub fn capture(&self) -> EvalBacktrace {
        EvalBacktrace::new(
            self.frames
                .iter()
                .rev()
                .map(|f| BacktraceFrame {
                    name: f.signature.clone(),
                    span: f.call_span,
                })
                .collect(),
        )
    }
}
