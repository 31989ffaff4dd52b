//! Loop and block signal handling.

use kb_ir::Name;

use super::{Flow, Signal};

/// What a loop does after one body execution.
#[derive(Clone, Debug, PartialEq)]
pub enum LoopAction {
    /// Go on with the next iteration (normal completion or a matching `next`).
    Continue,
    /// Leave the loop (a matching `break`).
    Break,
    /// Not ours: hand the signal to the enclosing construct.
    Propagate(Signal),
}

/// Classify the outcome of a loop body for a loop labelled `label`.
pub fn loop_action(flow: Flow, label: Option<&Name>) -> LoopAction {
    match flow {
        Flow::Normal => LoopAction::Continue,
        Flow::Signal(Signal::Break(target)) if Signal::targets(target.as_ref(), label) => {
            LoopAction::Break
        }
        Flow::Signal(Signal::Next(target)) if Signal::targets(target.as_ref(), label) => {
            LoopAction::Continue
        }
        Flow::Signal(signal) => LoopAction::Propagate(signal),
    }
}

/// Outcome of a `do` block: a matching `break` or `next` ends it.
pub fn block_flow(flow: Flow, label: Option<&Name>) -> Flow {
    match flow {
        Flow::Signal(Signal::Break(target) | Signal::Next(target))
            if Signal::targets(target.as_ref(), label) =>
        {
            Flow::Normal
        }
        other => other,
    }
}

/// What a switch does after running a matching case.
#[derive(Clone, Debug, PartialEq)]
pub enum CaseAction {
    /// Finished; the switch is done.
    Done,
    /// A matching `next`: keep trying the remaining cases.
    Fallthrough,
    Propagate(Signal),
}

/// Classify the outcome of a switch case. A `break` is only consumed when it
/// names the switch's own label.
pub fn case_action(flow: Flow, label: Option<&Name>) -> CaseAction {
    match flow {
        Flow::Normal => CaseAction::Done,
        Flow::Signal(Signal::Next(target)) if Signal::targets(target.as_ref(), label) => {
            CaseAction::Fallthrough
        }
        // A bare `break` targets the innermost loop or do-block, never the switch.
        Flow::Signal(Signal::Break(Some(target))) if label == Some(&target) => CaseAction::Done,
        Flow::Signal(signal) => CaseAction::Propagate(signal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn label(name: &str) -> Option<Name> {
        Some(Name::new(name))
    }

    #[test]
    fn unlabelled_break_ends_innermost_loop() {
        let flow = Flow::Signal(Signal::Break(None));
        assert_eq!(loop_action(flow, label("outer").as_ref()), LoopAction::Break);
    }

    #[test]
    fn labelled_break_skips_other_loops() {
        let flow = Flow::Signal(Signal::Break(label("outer")));
        assert_eq!(
            loop_action(flow.clone(), None),
            LoopAction::Propagate(Signal::Break(label("outer")))
        );
        assert_eq!(loop_action(flow, label("outer").as_ref()), LoopAction::Break);
    }

    #[test]
    fn return_and_yield_pass_through_loops() {
        assert_eq!(
            loop_action(Flow::Signal(Signal::Return), None),
            LoopAction::Propagate(Signal::Return)
        );
    }

    #[test]
    fn do_block_consumes_next_and_break() {
        assert_eq!(block_flow(Flow::Signal(Signal::Next(None)), None), Flow::Normal);
        assert_eq!(
            block_flow(Flow::Signal(Signal::Break(label("a"))), label("b").as_ref()),
            Flow::Signal(Signal::Break(label("a")))
        );
    }

    #[test]
    fn switch_only_consumes_its_own_break() {
        assert_eq!(
            case_action(Flow::Signal(Signal::Break(None)), label("sw").as_ref()),
            CaseAction::Propagate(Signal::Break(None))
        );
        assert_eq!(
            case_action(Flow::Signal(Signal::Break(label("sw"))), label("sw").as_ref()),
            CaseAction::Done
        );
        assert_eq!(
            case_action(Flow::Signal(Signal::Next(None)), None),
            CaseAction::Fallthrough
        );
    }
}
