//! Step recording and the immutable trace it produces.
//!
//! Every note runs its algorithm once through a [`Recorder`], emitting one
//! [`Step`] per observable decision. The finished [`Trace`] is then scrubbed
//! by the [`Player`](crate::player::Player) without ever being touched again.

use crate::errors::TraceError;
use crate::scene::{Scene, Visualize};
use serde::Serialize;
use std::fmt::Debug;

/// Upper bound on steps a single generator may emit
pub const DEFAULT_STEP_LIMIT: usize = 10_000;

/// A closed per-algorithm tag naming what kind of operation a step records
pub trait Phase: Copy + Debug + PartialEq + Serialize {
    fn label(&self) -> &'static str;
}

/// One recorded instant of an algorithm's execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step<S, P> {
    pub index: usize,
    pub phase: P,
    /// Tag of the reference code line to highlight
    pub code_line: &'static str,
    pub explanation: String,
    pub state: S,
}

/// Ordered, non-empty sequence of steps from a single generator run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace<S, P> {
    steps: Vec<Step<S, P>>,
}

impl<S, P> Trace<S, P> {
    /// Get a step by index
    pub fn get(&self, index: usize) -> Option<&Step<S, P>> {
        self.steps.get(index)
    }

    /// Get the number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A sealed trace holds at least one step, so this is false for any
    /// trace built by [`record`]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> &Step<S, P> {
        &self.steps[0]
    }

    pub fn last(&self) -> &Step<S, P> {
        &self.steps[self.steps.len() - 1]
    }

    pub fn steps(&self) -> &[Step<S, P>] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step<S, P>> {
        self.steps.iter()
    }
}

/// Append-only step buffer shared by every generator
#[derive(Debug)]
pub struct Recorder<S, P> {
    steps: Vec<Step<S, P>>,
    limit: usize,
}

impl<S, P> Recorder<S, P> {
    pub fn new(limit: usize) -> Self {
        Recorder {
            steps: Vec::new(),
            limit,
        }
    }

    /// Append a step. `state` is taken by value so that later mutation of
    /// the algorithm's containers can never leak into a recorded step.
    pub fn emit(
        &mut self,
        phase: P,
        code_line: &'static str,
        state: S,
        explanation: impl Into<String>,
    ) -> Result<(), TraceError> {
        if self.steps.len() >= self.limit {
            return Err(TraceError::StepLimitExceeded { limit: self.limit });
        }

        self.steps.push(Step {
            index: self.steps.len(),
            phase,
            code_line,
            explanation: explanation.into(),
            state,
        });
        Ok(())
    }

    /// Number of steps recorded so far
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Seal the buffer into a trace
    pub fn finish(self) -> Result<Trace<S, P>, TraceError> {
        if self.steps.is_empty() {
            return Err(TraceError::Empty);
        }
        Ok(Trace { steps: self.steps })
    }
}

/// Run `emit_steps` against a fresh recorder and seal the result.
pub fn record<S, P, F>(limit: usize, emit_steps: F) -> Result<Trace<S, P>, TraceError>
where
    F: FnOnce(&mut Recorder<S, P>) -> Result<(), TraceError>,
{
    let mut recorder = Recorder::new(limit);
    emit_steps(&mut recorder)?;
    recorder.finish()
}

/// Borrowed, type-erased view of one step, ready for rendering
#[derive(Debug, Clone)]
pub struct StepView<'a> {
    pub index: usize,
    pub total: usize,
    pub phase: &'static str,
    pub code_line: &'static str,
    pub explanation: &'a str,
    pub scene: Scene,
}

impl StepView<'_> {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

/// Object-safe access to any trace whose states can be drawn
pub trait TraceView: Debug {
    fn len(&self) -> usize;

    fn step(&self, index: usize) -> Option<StepView<'_>>;

    fn to_json(&self) -> serde_json::Result<String>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S, P> TraceView for Trace<S, P>
where
    S: Visualize + Debug + Serialize,
    P: Phase,
{
    fn len(&self) -> usize {
        self.steps.len()
    }

    fn step(&self, index: usize) -> Option<StepView<'_>> {
        let step = self.steps.get(index)?;
        Some(StepView {
            index,
            total: self.steps.len(),
            phase: step.phase.label(),
            code_line: step.code_line,
            explanation: &step.explanation,
            scene: step.state.scene(),
        })
    }

    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    enum Tick {
        Start,
        Count,
    }

    impl Phase for Tick {
        fn label(&self) -> &'static str {
            match self {
                Tick::Start => "start",
                Tick::Count => "count",
            }
        }
    }

    #[test]
    fn test_record_assigns_sequential_indices() {
        let trace = record(10, |rec: &mut Recorder<u32, Tick>| {
            rec.emit(Tick::Start, "init", 0, "start")?;
            for n in 1..=3 {
                rec.emit(Tick::Count, "loop", n, format!("n = {}", n))?;
            }
            Ok(())
        })
        .expect("recording failed");

        assert_eq!(trace.len(), 4);
        assert!(!trace.is_empty());
        for (i, step) in trace.iter().enumerate() {
            assert_eq!(step.index, i);
        }
        assert_eq!(trace.last().state, 3);
        assert_eq!(trace.first().phase, Tick::Start);
    }

    #[test]
    fn test_empty_recording_is_rejected() {
        let result = record(10, |_: &mut Recorder<u32, Tick>| Ok(()));
        assert!(matches!(result, Err(TraceError::Empty)));
    }

    #[test]
    fn test_step_limit() {
        let result = record(2, |rec: &mut Recorder<u32, Tick>| {
            for n in 0..3 {
                rec.emit(Tick::Count, "loop", n, "")?;
            }
            Ok(())
        });
        assert!(matches!(
            result,
            Err(TraceError::StepLimitExceeded { limit: 2 })
        ));
    }
}
