//! The notebook: one instrumented algorithm per note.
//!
//! Every note re-implements a textbook algorithm against a
//! [`Recorder`](crate::trace::Recorder), pairing each emitted step with the tag
//! of the reference code line it corresponds to.
//!
//! | Topic                    | Notes                                                          |
//! |--------------------------|----------------------------------------------------------------|
//! | Sliding Window           | longest unique substring, max sum window                       |
//! | Monotonic Stack          | next greater element, sum of subarray minimums                 |
//! | Binary Search on Answer  | ship within days, split array largest sum, koko eating bananas |
//! | DP Tabulation            | coin change, 0/1 knapsack, longest common subsequence          |
//! | Graphs                   | dijkstra, topological sort                                     |
//! | Tree Recursion           | max depth, path sum                                            |
//! | SQL Joins                | nested-loop join                                               |

pub mod binary_search;
pub mod dp;
pub mod graph;
pub mod monotonic_stack;
pub mod sliding_window;
pub mod sql_join;
pub mod tree;

use crate::errors::NoteError;
use crate::input::{Field, InputSet};
use crate::trace::TraceView;
use std::fmt;

/// Modulus used by counting problems
pub const MOD: i64 = 1_000_000_007;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    SlidingWindow,
    MonotonicStack,
    BinarySearch,
    DynamicProgramming,
    Graphs,
    TreeRecursion,
    SqlJoins,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topic::SlidingWindow => "Sliding Window",
            Topic::MonotonicStack => "Monotonic Stack",
            Topic::BinarySearch => "Binary Search on Answer",
            Topic::DynamicProgramming => "DP Tabulation",
            Topic::Graphs => "Graphs",
            Topic::TreeRecursion => "Tree Recursion",
            Topic::SqlJoins => "SQL Joins",
        };
        write!(f, "{}", name)
    }
}

/// One line of reference code. Lines sharing a tag light up together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeLine {
    pub tag: &'static str,
    pub text: &'static str,
}

/// Build a `&[CodeLine]` from `tag => text` pairs; `_` means untagged
#[macro_export]
macro_rules! code {
    ($($tag:tt => $text:expr),* $(,)?) => {
        &[$($crate::notes::CodeLine { tag: $crate::code!(@tag $tag), text: $text }),*]
    };
    (@tag _) => { "" };
    (@tag $tag:literal) => { $tag };
}

/// A self-contained visualizer page
pub trait Note: Sync {
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn topic(&self) -> Topic;

    fn fields(&self) -> &'static [Field];

    fn code(&self) -> &'static [CodeLine];

    /// Parse `input` and run the instrumented algorithm
    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError>;

    fn default_input(&self) -> InputSet {
        InputSet::defaults(self.fields())
    }
}

static NOTEBOOK: &[&dyn Note] = &[
    &sliding_window::LongestUniqueSubstring,
    &sliding_window::MaxSumWindow,
    &monotonic_stack::NextGreaterElement,
    &monotonic_stack::SumSubarrayMinimums,
    &binary_search::ShipWithinDays,
    &binary_search::SplitArrayLargestSum,
    &binary_search::KokoEatingBananas,
    &dp::CoinChange,
    &dp::Knapsack,
    &dp::LongestCommonSubsequence,
    &graph::Dijkstra,
    &graph::TopologicalSort,
    &tree::MaxDepth,
    &tree::PathSum,
    &sql_join::SqlJoin,
];

/// Every note in display order
pub fn notebook() -> &'static [&'static dyn Note] {
    NOTEBOOK
}

pub fn find(id: &str) -> Option<&'static dyn Note> {
    NOTEBOOK.iter().copied().find(|note| note.id() == id)
}

/// Notes grouped by topic, topics in declaration order
pub fn by_topic() -> Vec<(Topic, Vec<&'static dyn Note>)> {
    let mut groups: Vec<(Topic, Vec<&'static dyn Note>)> = Vec::new();
    for note in NOTEBOOK.iter().copied() {
        match groups.iter_mut().find(|(topic, _)| *topic == note.topic()) {
            Some((_, notes)) => notes.push(note),
            None => groups.push((note.topic(), vec![note])),
        }
    }
    groups.sort_by_key(|(topic, _)| *topic);
    groups
}

/// Render a slice as `[a, b, c]`
pub(crate) fn list<T: fmt::Display>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: FxHashSet<&str> = notebook().iter().map(|n| n.id()).collect();
        assert_eq!(ids.len(), notebook().len());
    }

    #[test]
    fn test_every_default_input_generates() {
        for note in notebook() {
            let trace = note
                .generate(&note.default_input())
                .unwrap_or_else(|e| panic!("{} failed: {}", note.id(), e));
            assert!(trace.len() >= 2, "{} produced a trivial trace", note.id());
        }
    }

    #[test]
    fn test_every_step_highlights_known_code() {
        for note in notebook() {
            let trace = note.generate(&note.default_input()).unwrap();
            for index in 0..trace.len() {
                let step = trace.step(index).unwrap();
                assert!(
                    note.code().iter().any(|line| line.tag == step.code_line),
                    "{}: step {} has unknown code tag '{}'",
                    note.id(),
                    index,
                    step.code_line
                );
            }
        }
    }

    #[test]
    fn test_by_topic_covers_notebook() {
        let total: usize = by_topic().iter().map(|(_, notes)| notes.len()).sum();
        assert_eq!(total, notebook().len());
        assert_eq!(by_topic()[0].0, Topic::SlidingWindow);
    }
}
