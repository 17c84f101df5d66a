//! Sliding window notes

use super::{list, CodeLine, Note, Topic};
use crate::errors::{NoteError, TraceError};
use crate::input::{Field, FieldKind, InputSet};
use crate::scene::{pointers, Cell, Mark, Scene, Visualize};
use crate::trace::{record, Phase, Trace, TraceView, DEFAULT_STEP_LIMIT};
use rustc_hash::FxHashMap;
use serde::Serialize;

// ========== Longest substring without repeating characters ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UniquePhase {
    Init,
    Expand,
    Jump,
    Record,
    Done,
}

impl Phase for UniquePhase {
    fn label(&self) -> &'static str {
        match self {
            UniquePhase::Init => "init",
            UniquePhase::Expand => "expand",
            UniquePhase::Jump => "jump",
            UniquePhase::Record => "record",
            UniquePhase::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueState {
    pub chars: Vec<char>,
    pub left: usize,
    pub right: Option<usize>,
    /// Last index of every character seen so far, ordered by character
    pub last_seen: Vec<(char, usize)>,
    pub best_len: usize,
    pub best_start: usize,
}

impl UniqueState {
    pub fn best(&self) -> String {
        self.chars
            .iter()
            .skip(self.best_start)
            .take(self.best_len)
            .collect()
    }
}

impl Visualize for UniqueState {
    fn scene(&self) -> Scene {
        let cells = self
            .chars
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let mark = match self.right {
                    Some(r) if i == r => Mark::Active,
                    Some(r) if i >= self.left && i < r => Mark::Window,
                    _ => Mark::Plain,
                };
                Cell::new(c.to_string(), mark)
            })
            .collect();

        let seen = self
            .last_seen
            .iter()
            .map(|(c, i)| {
                let mark = if *i < self.left { Mark::Dim } else { Mark::Plain };
                Cell::new(format!("'{}' → {}", c, i), mark)
            })
            .collect();

        Scene::new()
            .cells(
                "s",
                cells,
                pointers([("L", Some(self.left)), ("R", self.right)]),
            )
            .vars([
                ("best", self.best_len.to_string()),
                ("substring", format!("\"{}\"", self.best())),
            ])
            .lines("last_seen", seen)
    }
}

pub fn longest_unique_substring(s: &str) -> Result<Trace<UniqueState, UniquePhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let mut state = UniqueState {
            chars: s.chars().collect(),
            left: 0,
            right: None,
            last_seen: Vec::new(),
            best_len: 0,
            best_start: 0,
        };
        let mut last_seen: FxHashMap<char, usize> = FxHashMap::default();

        rec.emit(
            UniquePhase::Init,
            "init",
            state.clone(),
            "Start with an empty window and no characters seen.",
        )?;

        for right in 0..state.chars.len() {
            let c = state.chars[right];
            state.right = Some(right);
            rec.emit(
                UniquePhase::Expand,
                "expand",
                state.clone(),
                format!("Extend the window to include '{}' at index {}.", c, right),
            )?;

            if let Some(&prev) = last_seen.get(&c) {
                if prev >= state.left {
                    state.left = prev + 1;
                    rec.emit(
                        UniquePhase::Jump,
                        "jump",
                        state.clone(),
                        format!(
                            "'{}' already appears at index {} inside the window; move left to {}.",
                            c, prev, state.left
                        ),
                    )?;
                }
            }

            last_seen.insert(c, right);
            let mut seen: Vec<(char, usize)> = last_seen.iter().map(|(c, i)| (*c, *i)).collect();
            seen.sort_unstable();
            state.last_seen = seen;

            let len = right - state.left + 1;
            let message = if len > state.best_len {
                state.best_len = len;
                state.best_start = state.left;
                format!("Window length {} is a new best: \"{}\".", len, state.best())
            } else {
                format!("Window length {} does not beat {}.", len, state.best_len)
            };
            rec.emit(UniquePhase::Record, "record", state.clone(), message)?;
        }

        state.right = None;
        let message = format!(
            "Done. Longest substring without repeats has length {} (\"{}\").",
            state.best_len,
            state.best()
        );
        rec.emit(UniquePhase::Done, "done", state, message)
    })
}

const UNIQUE_FIELDS: &[Field] = &[Field {
    key: "s",
    label: "String",
    kind: FieldKind::Text { max_len: 20 },
    default: "abcabcbb",
}];

const UNIQUE_CODE: &[CodeLine] = crate::code![
    _ => "fn length_of_longest_substring(s: &str) -> usize {",
    "init" => "    let mut last_seen = HashMap::new();",
    "init" => "    let (mut left, mut best) = (0, 0);",
    "expand" => "    for (right, c) in s.chars().enumerate() {",
    _ => "        if let Some(&prev) = last_seen.get(&c) {",
    "jump" => "            if prev >= left { left = prev + 1; }",
    _ => "        }",
    "record" => "        last_seen.insert(c, right);",
    "record" => "        best = best.max(right - left + 1);",
    _ => "    }",
    "done" => "    best",
    _ => "}",
];

#[derive(Debug)]
pub struct LongestUniqueSubstring;

impl Note for LongestUniqueSubstring {
    fn id(&self) -> &'static str {
        "longest-unique-substring"
    }

    fn title(&self) -> &'static str {
        "Longest Substring Without Repeats"
    }

    fn topic(&self) -> Topic {
        Topic::SlidingWindow
    }

    fn fields(&self) -> &'static [Field] {
        UNIQUE_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        UNIQUE_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let s = input.text("s")?;
        Ok(Box::new(longest_unique_substring(&s)?))
    }
}

// ========== Maximum sum window of size k ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPhase {
    Init,
    Grow,
    Slide,
    Record,
    Done,
}

impl Phase for WindowPhase {
    fn label(&self) -> &'static str {
        match self {
            WindowPhase::Init => "init",
            WindowPhase::Grow => "grow",
            WindowPhase::Slide => "slide",
            WindowPhase::Record => "record",
            WindowPhase::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowState {
    pub nums: Vec<i64>,
    pub k: usize,
    /// Inclusive bounds of the current window
    pub window: Option<(usize, usize)>,
    pub sum: i64,
    pub best: Option<i64>,
    pub best_start: Option<usize>,
}

impl Visualize for WindowState {
    fn scene(&self) -> Scene {
        let cells = self
            .nums
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mark = match self.window {
                    Some((_, end)) if i == end => Mark::Active,
                    Some((start, end)) if i >= start && i < end => Mark::Window,
                    _ => Mark::Plain,
                };
                Cell::new(v.to_string(), mark)
            })
            .collect();

        let (start, end) = match self.window {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        };

        Scene::new()
            .cells("nums", cells, pointers([("start", start), ("end", end)]))
            .vars([
                ("k", self.k.to_string()),
                ("sum", self.sum.to_string()),
                ("best", crate::scene::opt(self.best)),
                ("best window", crate::scene::opt(self.best_start.map(|s| {
                    list(&self.nums[s..s + self.k])
                }))),
            ])
    }
}

pub fn max_sum_window(nums: &[i64], k: usize) -> Result<Trace<WindowState, WindowPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let k = k.clamp(1, nums.len().max(1));
        let mut state = WindowState {
            nums: nums.to_vec(),
            k,
            window: None,
            sum: 0,
            best: None,
            best_start: None,
        };

        rec.emit(
            WindowPhase::Init,
            "init",
            state.clone(),
            format!("Find the largest sum of {} consecutive values.", k),
        )?;

        if nums.is_empty() {
            return rec.emit(WindowPhase::Done, "done", state, "No values, so there is no window.");
        }

        for i in 0..k {
            state.sum += nums[i];
            state.window = Some((0, i));
            rec.emit(
                WindowPhase::Grow,
                "grow",
                state.clone(),
                format!("Add nums[{}] = {}; sum is {}.", i, nums[i], state.sum),
            )?;
        }

        state.best = Some(state.sum);
        state.best_start = Some(0);
        rec.emit(
            WindowPhase::Record,
            "best",
            state.clone(),
            format!("The first full window sums to {}.", state.sum),
        )?;

        for i in k..nums.len() {
            let start = i + 1 - k;
            state.sum += nums[i] - nums[i - k];
            state.window = Some((start, i));
            rec.emit(
                WindowPhase::Slide,
                "slide",
                state.clone(),
                format!(
                    "Slide right: add {} and drop {}; sum is {}.",
                    nums[i],
                    nums[i - k],
                    state.sum
                ),
            )?;

            let best = state.best.unwrap_or(i64::MIN);
            let message = if state.sum > best {
                state.best = Some(state.sum);
                state.best_start = Some(start);
                format!("{} beats {}; new best.", state.sum, best)
            } else {
                format!("{} does not beat {}.", state.sum, best)
            };
            rec.emit(WindowPhase::Record, "record", state.clone(), message)?;
        }

        state.window = None;
        let message = format!("Done. Maximum window sum is {}.", crate::scene::opt(state.best));
        rec.emit(WindowPhase::Done, "done", state, message)
    })
}

const WINDOW_FIELDS: &[Field] = &[
    Field {
        key: "nums",
        label: "Array",
        kind: FieldKind::Numbers {
            min_len: 0,
            max_len: 20,
            min: -100,
            max: 100,
        },
        default: "2, 1, 5, 1, 3, 2",
    },
    Field {
        key: "k",
        label: "Window size",
        kind: FieldKind::Number { min: 1, max: 20 },
        default: "3",
    },
];

const WINDOW_CODE: &[CodeLine] = crate::code![
    _ => "fn max_sum_window(nums: &[i64], k: usize) -> i64 {",
    "init" => "    let mut sum = 0;",
    "grow" => "    for i in 0..k { sum += nums[i]; }",
    "best" => "    let mut best = sum;",
    "slide" => "    for i in k..nums.len() {",
    "slide" => "        sum += nums[i] - nums[i - k];",
    "record" => "        best = best.max(sum);",
    _ => "    }",
    "done" => "    best",
    _ => "}",
];

#[derive(Debug)]
pub struct MaxSumWindow;

impl Note for MaxSumWindow {
    fn id(&self) -> &'static str {
        "max-sum-window"
    }

    fn title(&self) -> &'static str {
        "Maximum Sum Window of Size K"
    }

    fn topic(&self) -> Topic {
        Topic::SlidingWindow
    }

    fn fields(&self) -> &'static [Field] {
        WINDOW_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        WINDOW_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let nums = input.numbers("nums")?;
        let k = input.number("k")? as usize;
        Ok(Box::new(max_sum_window(&nums, k)?))
    }
}
