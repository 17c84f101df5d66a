//! Monotonic stack notes

use super::{list, CodeLine, Note, Topic, MOD};
use crate::errors::{NoteError, TraceError};
use crate::input::{Field, FieldKind, InputSet};
use crate::scene::{pointers, Cell, Mark, Scene, Visualize};
use crate::trace::{record, Phase, Trace, TraceView, DEFAULT_STEP_LIMIT};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StackPhase {
    Init,
    Compare,
    Pop,
    Assign,
    Push,
    Done,
}

impl Phase for StackPhase {
    fn label(&self) -> &'static str {
        match self {
            StackPhase::Init => "init",
            StackPhase::Compare => "compare",
            StackPhase::Pop => "pop",
            StackPhase::Assign => "assign",
            StackPhase::Push => "push",
            StackPhase::Done => "done",
        }
    }
}

// ========== Next greater element ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextGreaterState {
    pub nums: Vec<i64>,
    pub i: Option<usize>,
    /// Values, bottom first
    pub stack: Vec<i64>,
    /// `None` until position is resolved
    pub result: Vec<Option<i64>>,
}

impl NextGreaterState {
    /// The answer, once every slot has been filled
    pub fn resolved(&self) -> Option<Vec<i64>> {
        self.result.iter().copied().collect()
    }
}

impl Visualize for NextGreaterState {
    fn scene(&self) -> Scene {
        let nums = self
            .nums
            .iter()
            .enumerate()
            .map(|(idx, v)| {
                let mark = match self.i {
                    Some(i) if idx == i => Mark::Active,
                    Some(i) if idx > i => Mark::Done,
                    _ => Mark::Plain,
                };
                Cell::new(v.to_string(), mark)
            })
            .collect();

        let top = self.stack.len().checked_sub(1);
        let stack = self
            .stack
            .iter()
            .enumerate()
            .map(|(idx, v)| {
                let mark = if Some(idx) == top { Mark::Compare } else { Mark::Plain };
                Cell::new(v.to_string(), mark)
            })
            .collect();

        let result = self
            .result
            .iter()
            .enumerate()
            .map(|(idx, v)| match v {
                Some(v) => Cell::new(
                    v.to_string(),
                    if Some(idx) == self.i { Mark::Active } else { Mark::Done },
                ),
                None => Cell::plain(" "),
            })
            .collect();

        Scene::new()
            .cells("nums", nums, pointers([("i", self.i)]))
            .stack("stack", stack)
            .cells("result", result, Vec::new())
    }
}

pub fn next_greater(nums: &[i64]) -> Result<Trace<NextGreaterState, StackPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let mut state = NextGreaterState {
            nums: nums.to_vec(),
            i: None,
            stack: Vec::new(),
            result: vec![None; nums.len()],
        };

        rec.emit(
            StackPhase::Init,
            "init",
            state.clone(),
            "Scan from the right, keeping a stack of candidates that decreases toward the top.",
        )?;

        for i in (0..nums.len()).rev() {
            state.i = Some(i);
            while let Some(&top) = state.stack.last() {
                if top > nums[i] {
                    rec.emit(
                        StackPhase::Compare,
                        "compare",
                        state.clone(),
                        format!("Top {} > {}, so it is the next greater element.", top, nums[i]),
                    )?;
                    break;
                }
                rec.emit(
                    StackPhase::Compare,
                    "compare",
                    state.clone(),
                    format!("Top {} <= {}; it can never be an answer again.", top, nums[i]),
                )?;
                state.stack.pop();
                rec.emit(
                    StackPhase::Pop,
                    "pop",
                    state.clone(),
                    format!("Pop {}.", top),
                )?;
            }

            let message = match state.stack.last().copied() {
                Some(top) => {
                    state.result[i] = Some(top);
                    format!("result[{}] = {}.", i, top)
                }
                None => {
                    state.result[i] = Some(-1);
                    format!("Stack is empty: nothing greater right of index {}, result[{}] = -1.", i, i)
                }
            };
            rec.emit(StackPhase::Assign, "assign", state.clone(), message)?;

            state.stack.push(nums[i]);
            rec.emit(
                StackPhase::Push,
                "push",
                state.clone(),
                format!("Push {} as a candidate for elements further left.", nums[i]),
            )?;
        }

        state.i = None;
        let message = format!(
            "Done. Next greater elements: {}.",
            list(&state.resolved().unwrap_or_default())
        );
        rec.emit(StackPhase::Done, "done", state, message)
    })
}

const NEXT_GREATER_FIELDS: &[Field] = &[Field {
    key: "nums",
    label: "Array",
    kind: FieldKind::Numbers {
        min_len: 0,
        max_len: 20,
        min: -100,
        max: 100,
    },
    default: "2, 1, 2, 4, 3",
}];

const NEXT_GREATER_CODE: &[CodeLine] = crate::code![
    _ => "fn next_greater(nums: &[i64]) -> Vec<i64> {",
    "init" => "    let mut result = vec![-1; nums.len()];",
    "init" => "    let mut stack: Vec<i64> = Vec::new();",
    _ => "    for i in (0..nums.len()).rev() {",
    "compare" => "        while let Some(&top) = stack.last() {",
    "compare" => "            if top > nums[i] { break; }",
    "pop" => "            stack.pop();",
    _ => "        }",
    "assign" => "        result[i] = stack.last().copied().unwrap_or(-1);",
    "push" => "        stack.push(nums[i]);",
    _ => "    }",
    "done" => "    result",
    _ => "}",
];

#[derive(Debug)]
pub struct NextGreaterElement;

impl Note for NextGreaterElement {
    fn id(&self) -> &'static str {
        "next-greater-element"
    }

    fn title(&self) -> &'static str {
        "Next Greater Element"
    }

    fn topic(&self) -> Topic {
        Topic::MonotonicStack
    }

    fn fields(&self) -> &'static [Field] {
        NEXT_GREATER_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        NEXT_GREATER_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let nums = input.numbers("nums")?;
        Ok(Box::new(next_greater(&nums)?))
    }
}

// ========== Sum of subarray minimums ==========

/// One popped element's share of the total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub mid: usize,
    /// Index of the previous smaller element, -1 if none
    pub left: i64,
    /// Index of the next smaller-or-equal element (or the sentinel)
    pub right: usize,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubarrayMinState {
    pub arr: Vec<i64>,
    pub i: Option<usize>,
    /// Indices, bottom first; values strictly increase toward the top
    pub stack: Vec<usize>,
    pub total: i64,
    pub last: Option<Contribution>,
}

impl Visualize for SubarrayMinState {
    fn scene(&self) -> Scene {
        let span = self.last.map(|c| ((c.left + 1) as usize, c.right));
        let cells = self
            .arr
            .iter()
            .enumerate()
            .map(|(idx, v)| {
                let mark = match (self.last, span) {
                    (Some(c), _) if idx == c.mid => Mark::Active,
                    (_, Some((lo, hi))) if idx >= lo && idx < hi => Mark::Window,
                    _ if Some(idx) == self.i => Mark::Compare,
                    _ => Mark::Plain,
                };
                Cell::new(v.to_string(), mark)
            })
            .collect();

        let stack = self
            .stack
            .iter()
            .map(|&idx| Cell::plain(format!("{}:{}", idx, self.arr[idx])))
            .collect();

        let contribution = match self.last {
            Some(c) => format!(
                "{} × ({} - {}) × ({} - {}) = {}",
                self.arr[c.mid], c.mid, c.left, c.right, c.mid, c.amount
            ),
            None => "-".to_string(),
        };

        let current = match self.i {
            Some(i) if i < self.arr.len() => self.arr[i].to_string(),
            Some(_) => "sentinel".to_string(),
            None => "-".to_string(),
        };

        Scene::new()
            .cells("arr", cells, pointers([("i", self.i)]))
            .stack("stack (index:value)", stack)
            .vars([
                ("cur", current),
                ("contribution", contribution),
                ("total", self.total.to_string()),
            ])
    }
}

pub fn sum_subarray_minimums(arr: &[i64]) -> Result<Trace<SubarrayMinState, StackPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let n = arr.len();
        let mut state = SubarrayMinState {
            arr: arr.to_vec(),
            i: None,
            stack: Vec::new(),
            total: 0,
            last: None,
        };

        rec.emit(
            StackPhase::Init,
            "init",
            state.clone(),
            "Each element is the minimum of (mid - left) × (right - mid) subarrays. \
             A stack of increasing values finds both bounds in one pass.",
        )?;

        for i in 0..=n {
            let cur = if i < n { arr[i] } else { i64::MIN };
            state.i = Some(i);
            state.last = None;

            while let Some(&top) = state.stack.last() {
                let shown = if i < n { cur.to_string() } else { "the sentinel".to_string() };
                if arr[top] < cur {
                    rec.emit(
                        StackPhase::Compare,
                        "compare",
                        state.clone(),
                        format!("arr[{}] = {} < {}; keep it.", top, arr[top], shown),
                    )?;
                    break;
                }
                rec.emit(
                    StackPhase::Compare,
                    "compare",
                    state.clone(),
                    format!(
                        "arr[{}] = {} >= {}; its right bound is {}.",
                        top, arr[top], shown, i
                    ),
                )?;

                state.stack.pop();
                let left = state.stack.last().map_or(-1, |&l| l as i64);
                let amount = arr[top] * (top as i64 - left) * (i as i64 - top as i64) % MOD;
                state.total = (state.total + amount) % MOD;
                state.last = Some(Contribution {
                    mid: top,
                    left,
                    right: i,
                    amount,
                });
                rec.emit(
                    StackPhase::Pop,
                    "pop",
                    state.clone(),
                    format!(
                        "Pop index {}: it is the minimum of {} subarrays, adding {}. Total {}.",
                        top,
                        (top as i64 - left) * (i as i64 - top as i64),
                        amount,
                        state.total
                    ),
                )?;
            }

            if i < n {
                state.last = None;
                state.stack.push(i);
                rec.emit(
                    StackPhase::Push,
                    "push",
                    state.clone(),
                    format!("Push index {} (value {}).", i, cur),
                )?;
            }
        }

        state.i = None;
        state.last = None;
        let message = format!("Done. Sum of subarray minimums = {} (mod 1e9+7).", state.total);
        rec.emit(StackPhase::Done, "done", state, message)
    })
}

const SUBARRAY_MIN_FIELDS: &[Field] = &[Field {
    key: "arr",
    label: "Array",
    kind: FieldKind::Numbers {
        min_len: 0,
        max_len: 12,
        min: 1,
        max: 100,
    },
    default: "3, 1, 2, 4",
}];

const SUBARRAY_MIN_CODE: &[CodeLine] = crate::code![
    _ => "fn sum_subarray_mins(arr: &[i64]) -> i64 {",
    "init" => "    let (mut stack, mut total) = (Vec::new(), 0);",
    _ => "    for i in 0..=arr.len() {",
    _ => "        let cur = if i < arr.len() { arr[i] } else { i64::MIN };",
    "compare" => "        while let Some(&top) = stack.last() {",
    "compare" => "            if arr[top] < cur { break; }",
    "pop" => "            stack.pop();",
    "pop" => "            let left = stack.last().map_or(-1, |&l| l as i64);",
    "pop" => "            total += arr[top] * (top - left) * (i - top) % MOD;",
    _ => "        }",
    "push" => "        if i < arr.len() { stack.push(i); }",
    _ => "    }",
    "done" => "    total % MOD",
    _ => "}",
];

#[derive(Debug)]
pub struct SumSubarrayMinimums;

impl Note for SumSubarrayMinimums {
    fn id(&self) -> &'static str {
        "sum-subarray-minimums"
    }

    fn title(&self) -> &'static str {
        "Sum of Subarray Minimums"
    }

    fn topic(&self) -> Topic {
        Topic::MonotonicStack
    }

    fn fields(&self) -> &'static [Field] {
        SUBARRAY_MIN_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        SUBARRAY_MIN_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let arr = input.numbers("arr")?;
        Ok(Box::new(sum_subarray_minimums(&arr)?))
    }
}
