//! Binary search on the answer
//!
//! Each note searches the smallest value for which a greedy feasibility check
//! passes. Midpoints use `lo + (hi - lo) / 2`, which floors for the
//! non-negative ranges used here.

use super::{list, CodeLine, Note, Topic};
use crate::errors::{NoteError, TraceError};
use crate::input::{Field, FieldKind, InputSet};
use crate::scene::{opt, pointers, Cell, Mark, Scene, Visualize};
use crate::trace::{record, Phase, Trace, TraceView, DEFAULT_STEP_LIMIT};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Init,
    Probe,
    /// Add an item to the current group
    Load,
    /// Close the current group and open another
    NewGroup,
    /// Count hours for one pile
    Eat,
    Verdict,
    Narrow,
    Done,
}

impl Phase for SearchPhase {
    fn label(&self) -> &'static str {
        match self {
            SearchPhase::Init => "init",
            SearchPhase::Probe => "probe",
            SearchPhase::Load => "load",
            SearchPhase::NewGroup => "new group",
            SearchPhase::Eat => "eat",
            SearchPhase::Verdict => "verdict",
            SearchPhase::Narrow => "narrow",
            SearchPhase::Done => "done",
        }
    }
}

// ========== Minimize the largest group (ship within days / split array) ==========

/// Words used to narrate the shared greedy partition search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Wording {
    item: &'static str,
    group: &'static str,
    bound: &'static str,
}

const SHIP_WORDING: Wording = Wording {
    item: "package",
    group: "day",
    bound: "capacity",
};

const SPLIT_WORDING: Wording = Wording {
    item: "value",
    group: "part",
    bound: "largest sum",
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionState {
    pub values: Vec<i64>,
    /// Maximum number of groups allowed
    pub limit: i64,
    pub lo: i64,
    pub hi: i64,
    pub mid: Option<i64>,
    /// Item currently being placed
    pub cursor: Option<usize>,
    /// Group number of every item placed so far in this probe
    pub groups: Vec<usize>,
    pub need: i64,
    pub load: i64,
    pub feasible: Option<bool>,
}

impl PartitionState {
    fn group_lines(&self) -> Vec<Cell> {
        let mut lines = Vec::new();
        let mut start = 0;
        while start < self.groups.len() {
            let group = self.groups[start];
            let end = self.groups[start..]
                .iter()
                .position(|&g| g != group)
                .map_or(self.groups.len(), |offset| start + offset);
            let members = &self.values[start..end];
            let sum: i64 = members.iter().sum();
            let mark = if end == self.groups.len() { Mark::Active } else { Mark::Plain };
            lines.push(Cell::new(
                format!("#{}: {} = {}", group + 1, list(members), sum),
                mark,
            ));
            start = end;
        }
        lines
    }
}

impl Visualize for PartitionState {
    fn scene(&self) -> Scene {
        let cells = self
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mark = if Some(i) == self.cursor {
                    Mark::Active
                } else if i < self.groups.len() {
                    if self.groups[i] % 2 == 0 { Mark::Window } else { Mark::Done }
                } else {
                    Mark::Plain
                };
                Cell::new(v.to_string(), mark)
            })
            .collect();

        Scene::new()
            .cells("values", cells, pointers([("·", self.cursor)]))
            .vars([
                ("lo", self.lo.to_string()),
                ("hi", self.hi.to_string()),
                ("mid", opt(self.mid)),
                ("groups needed", self.need.to_string()),
                ("limit", self.limit.to_string()),
                ("current load", self.load.to_string()),
                ("fits", opt(self.feasible)),
            ])
            .lines("groups", self.group_lines())
    }
}

fn minimize_largest_group(
    values: &[i64],
    limit: i64,
    wording: Wording,
) -> Result<Trace<PartitionState, SearchPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let limit = limit.clamp(1, values.len().max(1) as i64);
        let mut state = PartitionState {
            values: values.to_vec(),
            limit,
            lo: values.iter().copied().max().unwrap_or(0),
            hi: values.iter().sum(),
            mid: None,
            cursor: None,
            groups: Vec::new(),
            need: 0,
            load: 0,
            feasible: None,
        };

        rec.emit(
            SearchPhase::Init,
            "init",
            state.clone(),
            format!(
                "The {} lies between the largest {} ({}) and the total ({}).",
                wording.bound, wording.item, state.lo, state.hi
            ),
        )?;

        while state.lo < state.hi {
            let mid = state.lo + (state.hi - state.lo) / 2;
            state.mid = Some(mid);
            state.groups.clear();
            state.cursor = None;
            state.need = 1;
            state.load = 0;
            state.feasible = None;
            rec.emit(
                SearchPhase::Probe,
                "probe",
                state.clone(),
                format!(
                    "Try {} = {} + ({} - {}) / 2 = {}.",
                    wording.bound, state.lo, state.hi, state.lo, mid
                ),
            )?;

            for (i, &v) in values.iter().enumerate() {
                state.cursor = Some(i);
                if state.load + v > mid {
                    state.need += 1;
                    let previous = state.load;
                    state.load = 0;
                    rec.emit(
                        SearchPhase::NewGroup,
                        "new_group",
                        state.clone(),
                        format!(
                            "{} + {} > {}: close the {} at {} and start {} {}.",
                            previous, v, mid, wording.group, previous, wording.group, state.need
                        ),
                    )?;
                }
                state.load += v;
                state.groups.push((state.need - 1) as usize);
                rec.emit(
                    SearchPhase::Load,
                    "load",
                    state.clone(),
                    format!(
                        "Put {} {} into {} {}; load is {}.",
                        wording.item, v, wording.group, state.need, state.load
                    ),
                )?;
            }

            state.cursor = None;
            let feasible = state.need <= limit;
            state.feasible = Some(feasible);
            rec.emit(
                SearchPhase::Verdict,
                "verdict",
                state.clone(),
                if feasible {
                    format!("{} {}s <= {}: {} {} works.", state.need, wording.group, limit, wording.bound, mid)
                } else {
                    format!("{} {}s > {}: {} {} is too small.", state.need, wording.group, limit, wording.bound, mid)
                },
            )?;

            let message = if feasible {
                state.hi = mid;
                format!("Keep {} as a candidate: hi = {}.", mid, mid)
            } else {
                state.lo = mid + 1;
                format!("Discard everything up to {}: lo = {}.", mid, mid + 1)
            };
            rec.emit(SearchPhase::Narrow, "narrow", state.clone(), message)?;
        }

        state.mid = None;
        state.feasible = None;
        let message = format!("lo == hi. The smallest {} is {}.", wording.bound, state.lo);
        rec.emit(SearchPhase::Done, "done", state, message)
    })
}

pub fn ship_within_days(
    weights: &[i64],
    days: i64,
) -> Result<Trace<PartitionState, SearchPhase>, TraceError> {
    minimize_largest_group(weights, days, SHIP_WORDING)
}

pub fn split_array_largest_sum(
    nums: &[i64],
    parts: i64,
) -> Result<Trace<PartitionState, SearchPhase>, TraceError> {
    minimize_largest_group(nums, parts, SPLIT_WORDING)
}

const SHIP_FIELDS: &[Field] = &[
    Field {
        key: "weights",
        label: "Weights",
        kind: FieldKind::Numbers {
            min_len: 1,
            max_len: 15,
            min: 1,
            max: 50,
        },
        default: "1, 2, 3, 4, 5, 6, 7, 8, 9, 10",
    },
    Field {
        key: "days",
        label: "Days",
        kind: FieldKind::Number { min: 1, max: 15 },
        default: "5",
    },
];

const SHIP_CODE: &[CodeLine] = crate::code![
    _ => "fn ship_within_days(weights: &[i64], days: i64) -> i64 {",
    "init" => "    let (mut lo, mut hi) = (max(weights), sum(weights));",
    "probe" => "    while lo < hi {",
    "probe" => "        let mid = lo + (hi - lo) / 2;",
    _ => "        let (mut need, mut load) = (1, 0);",
    _ => "        for &w in weights {",
    "new_group" => "            if load + w > mid { need += 1; load = 0; }",
    "load" => "            load += w;",
    _ => "        }",
    "verdict" => "        let fits = need <= days;",
    "narrow" => "        if fits { hi = mid; } else { lo = mid + 1; }",
    _ => "    }",
    "done" => "    lo",
    _ => "}",
];

#[derive(Debug)]
pub struct ShipWithinDays;

impl Note for ShipWithinDays {
    fn id(&self) -> &'static str {
        "ship-within-days"
    }

    fn title(&self) -> &'static str {
        "Capacity to Ship Packages Within D Days"
    }

    fn topic(&self) -> Topic {
        Topic::BinarySearch
    }

    fn fields(&self) -> &'static [Field] {
        SHIP_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        SHIP_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let weights = input.numbers("weights")?;
        let days = input.number("days")?;
        Ok(Box::new(ship_within_days(&weights, days)?))
    }
}

const SPLIT_FIELDS: &[Field] = &[
    Field {
        key: "nums",
        label: "Array",
        kind: FieldKind::Numbers {
            min_len: 1,
            max_len: 15,
            min: 0,
            max: 50,
        },
        default: "7, 2, 5, 10, 8",
    },
    Field {
        key: "k",
        label: "Partitions",
        kind: FieldKind::Number { min: 1, max: 15 },
        default: "2",
    },
];

const SPLIT_CODE: &[CodeLine] = crate::code![
    _ => "fn split_array(nums: &[i64], k: i64) -> i64 {",
    "init" => "    let (mut lo, mut hi) = (max(nums), sum(nums));",
    "probe" => "    while lo < hi {",
    "probe" => "        let mid = lo + (hi - lo) / 2;",
    _ => "        let (mut parts, mut sum) = (1, 0);",
    _ => "        for &x in nums {",
    "new_group" => "            if sum + x > mid { parts += 1; sum = 0; }",
    "load" => "            sum += x;",
    _ => "        }",
    "verdict" => "        let fits = parts <= k;",
    "narrow" => "        if fits { hi = mid; } else { lo = mid + 1; }",
    _ => "    }",
    "done" => "    lo",
    _ => "}",
];

#[derive(Debug)]
pub struct SplitArrayLargestSum;

impl Note for SplitArrayLargestSum {
    fn id(&self) -> &'static str {
        "split-array-largest-sum"
    }

    fn title(&self) -> &'static str {
        "Split Array Largest Sum"
    }

    fn topic(&self) -> Topic {
        Topic::BinarySearch
    }

    fn fields(&self) -> &'static [Field] {
        SPLIT_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        SPLIT_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let nums = input.numbers("nums")?;
        let k = input.number("k")?;
        Ok(Box::new(split_array_largest_sum(&nums, k)?))
    }
}

// ========== Koko eating bananas ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EatingState {
    pub piles: Vec<i64>,
    pub h: i64,
    pub lo: i64,
    pub hi: i64,
    pub mid: Option<i64>,
    pub cursor: Option<usize>,
    /// Hours spent on each pile at the current speed
    pub hours_each: Vec<Option<i64>>,
    pub hours: i64,
    pub feasible: Option<bool>,
}

impl Visualize for EatingState {
    fn scene(&self) -> Scene {
        let piles = self
            .piles
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mark = if Some(i) == self.cursor { Mark::Active } else { Mark::Plain };
                Cell::new(p.to_string(), mark)
            })
            .collect();
        let hours = self
            .hours_each
            .iter()
            .map(|h| match h {
                Some(h) => Cell::new(h.to_string(), Mark::Done),
                None => Cell::plain(" "),
            })
            .collect();

        Scene::new()
            .cells("piles", piles, pointers([("·", self.cursor)]))
            .cells("hours", hours, Vec::new())
            .vars([
                ("lo", self.lo.to_string()),
                ("hi", self.hi.to_string()),
                ("speed (mid)", opt(self.mid)),
                ("hours", self.hours.to_string()),
                ("h", self.h.to_string()),
                ("fits", opt(self.feasible)),
            ])
    }
}

pub fn koko_eating_bananas(piles: &[i64], h: i64) -> Result<Trace<EatingState, SearchPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let h = h.max(piles.len() as i64);
        let mut state = EatingState {
            piles: piles.to_vec(),
            h,
            lo: 1,
            hi: piles.iter().copied().max().unwrap_or(1).max(1),
            mid: None,
            cursor: None,
            hours_each: vec![None; piles.len()],
            hours: 0,
            feasible: None,
        };

        let message = format!(
            "Speed is between 1 and the largest pile ({}) bananas per hour.",
            state.hi
        );
        rec.emit(SearchPhase::Init, "init", state.clone(), message)?;

        while state.lo < state.hi {
            let mid = state.lo + (state.hi - state.lo) / 2;
            state.mid = Some(mid);
            state.hours = 0;
            state.hours_each = vec![None; piles.len()];
            state.feasible = None;
            let message = format!("Try speed {} + ({} - {}) / 2 = {}.", state.lo, state.hi, state.lo, mid);
            rec.emit(SearchPhase::Probe, "probe", state.clone(), message)?;

            for (i, &p) in piles.iter().enumerate() {
                let hours = (p + mid - 1) / mid;
                state.cursor = Some(i);
                state.hours_each[i] = Some(hours);
                state.hours += hours;
                let message = format!(
                    "Pile {} takes ceil({} / {}) = {} hour(s); total {}.",
                    p, p, mid, hours, state.hours
                );
                rec.emit(SearchPhase::Eat, "eat", state.clone(), message)?;
            }

            state.cursor = None;
            let feasible = state.hours <= h;
            state.feasible = Some(feasible);
            let message = if feasible {
                format!("{} <= {} hours: speed {} is fast enough.", state.hours, h, mid)
            } else {
                format!("{} > {} hours: speed {} is too slow.", state.hours, h, mid)
            };
            rec.emit(SearchPhase::Verdict, "verdict", state.clone(), message)?;

            let message = if feasible {
                state.hi = mid;
                format!("hi = {}.", mid)
            } else {
                state.lo = mid + 1;
                format!("lo = {}.", mid + 1)
            };
            rec.emit(SearchPhase::Narrow, "narrow", state.clone(), message)?;
        }

        state.mid = None;
        state.feasible = None;
        let message = format!("Done. Minimum eating speed is {}.", state.lo);
        rec.emit(SearchPhase::Done, "done", state, message)
    })
}

const KOKO_FIELDS: &[Field] = &[
    Field {
        key: "piles",
        label: "Piles",
        kind: FieldKind::Numbers {
            min_len: 1,
            max_len: 12,
            min: 1,
            max: 100,
        },
        default: "3, 6, 7, 11",
    },
    Field {
        key: "h",
        label: "Hours",
        kind: FieldKind::Number { min: 1, max: 100 },
        default: "8",
    },
];

const KOKO_CODE: &[CodeLine] = crate::code![
    _ => "fn min_eating_speed(piles: &[i64], h: i64) -> i64 {",
    "init" => "    let (mut lo, mut hi) = (1, max(piles));",
    "probe" => "    while lo < hi {",
    "probe" => "        let mid = lo + (hi - lo) / 2;",
    "eat" => "        let hours: i64 = piles.iter().map(|p| (p + mid - 1) / mid).sum();",
    "verdict" => "        let fits = hours <= h;",
    "narrow" => "        if fits { hi = mid; } else { lo = mid + 1; }",
    _ => "    }",
    "done" => "    lo",
    _ => "}",
];

#[derive(Debug)]
pub struct KokoEatingBananas;

impl Note for KokoEatingBananas {
    fn id(&self) -> &'static str {
        "koko-eating-bananas"
    }

    fn title(&self) -> &'static str {
        "Koko Eating Bananas"
    }

    fn topic(&self) -> Topic {
        Topic::BinarySearch
    }

    fn fields(&self) -> &'static [Field] {
        KOKO_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        KOKO_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let piles = input.numbers("piles")?;
        let h = input.number("h")?;
        Ok(Box::new(koko_eating_bananas(&piles, h)?))
    }
}
