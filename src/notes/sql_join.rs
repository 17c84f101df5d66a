//! SQL join semantics, evaluated as a nested-loop join

use super::{CodeLine, Note, Topic};
use crate::errors::{NoteError, TraceError};
use crate::input::{Field, FieldKind, InputSet};
use crate::scene::{Cell, Mark, Scene, Visualize};
use crate::trace::{record, Phase, Trace, TraceView, DEFAULT_STEP_LIMIT};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub const NAMES: &'static [&'static str] = &["inner", "left", "right", "full"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "inner" => Some(JoinKind::Inner),
            "left" => Some(JoinKind::Left),
            "right" => Some(JoinKind::Right),
            "full" => Some(JoinKind::Full),
            _ => None,
        }
    }

    fn keeps_left(self) -> bool {
        matches!(self, JoinKind::Left | JoinKind::Full)
    }

    fn keeps_right(self) -> bool {
        matches!(self, JoinKind::Right | JoinKind::Full)
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sql = match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
        };
        write!(f, "{}", sql)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: String,
    pub value: String,
}

impl Row {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Row {
            id: id.into(),
            value: value.into(),
        }
    }

    /// NULL keys never compare equal, not even to each other
    fn joins_with(&self, other: &Row) -> bool {
        !self.id.eq_ignore_ascii_case("null") && self.id == other.id
    }
}

/// Turn `[id, value]` tuples into rows
pub fn rows(tuples: Vec<Vec<String>>) -> Vec<Row> {
    tuples
        .into_iter()
        .filter_map(|t| {
            let mut it = t.into_iter();
            Some(Row {
                id: it.next()?,
                value: it.next()?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPhase {
    Init,
    Compare,
    Match,
    PadLeft,
    PadRight,
    Done,
}

impl Phase for JoinPhase {
    fn label(&self) -> &'static str {
        match self {
            JoinPhase::Init => "init",
            JoinPhase::Compare => "compare",
            JoinPhase::Match => "match",
            JoinPhase::PadLeft => "pad left",
            JoinPhase::PadRight => "pad right",
            JoinPhase::Done => "done",
        }
    }
}

/// Output row as indices into the inputs; `None` is a NULL-padded side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinedRow {
    pub left: Option<usize>,
    pub right: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinState {
    pub kind: JoinKind,
    pub left: Vec<Row>,
    pub right: Vec<Row>,
    pub i: Option<usize>,
    pub j: Option<usize>,
    pub right_matched: Vec<bool>,
    pub output: Vec<JoinedRow>,
}

impl JoinState {
    /// Output rows as `(l.id, l.value, r.id, r.value)` with `NULL` padding
    pub fn output_rows(&self) -> Vec<[String; 4]> {
        let null = || "NULL".to_string();
        self.output
            .iter()
            .map(|row| {
                let l = row.left.map(|i| &self.left[i]);
                let r = row.right.map(|j| &self.right[j]);
                [
                    l.map_or_else(null, |l| l.id.clone()),
                    l.map_or_else(null, |l| l.value.clone()),
                    r.map_or_else(null, |r| r.id.clone()),
                    r.map_or_else(null, |r| r.value.clone()),
                ]
            })
            .collect()
    }
}

impl Visualize for JoinState {
    fn scene(&self) -> Scene {
        let columns = vec!["id".to_string(), "value".to_string()];
        let left = self
            .left
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mark = if Some(i) == self.i { Mark::Active } else { Mark::Plain };
                (
                    format!("L{}", i + 1),
                    vec![Cell::new(row.id.clone(), mark), Cell::new(row.value.clone(), mark)],
                )
            })
            .collect();
        let right = self
            .right
            .iter()
            .enumerate()
            .map(|(j, row)| {
                let mark = if Some(j) == self.j {
                    Mark::Compare
                } else if self.right_matched[j] {
                    Mark::Done
                } else {
                    Mark::Plain
                };
                (
                    format!("R{}", j + 1),
                    vec![Cell::new(row.id.clone(), mark), Cell::new(row.value.clone(), mark)],
                )
            })
            .collect();

        let last = self.output.len().checked_sub(1);
        let output = self
            .output_rows()
            .into_iter()
            .enumerate()
            .map(|(n, values)| {
                let mark = if Some(n) == last { Mark::Active } else { Mark::Done };
                (
                    (n + 1).to_string(),
                    values
                        .into_iter()
                        .map(|v| {
                            let mark = if v == "NULL" { Mark::Dim } else { mark };
                            Cell::new(v, mark)
                        })
                        .collect(),
                )
            })
            .collect();

        Scene::new()
            .vars([("query", format!("SELECT * FROM l {} r ON l.id = r.id", self.kind))])
            .grid("l", columns.clone(), left)
            .grid("r", columns, right)
            .grid(
                "result",
                vec![
                    "l.id".to_string(),
                    "l.value".to_string(),
                    "r.id".to_string(),
                    "r.value".to_string(),
                ],
                output,
            )
    }
}

pub fn nested_loop_join(
    left: &[Row],
    right: &[Row],
    kind: JoinKind,
) -> Result<Trace<JoinState, JoinPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let mut state = JoinState {
            kind,
            left: left.to_vec(),
            right: right.to_vec(),
            i: None,
            j: None,
            right_matched: vec![false; right.len()],
            output: Vec::new(),
        };

        rec.emit(
            JoinPhase::Init,
            "init",
            state.clone(),
            format!("{}: compare every left row with every right row on id.", kind),
        )?;

        for (i, l) in left.iter().enumerate() {
            state.i = Some(i);
            let mut matched = false;

            for (j, r) in right.iter().enumerate() {
                state.j = Some(j);
                if l.joins_with(r) {
                    matched = true;
                    state.right_matched[j] = true;
                    state.output.push(JoinedRow {
                        left: Some(i),
                        right: Some(j),
                    });
                    rec.emit(
                        JoinPhase::Match,
                        "match",
                        state.clone(),
                        format!("l.id {} = r.id {}: emit ({}, {}).", l.id, r.id, l.value, r.value),
                    )?;
                } else {
                    rec.emit(
                        JoinPhase::Compare,
                        "compare",
                        state.clone(),
                        format!("l.id {} ≠ r.id {}: no row.", l.id, r.id),
                    )?;
                }
            }

            state.j = None;
            if !matched && kind.keeps_left() {
                state.output.push(JoinedRow {
                    left: Some(i),
                    right: None,
                });
                rec.emit(
                    JoinPhase::PadLeft,
                    "pad_left",
                    state.clone(),
                    format!("{} matched nothing; keep it with NULLs on the right.", l.value),
                )?;
            }
        }

        state.i = None;
        if kind.keeps_right() {
            for (j, r) in right.iter().enumerate() {
                if state.right_matched[j] {
                    continue;
                }
                state.j = Some(j);
                state.output.push(JoinedRow {
                    left: None,
                    right: Some(j),
                });
                rec.emit(
                    JoinPhase::PadRight,
                    "pad_right",
                    state.clone(),
                    format!("{} was never matched; keep it with NULLs on the left.", r.value),
                )?;
            }
        }

        state.j = None;
        let message = format!("Done. {} produced {} row(s).", kind, state.output.len());
        rec.emit(JoinPhase::Done, "done", state, message)
    })
}

const JOIN_FIELDS: &[Field] = &[
    Field {
        key: "left",
        label: "Left rows [id,value]",
        kind: FieldKind::Tuples { arity: 2, max_len: 6 },
        default: "[1,Ann], [2,Bob], [3,Cid]",
    },
    Field {
        key: "right",
        label: "Right rows [id,value]",
        kind: FieldKind::Tuples { arity: 2, max_len: 6 },
        default: "[1,Sales], [3,Ops], [3,HR], [4,Legal]",
    },
    Field {
        key: "kind",
        label: "Join",
        kind: FieldKind::Choice(JoinKind::NAMES),
        default: "left",
    },
];

const JOIN_CODE: &[CodeLine] = crate::code![
    "init" => "let mut out = Vec::new();",
    _ => "for l in &left {",
    _ => "    let mut matched = false;",
    "compare" => "    for r in &right {",
    "compare" => "        if l.id != r.id { continue; }",
    "match" => "        out.push((Some(l), Some(r)));",
    "match" => "        matched = true;",
    _ => "    }",
    "pad_left" => "    if !matched && keeps_left { out.push((Some(l), None)); }",
    _ => "}",
    "pad_right" => "if keeps_right { for r in unmatched(&right) { out.push((None, Some(r))); } }",
    "done" => "out",
];

#[derive(Debug)]
pub struct SqlJoin;

impl Note for SqlJoin {
    fn id(&self) -> &'static str {
        "sql-join"
    }

    fn title(&self) -> &'static str {
        "SQL Joins (Nested Loop)"
    }

    fn topic(&self) -> Topic {
        Topic::SqlJoins
    }

    fn fields(&self) -> &'static [Field] {
        JOIN_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        JOIN_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let left = rows(input.tuples("left")?);
        let right = rows(input.tuples("right")?);
        let kind = JoinKind::from_name(input.choice("kind")?).unwrap_or(JoinKind::Inner);
        Ok(Box::new(nested_loop_join(&left, &right, kind)?))
    }
}
