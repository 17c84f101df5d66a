//! Tabulated dynamic programming notes

use super::{list, CodeLine, Note, Topic};
use crate::errors::{NoteError, TraceError};
use crate::input::{Field, FieldKind, InputSet};
use crate::scene::{opt, pointers, Cell, Mark, Scene, Visualize};
use crate::trace::{record, Phase, Trace, TraceView, DEFAULT_STEP_LIMIT};
use serde::Serialize;

fn table_cell(value: Option<i64>, mark: Mark) -> Cell {
    match value {
        Some(v) => Cell::new(v.to_string(), mark),
        None => Cell::new("·", mark),
    }
}

// ========== Coin change (minimum coins) ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinPhase {
    Init,
    Consider,
    Update,
    Keep,
    Done,
}

impl Phase for CoinPhase {
    fn label(&self) -> &'static str {
        match self {
            CoinPhase::Init => "init",
            CoinPhase::Consider => "consider",
            CoinPhase::Update => "update",
            CoinPhase::Keep => "keep",
            CoinPhase::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinState {
    pub coins: Vec<i64>,
    pub amount: usize,
    /// Fewest coins per amount; `None` is unreachable (infinity)
    pub dp: Vec<Option<i64>>,
    pub a: Option<usize>,
    pub coin: Option<usize>,
    /// Sub-amount `a - coin` being looked up
    pub from: Option<usize>,
    pub answer: Option<i64>,
}

impl Visualize for CoinState {
    fn scene(&self) -> Scene {
        let cells = self
            .dp
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mark = if Some(i) == self.a {
                    Mark::Active
                } else if Some(i) == self.from {
                    Mark::Compare
                } else if self.a.is_some_and(|a| i < a) {
                    Mark::Done
                } else {
                    Mark::Plain
                };
                match v {
                    Some(v) => Cell::new(v.to_string(), mark),
                    None => Cell::new("∞", mark),
                }
            })
            .collect();

        let coins = self
            .coins
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let mark = if Some(i) == self.coin { Mark::Active } else { Mark::Plain };
                Cell::new(c.to_string(), mark)
            })
            .collect();

        Scene::new()
            .cells("coins", coins, Vec::new())
            .cells("dp[amount]", cells, pointers([("a", self.a), ("a-c", self.from)]))
            .vars([("amount", self.amount.to_string()), ("answer", opt(self.answer))])
    }
}

pub fn coin_change(coins: &[i64], amount: usize) -> Result<Trace<CoinState, CoinPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let mut dp = vec![None; amount + 1];
        dp[0] = Some(0);
        let mut state = CoinState {
            coins: coins.to_vec(),
            amount,
            dp,
            a: None,
            coin: None,
            from: None,
            answer: None,
        };

        rec.emit(
            CoinPhase::Init,
            "init",
            state.clone(),
            "dp[0] = 0 coins; every other amount starts unreachable (∞).",
        )?;

        for a in 1..=amount {
            state.a = Some(a);
            for (ci, &c) in coins.iter().enumerate() {
                state.coin = Some(ci);
                let c = c as usize;
                if c > a {
                    state.from = None;
                    rec.emit(
                        CoinPhase::Keep,
                        "consider",
                        state.clone(),
                        format!("Coin {} is larger than amount {}; skip it.", c, a),
                    )?;
                    continue;
                }

                let from = a - c;
                state.from = Some(from);
                let candidate = state.dp[from].map(|v| v + 1);
                let improves = match (candidate, state.dp[a]) {
                    (Some(cand), Some(cur)) => cand < cur,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                rec.emit(
                    CoinPhase::Consider,
                    "consider",
                    state.clone(),
                    format!(
                        "Coin {}: dp[{}] + 1 = {} vs dp[{}] = {}.",
                        c,
                        from,
                        candidate.map_or("∞".to_string(), |v| v.to_string()),
                        a,
                        state.dp[a].map_or("∞".to_string(), |v| v.to_string())
                    ),
                )?;

                if improves {
                    state.dp[a] = candidate;
                    rec.emit(
                        CoinPhase::Update,
                        "update",
                        state.clone(),
                        format!("Improve: dp[{}] = {}.", a, opt(candidate)),
                    )?;
                }
            }
        }

        state.a = None;
        state.coin = None;
        state.from = None;
        let answer = state.dp[amount].unwrap_or(-1);
        state.answer = Some(answer);
        let message = if answer == -1 {
            format!("Amount {} cannot be made from {}: -1.", amount, list(coins))
        } else {
            format!("Done. Amount {} needs {} coin(s).", amount, answer)
        };
        rec.emit(CoinPhase::Done, "done", state, message)
    })
}

const COIN_FIELDS: &[Field] = &[
    Field {
        key: "coins",
        label: "Coins",
        kind: FieldKind::Numbers {
            min_len: 1,
            max_len: 6,
            min: 1,
            max: 50,
        },
        default: "1, 2, 5",
    },
    Field {
        key: "amount",
        label: "Amount",
        kind: FieldKind::Number { min: 0, max: 40 },
        default: "11",
    },
];

const COIN_CODE: &[CodeLine] = crate::code![
    _ => "fn coin_change(coins: &[usize], amount: usize) -> i64 {",
    "init" => "    let mut dp = vec![INF; amount + 1];",
    "init" => "    dp[0] = 0;",
    _ => "    for a in 1..=amount {",
    _ => "        for &c in coins {",
    "consider" => "            if c <= a && dp[a - c] + 1 < dp[a] {",
    "update" => "                dp[a] = dp[a - c] + 1;",
    _ => "            }",
    _ => "        }",
    _ => "    }",
    "done" => "    if dp[amount] == INF { -1 } else { dp[amount] }",
    _ => "}",
];

#[derive(Debug)]
pub struct CoinChange;

impl Note for CoinChange {
    fn id(&self) -> &'static str {
        "coin-change"
    }

    fn title(&self) -> &'static str {
        "Coin Change (Fewest Coins)"
    }

    fn topic(&self) -> Topic {
        Topic::DynamicProgramming
    }

    fn fields(&self) -> &'static [Field] {
        COIN_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        COIN_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let coins = input.numbers("coins")?;
        let amount = input.number("amount")? as usize;
        Ok(Box::new(coin_change(&coins, amount)?))
    }
}

// ========== 0/1 knapsack ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KnapsackPhase {
    Init,
    TooHeavy,
    Choose,
    Done,
}

impl Phase for KnapsackPhase {
    fn label(&self) -> &'static str {
        match self {
            KnapsackPhase::Init => "init",
            KnapsackPhase::TooHeavy => "too heavy",
            KnapsackPhase::Choose => "choose",
            KnapsackPhase::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnapsackState {
    pub weights: Vec<i64>,
    pub values: Vec<i64>,
    pub capacity: usize,
    /// `(items + 1) × (capacity + 1)`; `None` until written
    pub table: Vec<Vec<Option<i64>>>,
    pub cell: Option<(usize, usize)>,
    pub took: Option<bool>,
    /// Item indices in the optimal packing, filled in at the end
    pub chosen: Vec<usize>,
}

impl Visualize for KnapsackState {
    fn scene(&self) -> Scene {
        let sources: Vec<(usize, usize)> = match self.cell {
            Some((i, w)) if i > 0 => {
                let mut s = vec![(i - 1, w)];
                let wt = self.weights[i - 1] as usize;
                if wt <= w {
                    s.push((i - 1, w - wt));
                }
                s
            }
            _ => Vec::new(),
        };

        let columns = (0..=self.capacity).map(|w| w.to_string()).collect();
        let rows = self
            .table
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let label = if i == 0 {
                    "∅".to_string()
                } else {
                    format!("#{} ({}kg, ${})", i, self.weights[i - 1], self.values[i - 1])
                };
                let cells = row
                    .iter()
                    .enumerate()
                    .map(|(w, v)| {
                        let mark = if Some((i, w)) == self.cell {
                            Mark::Active
                        } else if sources.contains(&(i, w)) {
                            Mark::Compare
                        } else if i > 0 && self.chosen.contains(&(i - 1)) {
                            Mark::Done
                        } else {
                            Mark::Plain
                        };
                        table_cell(*v, mark)
                    })
                    .collect();
                (label, cells)
            })
            .collect();

        let chosen: Vec<usize> = self.chosen.iter().map(|i| i + 1).collect();
        Scene::new()
            .grid("dp[item][capacity]", columns, rows)
            .vars([
                ("capacity", self.capacity.to_string()),
                ("took item", opt(self.took)),
                ("chosen items", list(&chosen)),
            ])
    }
}

pub fn knapsack(
    weights: &[i64],
    values: &[i64],
    capacity: usize,
) -> Result<Trace<KnapsackState, KnapsackPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let n = weights.len().min(values.len());
        let mut table = vec![vec![None; capacity + 1]; n + 1];
        table[0] = vec![Some(0); capacity + 1];
        let mut state = KnapsackState {
            weights: weights[..n].to_vec(),
            values: values[..n].to_vec(),
            capacity,
            table,
            cell: None,
            took: None,
            chosen: Vec::new(),
        };

        rec.emit(
            KnapsackPhase::Init,
            "init",
            state.clone(),
            format!("{} item(s), capacity {}. With no items every capacity is worth 0.", n, capacity),
        )?;

        for i in 1..=n {
            let wt = state.weights[i - 1] as usize;
            let val = state.values[i - 1];
            for w in 0..=capacity {
                state.cell = Some((i, w));
                let skip = state.table[i - 1][w].unwrap_or(0);
                if wt > w {
                    state.table[i][w] = Some(skip);
                    state.took = Some(false);
                    rec.emit(
                        KnapsackPhase::TooHeavy,
                        "too_heavy",
                        state.clone(),
                        format!("Item {} weighs {} > {}: copy {} from above.", i, wt, w, skip),
                    )?;
                } else {
                    let take = state.table[i - 1][w - wt].unwrap_or(0) + val;
                    let best = skip.max(take);
                    state.table[i][w] = Some(best);
                    state.took = Some(take > skip);
                    rec.emit(
                        KnapsackPhase::Choose,
                        "choose",
                        state.clone(),
                        format!(
                            "Capacity {}: skip = {}, take = dp[{}][{}] + {} = {}; keep {}.",
                            w,
                            skip,
                            i - 1,
                            w - wt,
                            val,
                            take,
                            best
                        ),
                    )?;
                }
            }
        }

        // walk back up the table to recover the packing
        let mut w = capacity;
        for i in (1..=n).rev() {
            if state.table[i][w] != state.table[i - 1][w] {
                state.chosen.push(i - 1);
                w -= state.weights[i - 1] as usize;
            }
        }
        state.chosen.reverse();
        state.cell = None;
        state.took = None;

        let best = state.table[n][capacity].unwrap_or(0);
        let items: Vec<usize> = state.chosen.iter().map(|i| i + 1).collect();
        let message = format!("Done. Best value is {} using items {}.", best, list(&items));
        rec.emit(KnapsackPhase::Done, "done", state, message)
    })
}

const KNAPSACK_FIELDS: &[Field] = &[
    Field {
        key: "weights",
        label: "Weights",
        kind: FieldKind::Numbers {
            min_len: 0,
            max_len: 6,
            min: 1,
            max: 15,
        },
        default: "1, 3, 4, 5",
    },
    Field {
        key: "values",
        label: "Values",
        kind: FieldKind::Numbers {
            min_len: 0,
            max_len: 6,
            min: 0,
            max: 100,
        },
        default: "1, 4, 5, 7",
    },
    Field {
        key: "capacity",
        label: "Capacity",
        kind: FieldKind::Number { min: 0, max: 15 },
        default: "7",
    },
];

const KNAPSACK_CODE: &[CodeLine] = crate::code![
    _ => "fn knapsack(wt: &[usize], val: &[i64], cap: usize) -> i64 {",
    "init" => "    let mut dp = vec![vec![0; cap + 1]; wt.len() + 1];",
    _ => "    for i in 1..=wt.len() {",
    _ => "        for w in 0..=cap {",
    "too_heavy" => "            dp[i][w] = if wt[i - 1] > w { dp[i - 1][w] }",
    "choose" => "                else { dp[i - 1][w].max(dp[i - 1][w - wt[i - 1]] + val[i - 1]) };",
    _ => "        }",
    _ => "    }",
    "done" => "    dp[wt.len()][cap]",
    _ => "}",
];

#[derive(Debug)]
pub struct Knapsack;

impl Note for Knapsack {
    fn id(&self) -> &'static str {
        "knapsack-01"
    }

    fn title(&self) -> &'static str {
        "0/1 Knapsack"
    }

    fn topic(&self) -> Topic {
        Topic::DynamicProgramming
    }

    fn fields(&self) -> &'static [Field] {
        KNAPSACK_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        KNAPSACK_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let weights = input.numbers("weights")?;
        let values = input.numbers("values")?;
        let capacity = input.number("capacity")? as usize;
        Ok(Box::new(knapsack(&weights, &values, capacity)?))
    }
}

// ========== Longest common subsequence ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LcsPhase {
    Init,
    Match,
    Carry,
    Done,
}

impl Phase for LcsPhase {
    fn label(&self) -> &'static str {
        match self {
            LcsPhase::Init => "init",
            LcsPhase::Match => "match",
            LcsPhase::Carry => "carry",
            LcsPhase::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LcsState {
    pub a: Vec<char>,
    pub b: Vec<char>,
    pub table: Vec<Vec<Option<i64>>>,
    pub cell: Option<(usize, usize)>,
    pub subsequence: Option<String>,
}

impl Visualize for LcsState {
    fn scene(&self) -> Scene {
        let sources: Vec<(usize, usize)> = match self.cell {
            Some((i, j)) if self.a[i - 1] == self.b[j - 1] => vec![(i - 1, j - 1)],
            Some((i, j)) => vec![(i - 1, j), (i, j - 1)],
            None => Vec::new(),
        };

        let columns = std::iter::once("ε".to_string())
            .chain(self.b.iter().map(|c| c.to_string()))
            .collect();
        let rows = self
            .table
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let label = if i == 0 { "ε".to_string() } else { self.a[i - 1].to_string() };
                let cells = row
                    .iter()
                    .enumerate()
                    .map(|(j, v)| {
                        let mark = if Some((i, j)) == self.cell {
                            Mark::Active
                        } else if sources.contains(&(i, j)) {
                            Mark::Compare
                        } else {
                            Mark::Plain
                        };
                        table_cell(*v, mark)
                    })
                    .collect();
                (label, cells)
            })
            .collect();

        let pair = self
            .cell
            .map(|(i, j)| format!("'{}' vs '{}'", self.a[i - 1], self.b[j - 1]));
        Scene::new().grid("dp[i][j]", columns, rows).vars([
            ("comparing", opt(pair)),
            ("lcs", opt(self.subsequence.as_ref().map(|s| format!("\"{}\"", s)))),
        ])
    }
}

pub fn longest_common_subsequence(a: &str, b: &str) -> Result<Trace<LcsState, LcsPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let (n, m) = (a.len(), b.len());

        let mut table = vec![vec![None; m + 1]; n + 1];
        for (i, row) in table.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                if i == 0 || j == 0 {
                    *cell = Some(0);
                }
            }
        }
        let mut state = LcsState {
            a,
            b,
            table,
            cell: None,
            subsequence: None,
        };

        rec.emit(
            LcsPhase::Init,
            "init",
            state.clone(),
            "Row and column 0 compare against an empty string, so they hold 0.",
        )?;

        for i in 1..=n {
            for j in 1..=m {
                state.cell = Some((i, j));
                let (ca, cb) = (state.a[i - 1], state.b[j - 1]);
                if ca == cb {
                    let v = state.table[i - 1][j - 1].unwrap_or(0) + 1;
                    state.table[i][j] = Some(v);
                    rec.emit(
                        LcsPhase::Match,
                        "match",
                        state.clone(),
                        format!("'{}' == '{}': extend the diagonal, dp[{}][{}] = {}.", ca, cb, i, j, v),
                    )?;
                } else {
                    let up = state.table[i - 1][j].unwrap_or(0);
                    let left = state.table[i][j - 1].unwrap_or(0);
                    state.table[i][j] = Some(up.max(left));
                    rec.emit(
                        LcsPhase::Carry,
                        "carry",
                        state.clone(),
                        format!(
                            "'{}' != '{}': carry max(up {}, left {}) = {}.",
                            ca,
                            cb,
                            up,
                            left,
                            up.max(left)
                        ),
                    )?;
                }
            }
        }

        // trace the table back from the corner
        let (mut i, mut j) = (n, m);
        let mut picked = Vec::new();
        while i > 0 && j > 0 {
            if state.a[i - 1] == state.b[j - 1] {
                picked.push(state.a[i - 1]);
                i -= 1;
                j -= 1;
            } else if state.table[i - 1][j] >= state.table[i][j - 1] {
                i -= 1;
            } else {
                j -= 1;
            }
        }
        let subsequence: String = picked.iter().rev().collect();
        state.cell = None;
        let message = format!(
            "Done. LCS length {} (\"{}\").",
            subsequence.chars().count(),
            subsequence
        );
        state.subsequence = Some(subsequence);
        rec.emit(LcsPhase::Done, "done", state, message)
    })
}

const LCS_FIELDS: &[Field] = &[
    Field {
        key: "a",
        label: "First string",
        kind: FieldKind::Text { max_len: 10 },
        default: "abcde",
    },
    Field {
        key: "b",
        label: "Second string",
        kind: FieldKind::Text { max_len: 10 },
        default: "ace",
    },
];

const LCS_CODE: &[CodeLine] = crate::code![
    _ => "fn lcs(a: &[u8], b: &[u8]) -> usize {",
    "init" => "    let mut dp = vec![vec![0; b.len() + 1]; a.len() + 1];",
    _ => "    for i in 1..=a.len() {",
    _ => "        for j in 1..=b.len() {",
    "match" => "            dp[i][j] = if a[i - 1] == b[j - 1] { dp[i - 1][j - 1] + 1 }",
    "carry" => "                else { dp[i - 1][j].max(dp[i][j - 1]) };",
    _ => "        }",
    _ => "    }",
    "done" => "    dp[a.len()][b.len()]",
    _ => "}",
];

#[derive(Debug)]
pub struct LongestCommonSubsequence;

impl Note for LongestCommonSubsequence {
    fn id(&self) -> &'static str {
        "longest-common-subsequence"
    }

    fn title(&self) -> &'static str {
        "Longest Common Subsequence"
    }

    fn topic(&self) -> Topic {
        Topic::DynamicProgramming
    }

    fn fields(&self) -> &'static [Field] {
        LCS_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        LCS_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let a = input.text("a")?;
        let b = input.text("b")?;
        Ok(Box::new(longest_common_subsequence(&a, &b)?))
    }
}
