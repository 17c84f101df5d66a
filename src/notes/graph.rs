//! Graph notes: single-source shortest paths and topological ordering

use super::{list, CodeLine, Note, Topic};
use crate::errors::{NoteError, TraceError};
use crate::input::{Field, FieldKind, InputSet};
use crate::scene::{Cell, Mark, Scene, Visualize};
use crate::trace::{record, Phase, Trace, TraceView, DEFAULT_STEP_LIMIT};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

pub const MAX_NODES: i64 = 8;

/// Directed edge `from -> to` with weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: i64,
}

/// Keep edges whose endpoints exist; clamp weights into `0..=99`
pub fn build_edges(n: usize, tuples: &[Vec<i64>]) -> Vec<Edge> {
    tuples
        .iter()
        .filter_map(|t| {
            let (from, to) = (*t.first()?, *t.get(1)?);
            if from < 0 || to < 0 || from as usize >= n || to as usize >= n {
                return None;
            }
            Some(Edge {
                from: from as usize,
                to: to as usize,
                weight: t.get(2).copied().unwrap_or(1).clamp(0, 99),
            })
        })
        .collect()
}

fn edge_lines(edges: &[Edge], active: Option<usize>, weighted: bool) -> Vec<Cell> {
    edges
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let text = if weighted {
                format!("{} → {} ({})", e.from, e.to, e.weight)
            } else {
                format!("{} → {}", e.from, e.to)
            };
            let mark = if Some(i) == active { Mark::Active } else { Mark::Plain };
            Cell::new(text, mark)
        })
        .collect()
}

// ========== Dijkstra ==========

fn distance(d: Option<i64>) -> String {
    d.map_or_else(|| "∞".to_string(), |d| d.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DijkstraPhase {
    Init,
    Pop,
    Stale,
    Relax,
    NoImprove,
    Done,
}

impl Phase for DijkstraPhase {
    fn label(&self) -> &'static str {
        match self {
            DijkstraPhase::Init => "init",
            DijkstraPhase::Pop => "pop",
            DijkstraPhase::Stale => "stale",
            DijkstraPhase::Relax => "relax",
            DijkstraPhase::NoImprove => "no improvement",
            DijkstraPhase::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DijkstraState {
    pub n: usize,
    pub source: usize,
    pub edges: Vec<Edge>,
    /// `None` is infinity
    pub dist: Vec<Option<i64>>,
    pub prev: Vec<Option<usize>>,
    /// Heap contents in pop order
    pub heap: Vec<(i64, usize)>,
    pub settled: Vec<bool>,
    pub current: Option<usize>,
    pub edge: Option<usize>,
}

impl DijkstraState {
    /// Node sequence from the source to `target`, if reachable
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        self.dist.get(target).copied().flatten()?;
        let mut path = vec![target];
        let mut node = target;
        while let Some(p) = self.prev[node] {
            path.push(p);
            node = p;
        }
        path.reverse();
        Some(path)
    }
}

impl Visualize for DijkstraState {
    fn scene(&self) -> Scene {
        let target = self.edge.map(|e| self.edges[e].to);
        let dist = (0..self.n)
            .map(|v| {
                let mark = if Some(v) == self.current {
                    Mark::Active
                } else if Some(v) == target {
                    Mark::Compare
                } else if self.settled[v] {
                    Mark::Done
                } else {
                    Mark::Plain
                };
                Cell::new(distance(self.dist[v]), mark)
            })
            .collect();

        let heap = self
            .heap
            .iter()
            .map(|(d, v)| Cell::plain(format!("({}, {})", d, v)))
            .collect();

        let paths = (0..self.n)
            .map(|v| match self.path_to(v) {
                Some(path) => {
                    let hops: Vec<String> = path.iter().map(|p| p.to_string()).collect();
                    Cell::new(
                        format!("{}: {}", v, hops.join(" → ")),
                        if self.settled[v] { Mark::Done } else { Mark::Plain },
                    )
                }
                None => Cell::new(format!("{}: unreachable", v), Mark::Dim),
            })
            .collect();

        Scene::new()
            .cells(
                "dist[node]",
                dist,
                crate::scene::pointers([("src", Some(self.source)), ("u", self.current)]),
            )
            .stack("heap (dist, node), next pop last", heap)
            .lines("edges", edge_lines(&self.edges, self.edge, true))
            .lines("paths", paths)
    }
}

pub fn dijkstra(n: usize, edges: &[Edge], source: usize) -> Result<Trace<DijkstraState, DijkstraPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let n = n.max(1);
        let source = source.min(n - 1);
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, e) in edges.iter().enumerate() {
            adjacency[e.from].push(i);
        }

        let mut heap = BinaryHeap::new();
        heap.push(Reverse((0i64, source)));
        let mut state = DijkstraState {
            n,
            source,
            edges: edges.to_vec(),
            dist: vec![None; n],
            prev: vec![None; n],
            heap: Vec::new(),
            settled: vec![false; n],
            current: None,
            edge: None,
        };
        state.dist[source] = Some(0);
        state.heap = heap_snapshot(&heap);

        rec.emit(
            DijkstraPhase::Init,
            "init",
            state.clone(),
            format!("dist[{}] = 0, every other node ∞. Seed the heap with the source.", source),
        )?;

        while let Some(Reverse((d, u))) = heap.pop() {
            state.heap = heap_snapshot(&heap);
            state.current = Some(u);
            state.edge = None;

            if state.dist[u].is_some_and(|best| d > best) {
                rec.emit(
                    DijkstraPhase::Stale,
                    "stale",
                    state.clone(),
                    format!("Popped ({}, {}) but dist[{}] is already {}; skip.", d, u, u, distance(state.dist[u])),
                )?;
                continue;
            }

            state.settled[u] = true;
            rec.emit(
                DijkstraPhase::Pop,
                "pop",
                state.clone(),
                format!("Pop node {} at distance {}; it is now final.", u, d),
            )?;

            for &ei in &adjacency[u] {
                let Edge { to: v, weight: w, .. } = edges[ei];
                state.edge = Some(ei);
                let candidate = d + w;
                match state.dist[v] {
                    Some(current) if candidate >= current => {
                        rec.emit(
                            DijkstraPhase::NoImprove,
                            "relax",
                            state.clone(),
                            format!("{} + {} = {} does not beat dist[{}] = {}.", d, w, candidate, v, current),
                        )?;
                    }
                    _ => {
                        let before = distance(state.dist[v]);
                        state.dist[v] = Some(candidate);
                        state.prev[v] = Some(u);
                        heap.push(Reverse((candidate, v)));
                        state.heap = heap_snapshot(&heap);
                        rec.emit(
                            DijkstraPhase::Relax,
                            "update",
                            state.clone(),
                            format!(
                                "{} + {} = {} < {}: dist[{}] = {}, push ({}, {}).",
                                d, w, candidate, before, v, candidate, candidate, v
                            ),
                        )?;
                    }
                }
            }
        }

        state.current = None;
        state.edge = None;
        let reached = state.dist.iter().filter(|d| d.is_some()).count();
        let message = format!("Heap empty. {} of {} node(s) reachable from {}.", reached, n, source);
        rec.emit(DijkstraPhase::Done, "done", state, message)
    })
}

/// Heap entries ordered so that the next pop is last
fn heap_snapshot(heap: &BinaryHeap<Reverse<(i64, usize)>>) -> Vec<(i64, usize)> {
    let mut entries: Vec<(i64, usize)> = heap.iter().map(|Reverse(e)| *e).collect();
    entries.sort_unstable_by(|a, b| b.cmp(a));
    entries
}

const DIJKSTRA_FIELDS: &[Field] = &[
    Field {
        key: "n",
        label: "Nodes",
        kind: FieldKind::Number { min: 1, max: MAX_NODES },
        default: "5",
    },
    Field {
        key: "edges",
        label: "Edges [u,v,w]",
        kind: FieldKind::Tuples { arity: 3, max_len: 16 },
        default: "[0,1,4], [0,2,1], [2,1,2], [1,3,1], [2,3,5], [3,4,3]",
    },
    Field {
        key: "source",
        label: "Source",
        kind: FieldKind::Number { min: 0, max: MAX_NODES - 1 },
        default: "0",
    },
];

const DIJKSTRA_CODE: &[CodeLine] = crate::code![
    _ => "fn dijkstra(adj: &[Vec<(usize, i64)>], src: usize) -> Vec<i64> {",
    "init" => "    let mut dist = vec![INF; adj.len()];",
    "init" => "    dist[src] = 0;",
    "init" => "    let mut heap = BinaryHeap::from([Reverse((0, src))]);",
    "pop" => "    while let Some(Reverse((d, u))) = heap.pop() {",
    "stale" => "        if d > dist[u] { continue; }",
    "relax" => "        for &(v, w) in &adj[u] {",
    "relax" => "            if d + w < dist[v] {",
    "update" => "                dist[v] = d + w;",
    "update" => "                heap.push(Reverse((dist[v], v)));",
    _ => "            }",
    _ => "        }",
    _ => "    }",
    "done" => "    dist",
    _ => "}",
];

#[derive(Debug)]
pub struct Dijkstra;

impl Note for Dijkstra {
    fn id(&self) -> &'static str {
        "dijkstra"
    }

    fn title(&self) -> &'static str {
        "Dijkstra's Shortest Paths"
    }

    fn topic(&self) -> Topic {
        Topic::Graphs
    }

    fn fields(&self) -> &'static [Field] {
        DIJKSTRA_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        DIJKSTRA_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let n = input.number("n")? as usize;
        let edges = build_edges(n, &input.int_tuples("edges")?);
        let source = input.number("source")? as usize;
        Ok(Box::new(dijkstra(n, &edges, source)?))
    }
}

// ========== Topological sort (Kahn) ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TopoPhase {
    Init,
    Enqueue,
    Dequeue,
    Decrement,
    Done,
    Cycle,
}

impl Phase for TopoPhase {
    fn label(&self) -> &'static str {
        match self {
            TopoPhase::Init => "init",
            TopoPhase::Enqueue => "enqueue",
            TopoPhase::Dequeue => "dequeue",
            TopoPhase::Decrement => "decrement",
            TopoPhase::Done => "done",
            TopoPhase::Cycle => "cycle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopoState {
    pub n: usize,
    pub edges: Vec<Edge>,
    pub indegree: Vec<usize>,
    /// Front first
    pub queue: Vec<usize>,
    pub order: Vec<usize>,
    pub current: Option<usize>,
    pub edge: Option<usize>,
}

impl Visualize for TopoState {
    fn scene(&self) -> Scene {
        let target = self.edge.map(|e| self.edges[e].to);
        let indegree = self
            .indegree
            .iter()
            .enumerate()
            .map(|(v, d)| {
                let mark = if Some(v) == self.current {
                    Mark::Active
                } else if Some(v) == target {
                    Mark::Compare
                } else if self.order.contains(&v) {
                    Mark::Done
                } else if self.queue.contains(&v) {
                    Mark::Window
                } else {
                    Mark::Plain
                };
                Cell::new(d.to_string(), mark)
            })
            .collect();

        let queue = self.queue.iter().map(|v| Cell::plain(v.to_string())).collect();
        let order = self.order.iter().map(|v| Cell::new(v.to_string(), Mark::Done)).collect();

        Scene::new()
            .cells(
                "indegree[node]",
                indegree,
                crate::scene::pointers([("u", self.current), ("v", target)]),
            )
            .cells("queue (front first)", queue, Vec::new())
            .cells("order", order, Vec::new())
            .lines("edges", edge_lines(&self.edges, self.edge, false))
    }
}

pub fn topological_sort(n: usize, edges: &[Edge]) -> Result<Trace<TopoState, TopoPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let n = n.max(1);

        // parallel edges would double count indegrees
        let mut seen = FxHashSet::default();
        let edges: Vec<Edge> = edges
            .iter()
            .filter(|e| seen.insert((e.from, e.to)))
            .copied()
            .collect();

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut indegree = vec![0; n];
        for (i, e) in edges.iter().enumerate() {
            adjacency[e.from].push(i);
            indegree[e.to] += 1;
        }

        let mut queue = VecDeque::new();
        let mut state = TopoState {
            n,
            edges: edges.clone(),
            indegree,
            queue: Vec::new(),
            order: Vec::new(),
            current: None,
            edge: None,
        };

        rec.emit(
            TopoPhase::Init,
            "init",
            state.clone(),
            format!("Count incoming edges: indegree = {}.", list(&state.indegree)),
        )?;

        for v in 0..n {
            if state.indegree[v] == 0 {
                queue.push_back(v);
                state.queue = queue.iter().copied().collect();
                rec.emit(
                    TopoPhase::Enqueue,
                    "seed",
                    state.clone(),
                    format!("Node {} has no prerequisites; enqueue it.", v),
                )?;
            }
        }

        while let Some(u) = queue.pop_front() {
            state.queue = queue.iter().copied().collect();
            state.current = Some(u);
            state.edge = None;
            state.order.push(u);
            rec.emit(
                TopoPhase::Dequeue,
                "dequeue",
                state.clone(),
                format!("Dequeue {} and append it to the order.", u),
            )?;

            for &ei in &adjacency[u] {
                let v = edges[ei].to;
                state.edge = Some(ei);
                state.indegree[v] -= 1;
                rec.emit(
                    TopoPhase::Decrement,
                    "decrement",
                    state.clone(),
                    format!("Remove edge {} → {}: indegree[{}] = {}.", u, v, v, state.indegree[v]),
                )?;

                if state.indegree[v] == 0 {
                    queue.push_back(v);
                    state.queue = queue.iter().copied().collect();
                    rec.emit(
                        TopoPhase::Enqueue,
                        "enqueue",
                        state.clone(),
                        format!("Node {} is free now; enqueue it.", v),
                    )?;
                }
            }
        }

        state.current = None;
        state.edge = None;
        if state.order.len() == n {
            let message = format!("Done. Topological order: {}.", list(&state.order));
            rec.emit(TopoPhase::Done, "done", state, message)
        } else {
            let stuck: Vec<usize> = (0..n).filter(|v| !state.order.contains(v)).collect();
            let message = format!(
                "Queue empty after {} of {} node(s): nodes {} sit on a cycle.",
                state.order.len(),
                n,
                list(&stuck)
            );
            rec.emit(TopoPhase::Cycle, "cycle", state, message)
        }
    })
}

const TOPO_FIELDS: &[Field] = &[
    Field {
        key: "n",
        label: "Nodes",
        kind: FieldKind::Number { min: 1, max: MAX_NODES },
        default: "6",
    },
    Field {
        key: "edges",
        label: "Edges [u,v]",
        kind: FieldKind::Tuples { arity: 2, max_len: 16 },
        default: "[5,2], [5,0], [4,0], [4,1], [2,3], [3,1]",
    },
];

const TOPO_CODE: &[CodeLine] = crate::code![
    _ => "fn topo_sort(adj: &[Vec<usize>]) -> Option<Vec<usize>> {",
    "init" => "    let mut indeg = vec![0; adj.len()];",
    "init" => "    for vs in adj { for &v in vs { indeg[v] += 1; } }",
    "seed" => "    let mut queue: VecDeque<_> = (0..adj.len()).filter(|&v| indeg[v] == 0).collect();",
    _ => "    let mut order = Vec::new();",
    "dequeue" => "    while let Some(u) = queue.pop_front() {",
    "dequeue" => "        order.push(u);",
    _ => "        for &v in &adj[u] {",
    "decrement" => "            indeg[v] -= 1;",
    "enqueue" => "            if indeg[v] == 0 { queue.push_back(v); }",
    _ => "        }",
    _ => "    }",
    "done" => "    (order.len() == adj.len()).then_some(order)",
    "cycle" => "    // shorter order: the rest is on a cycle",
    _ => "}",
];

#[derive(Debug)]
pub struct TopologicalSort;

impl Note for TopologicalSort {
    fn id(&self) -> &'static str {
        "topological-sort"
    }

    fn title(&self) -> &'static str {
        "Topological Sort (Kahn)"
    }

    fn topic(&self) -> Topic {
        Topic::Graphs
    }

    fn fields(&self) -> &'static [Field] {
        TOPO_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        TOPO_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let n = input.number("n")? as usize;
        let edges = build_edges(n, &input.int_tuples("edges")?);
        Ok(Box::new(topological_sort(n, &edges)?))
    }
}
