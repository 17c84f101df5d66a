//! Tree recursion notes
//!
//! The recursion is real: each generator calls itself once per child and
//! mirrors its own call stack into the recorded state, so the trace shows the
//! frames a debugger would.

use super::{CodeLine, Note, Topic};
use crate::errors::{NoteError, TraceError};
use crate::input::{BinaryTree, Field, FieldKind, InputSet};
use crate::scene::{opt, Cell, Mark, Scene, TreeCell, Visualize};
use crate::trace::{record, Phase, Recorder, Trace, TraceView, DEFAULT_STEP_LIMIT};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecursionPhase {
    Init,
    Enter,
    Null,
    Leaf,
    Return,
    Done,
}

impl Phase for RecursionPhase {
    fn label(&self) -> &'static str {
        match self {
            RecursionPhase::Init => "init",
            RecursionPhase::Enter => "enter",
            RecursionPhase::Null => "null",
            RecursionPhase::Leaf => "leaf",
            RecursionPhase::Return => "return",
            RecursionPhase::Done => "done",
        }
    }
}

/// What a recursive call returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Depth(i64),
    Found(bool),
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Depth(d) => write!(f, "{}", d),
            Answer::Found(found) => write!(f, "{}", found),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallFrame {
    pub node: Option<usize>,
    /// Remaining target for path sum calls
    pub remaining: Option<i64>,
    pub left: Option<Answer>,
    pub right: Option<Answer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecursionState {
    pub tree: BinaryTree,
    /// Name shown on stack frames
    pub function: &'static str,
    pub target: Option<i64>,
    /// Innermost call last
    pub stack: Vec<CallFrame>,
    pub returned: Vec<Option<Answer>>,
    pub answer: Option<Answer>,
}

impl RecursionState {
    fn new(tree: BinaryTree, function: &'static str, target: Option<i64>) -> Self {
        let returned = vec![None; tree.len()];
        RecursionState {
            tree,
            function,
            target,
            stack: Vec::new(),
            returned,
            answer: None,
        }
    }

    fn top_mut(&mut self) -> Option<&mut CallFrame> {
        self.stack.last_mut()
    }
}

impl Visualize for RecursionState {
    fn scene(&self) -> Scene {
        let active = self.stack.last().and_then(|f| f.node);
        let nodes = self
            .tree
            .nodes
            .iter()
            .enumerate()
            .map(|(id, node)| {
                let on_stack = self.stack.iter().any(|f| f.node == Some(id));
                let mark = if Some(id) == active {
                    Mark::Active
                } else if on_stack {
                    Mark::Window
                } else if self.returned[id].is_some() {
                    Mark::Done
                } else {
                    Mark::Plain
                };
                let text = match self.returned[id] {
                    Some(r) => format!("{} ⇒ {}", node.value, r),
                    None => node.value.to_string(),
                };
                TreeCell {
                    cell: Cell::new(text, mark),
                    left: node.left,
                    right: node.right,
                }
            })
            .collect();

        let frames = self
            .stack
            .iter()
            .map(|f| {
                let node = f.node.map_or("null".to_string(), |id| self.tree.nodes[id].value.to_string());
                let text = match f.remaining {
                    Some(rem) => format!("{}({}, {})", self.function, node, rem),
                    None => format!("{}({})", self.function, node),
                };
                let text = match (f.left, f.right) {
                    (Some(l), Some(r)) => format!("{}  L={} R={}", text, l, r),
                    (Some(l), None) => format!("{}  L={}", text, l),
                    _ => text,
                };
                Cell::plain(text)
            })
            .collect();

        let mut vars = vec![("depth of call stack".to_string(), self.stack.len().to_string())];
        if let Some(target) = self.target {
            vars.push(("target".to_string(), target.to_string()));
        }
        vars.push(("answer".to_string(), opt(self.answer)));

        Scene::new()
            .tree("tree", self.tree.root, nodes)
            .stack("call stack", frames)
            .vars(vars)
    }
}

// ========== Maximum depth ==========

fn depth_call(
    rec: &mut Recorder<RecursionState, RecursionPhase>,
    state: &mut RecursionState,
    node: Option<usize>,
) -> Result<i64, TraceError> {
    state.stack.push(CallFrame {
        node,
        remaining: None,
        left: None,
        right: None,
    });

    let Some(id) = node else {
        rec.emit(
            RecursionPhase::Null,
            "null",
            state.clone(),
            "Empty subtree: depth 0.",
        )?;
        state.stack.pop();
        return Ok(0);
    };

    let current = state.tree.nodes[id];
    rec.emit(
        RecursionPhase::Enter,
        "enter",
        state.clone(),
        format!("Visit {}: recurse into the left subtree, then the right.", current.value),
    )?;

    let left = depth_call(rec, state, current.left)?;
    if let Some(frame) = state.top_mut() {
        frame.left = Some(Answer::Depth(left));
    }
    let right = depth_call(rec, state, current.right)?;
    if let Some(frame) = state.top_mut() {
        frame.right = Some(Answer::Depth(right));
    }

    let depth = 1 + left.max(right);
    state.returned[id] = Some(Answer::Depth(depth));
    rec.emit(
        RecursionPhase::Return,
        "return",
        state.clone(),
        format!(
            "Node {}: 1 + max({}, {}) = {}.",
            current.value, left, right, depth
        ),
    )?;
    state.stack.pop();
    Ok(depth)
}

pub fn max_depth(tree: &BinaryTree) -> Result<Trace<RecursionState, RecursionPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let mut state = RecursionState::new(tree.clone(), "max_depth", None);
        rec.emit(
            RecursionPhase::Init,
            "init",
            state.clone(),
            format!("Call max_depth on the root of a {}-node tree.", tree.len()),
        )?;

        let depth = depth_call(rec, &mut state, tree.root)?;
        state.answer = Some(Answer::Depth(depth));
        rec.emit(
            RecursionPhase::Done,
            "done",
            state,
            format!("Done. Maximum depth is {}.", depth),
        )
    })
}

const DEPTH_FIELDS: &[Field] = &[Field {
    key: "tree",
    label: "Tree",
    kind: FieldKind::Tree {
        max_nodes: 15,
        min: -99,
        max: 99,
    },
    default: "3, 9, 20, null, null, 15, 7",
}];

const DEPTH_CODE: &[CodeLine] = crate::code![
    "init" => "fn max_depth(node: Option<&Node>) -> i64 {",
    "null" => "    let Some(node) = node else { return 0 };",
    "enter" => "    let left = max_depth(node.left.as_deref());",
    "enter" => "    let right = max_depth(node.right.as_deref());",
    "return" => "    1 + left.max(right)",
    "done" => "}",
];

#[derive(Debug)]
pub struct MaxDepth;

impl Note for MaxDepth {
    fn id(&self) -> &'static str {
        "max-depth"
    }

    fn title(&self) -> &'static str {
        "Maximum Depth of a Binary Tree"
    }

    fn topic(&self) -> Topic {
        Topic::TreeRecursion
    }

    fn fields(&self) -> &'static [Field] {
        DEPTH_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        DEPTH_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let tree = input.tree("tree")?;
        Ok(Box::new(max_depth(&tree)?))
    }
}

// ========== Path sum ==========

fn path_call(
    rec: &mut Recorder<RecursionState, RecursionPhase>,
    state: &mut RecursionState,
    node: Option<usize>,
    target: i64,
) -> Result<bool, TraceError> {
    state.stack.push(CallFrame {
        node,
        remaining: Some(target),
        left: None,
        right: None,
    });

    let Some(id) = node else {
        rec.emit(
            RecursionPhase::Null,
            "null",
            state.clone(),
            "Empty subtree: no path here, false.",
        )?;
        state.stack.pop();
        return Ok(false);
    };

    let current = state.tree.nodes[id];
    let remaining = target - current.value;
    rec.emit(
        RecursionPhase::Enter,
        "enter",
        state.clone(),
        format!(
            "Visit {}: {} - {} = {} still needed below.",
            current.value, target, current.value, remaining
        ),
    )?;

    if current.left.is_none() && current.right.is_none() {
        let found = remaining == 0;
        state.returned[id] = Some(Answer::Found(found));
        rec.emit(
            RecursionPhase::Leaf,
            "leaf",
            state.clone(),
            if found {
                format!("Leaf {} closes the path exactly: true.", current.value)
            } else {
                format!("Leaf {} leaves {} unmatched: false.", current.value, remaining)
            },
        )?;
        state.stack.pop();
        return Ok(found);
    }

    let left = path_call(rec, state, current.left, remaining)?;
    if let Some(frame) = state.top_mut() {
        frame.left = Some(Answer::Found(left));
    }

    let found = if left {
        true
    } else {
        let right = path_call(rec, state, current.right, remaining)?;
        if let Some(frame) = state.top_mut() {
            frame.right = Some(Answer::Found(right));
        }
        right
    };

    state.returned[id] = Some(Answer::Found(found));
    let message = if left {
        format!("Left of {} found a path; the right side is never explored.", current.value)
    } else {
        format!("Node {} returns left || right = {}.", current.value, found)
    };
    rec.emit(RecursionPhase::Return, "return", state.clone(), message)?;
    state.stack.pop();
    Ok(found)
}

pub fn path_sum(tree: &BinaryTree, target: i64) -> Result<Trace<RecursionState, RecursionPhase>, TraceError> {
    record(DEFAULT_STEP_LIMIT, |rec| {
        let mut state = RecursionState::new(tree.clone(), "has_path_sum", Some(target));
        rec.emit(
            RecursionPhase::Init,
            "init",
            state.clone(),
            format!("Is there a root-to-leaf path summing to {}?", target),
        )?;

        let found = path_call(rec, &mut state, tree.root, target)?;
        state.answer = Some(Answer::Found(found));
        let message = if found {
            format!("Done. A root-to-leaf path sums to {}.", target)
        } else {
            format!("Done. No root-to-leaf path sums to {}.", target)
        };
        rec.emit(RecursionPhase::Done, "done", state, message)
    })
}

const PATH_FIELDS: &[Field] = &[
    Field {
        key: "tree",
        label: "Tree",
        kind: FieldKind::Tree {
            max_nodes: 15,
            min: -99,
            max: 99,
        },
        default: "5, 4, 8, 11, null, 13, 4, 7, 2, null, null, null, 1",
    },
    Field {
        key: "target",
        label: "Target",
        kind: FieldKind::Number { min: -500, max: 500 },
        default: "22",
    },
];

const PATH_CODE: &[CodeLine] = crate::code![
    "init" => "fn has_path_sum(node: Option<&Node>, target: i64) -> bool {",
    "null" => "    let Some(node) = node else { return false };",
    "enter" => "    let remaining = target - node.val;",
    "leaf" => "    if node.left.is_none() && node.right.is_none() { return remaining == 0; }",
    "return" => "    has_path_sum(node.left.as_deref(), remaining)",
    "return" => "        || has_path_sum(node.right.as_deref(), remaining)",
    "done" => "}",
];

#[derive(Debug)]
pub struct PathSum;

impl Note for PathSum {
    fn id(&self) -> &'static str {
        "path-sum"
    }

    fn title(&self) -> &'static str {
        "Root-to-Leaf Path Sum"
    }

    fn topic(&self) -> Topic {
        Topic::TreeRecursion
    }

    fn fields(&self) -> &'static [Field] {
        PATH_FIELDS
    }

    fn code(&self) -> &'static [CodeLine] {
        PATH_CODE
    }

    fn generate(&self, input: &InputSet) -> Result<Box<dyn TraceView>, NoteError> {
        let tree = input.tree("tree")?;
        let target = input.number("target")?;
        Ok(Box::new(path_sum(&tree, target)?))
    }
}
