//! Renderer-neutral description of what a step looks like.
//!
//! A [`Scene`] is rebuilt from a step's state on every render; nothing in
//! here is cached between steps.

/// Highlight applied to a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mark {
    #[default]
    Plain,
    /// The element the current operation acts on
    Active,
    /// The element it is compared against
    Compare,
    /// Inside the current window, range or path
    Window,
    /// Settled / final
    Done,
    /// Out of play
    Dim,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub mark: Mark,
}

impl Cell {
    pub fn new(text: impl Into<String>, mark: Mark) -> Self {
        Cell {
            text: text.into(),
            mark,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Cell::new(text, Mark::Plain)
    }
}

/// Named arrow under an array cell (`i`, `lo`, `hi`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    pub label: String,
    pub index: usize,
}

/// Binary tree node stored in an arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeCell {
    pub cell: Cell,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Cells {
        title: String,
        cells: Vec<Cell>,
        pointers: Vec<Pointer>,
    },
    /// Bottom of the stack first
    Stack { title: String, items: Vec<Cell> },
    Grid {
        title: String,
        columns: Vec<String>,
        rows: Vec<(String, Vec<Cell>)>,
    },
    Tree {
        title: String,
        root: Option<usize>,
        nodes: Vec<TreeCell>,
    },
    Vars(Vec<(String, String)>),
    Lines { title: String, lines: Vec<Cell> },
}

/// Ordered list of widgets for one step
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scene {
    pub widgets: Vec<Widget>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn cells(mut self, title: impl Into<String>, cells: Vec<Cell>, pointers: Vec<Pointer>) -> Self {
        self.widgets.push(Widget::Cells {
            title: title.into(),
            cells,
            pointers,
        });
        self
    }

    pub fn stack(mut self, title: impl Into<String>, items: Vec<Cell>) -> Self {
        self.widgets.push(Widget::Stack {
            title: title.into(),
            items,
        });
        self
    }

    pub fn grid(
        mut self,
        title: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<(String, Vec<Cell>)>,
    ) -> Self {
        self.widgets.push(Widget::Grid {
            title: title.into(),
            columns,
            rows,
        });
        self
    }

    pub fn tree(mut self, title: impl Into<String>, root: Option<usize>, nodes: Vec<TreeCell>) -> Self {
        self.widgets.push(Widget::Tree {
            title: title.into(),
            root,
            nodes,
        });
        self
    }

    pub fn vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.widgets.push(Widget::Vars(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        ));
        self
    }

    pub fn lines(mut self, title: impl Into<String>, lines: Vec<Cell>) -> Self {
        self.widgets.push(Widget::Lines {
            title: title.into(),
            lines,
        });
        self
    }
}

/// Pure mapping from a recorded state to its scene
pub trait Visualize {
    fn scene(&self) -> Scene;
}

/// Shorthand for a pointer list
pub fn pointers<'a>(items: impl IntoIterator<Item = (&'a str, Option<usize>)>) -> Vec<Pointer> {
    items
        .into_iter()
        .filter_map(|(label, index)| {
            index.map(|index| Pointer {
                label: label.to_string(),
                index,
            })
        })
        .collect()
}

/// Format an optional value, `-` when absent
pub fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
