//! Editable note inputs.
//!
//! Each note declares its [`Field`]s statically. An [`InputSet`] holds the raw
//! text the user typed for every field and converts it to typed values on
//! demand, following the lenient rules in [`parse`].

pub mod parse;

use crate::errors::InputError;
use serde::Serialize;
use std::collections::BTreeMap;

/// How a field's text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numbers {
        min_len: usize,
        max_len: usize,
        min: i64,
        max: i64,
    },
    Number {
        min: i64,
        max: i64,
    },
    Text {
        max_len: usize,
    },
    /// Bracket-pair syntax: `[a,b],[c,d]`
    Tuples {
        arity: usize,
        max_len: usize,
    },
    /// Level-order listing with `null` holes
    Tree {
        max_nodes: usize,
        min: i64,
        max: i64,
    },
    Choice(&'static [&'static str]),
}

impl FieldKind {
    /// Short hint shown next to the field in the UI
    pub fn hint(&self) -> String {
        match self {
            FieldKind::Numbers { max_len, min, max, .. } => {
                format!("≤{} numbers in {}..{}", max_len, min, max)
            }
            FieldKind::Number { min, max } => format!("{}..{}", min, max),
            FieldKind::Text { max_len } => format!("≤{} chars", max_len),
            FieldKind::Tuples { arity, max_len } => format!("≤{} [{}-tuples]", max_len, arity),
            FieldKind::Tree { max_nodes, .. } => format!("level order, ≤{} slots", max_nodes),
            FieldKind::Choice(options) => options.join("|"),
        }
    }
}

/// Static description of one editable input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub default: &'static str,
}

/// Binary tree built from a level-order listing, stored as an arena
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BinaryTree {
    pub nodes: Vec<TreeNode>,
    pub root: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub value: i64,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl BinaryTree {
    /// Build from level order. A `None` slot has no children of its own, so
    /// the listing is consumed two slots per present node.
    pub fn from_level_order(slots: &[Option<i64>]) -> Self {
        let mut tree = BinaryTree::default();
        let Some(Some(root_value)) = slots.first() else {
            return tree;
        };

        tree.nodes.push(TreeNode {
            value: *root_value,
            left: None,
            right: None,
        });
        tree.root = Some(0);

        let mut parent = 0;
        let mut slot = 1;
        while slot < slots.len() && parent < tree.nodes.len() {
            for is_left in [true, false] {
                let Some(entry) = slots.get(slot) else {
                    break;
                };
                slot += 1;
                if let Some(value) = entry {
                    let id = tree.nodes.len();
                    tree.nodes.push(TreeNode {
                        value: *value,
                        left: None,
                        right: None,
                    });
                    if is_left {
                        tree.nodes[parent].left = Some(id);
                    } else {
                        tree.nodes[parent].right = Some(id);
                    }
                }
            }
            parent += 1;
        }

        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Raw text for every field of a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSet {
    fields: &'static [Field],
    values: BTreeMap<&'static str, String>,
}

impl InputSet {
    /// Seed every field with its default text
    pub fn defaults(fields: &'static [Field]) -> Self {
        InputSet {
            fields,
            values: fields
                .iter()
                .map(|f| (f.key, f.default.to_string()))
                .collect(),
        }
    }

    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    pub fn field(&self, key: &str) -> Result<&'static Field, InputError> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .ok_or_else(|| InputError::UnknownField {
                key: key.to_string(),
            })
    }

    /// Raw text of a field, empty if unset
    pub fn raw(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    /// Replace the raw text of a field
    pub fn set(&mut self, key: &str, text: impl Into<String>) -> Result<(), InputError> {
        let field = self.field(key)?;
        self.values.insert(field.key, text.into());
        Ok(())
    }

    pub fn numbers(&self, key: &str) -> Result<Vec<i64>, InputError> {
        let field = self.field(key)?;
        match field.kind {
            FieldKind::Numbers {
                min_len,
                max_len,
                min,
                max,
            } => parse::numbers(field.key, self.raw(key), min_len, max_len, min, max),
            _ => Err(InputError::KindMismatch { field: field.key }),
        }
    }

    pub fn number(&self, key: &str) -> Result<i64, InputError> {
        let field = self.field(key)?;
        match field.kind {
            FieldKind::Number { min, max } => parse::number(field.key, self.raw(key), min, max),
            _ => Err(InputError::KindMismatch { field: field.key }),
        }
    }

    pub fn text(&self, key: &str) -> Result<String, InputError> {
        let field = self.field(key)?;
        match field.kind {
            FieldKind::Text { max_len } => Ok(parse::text(self.raw(key), max_len)),
            _ => Err(InputError::KindMismatch { field: field.key }),
        }
    }

    pub fn tuples(&self, key: &str) -> Result<Vec<Vec<String>>, InputError> {
        let field = self.field(key)?;
        match field.kind {
            FieldKind::Tuples { arity, max_len } => Ok(parse::tuples(self.raw(key), arity, max_len)),
            _ => Err(InputError::KindMismatch { field: field.key }),
        }
    }

    pub fn int_tuples(&self, key: &str) -> Result<Vec<Vec<i64>>, InputError> {
        let field = self.field(key)?;
        match field.kind {
            FieldKind::Tuples { arity, max_len } => {
                Ok(parse::int_tuples(self.raw(key), arity, max_len))
            }
            _ => Err(InputError::KindMismatch { field: field.key }),
        }
    }

    pub fn tree(&self, key: &str) -> Result<BinaryTree, InputError> {
        let field = self.field(key)?;
        match field.kind {
            FieldKind::Tree { max_nodes, min, max } => {
                let slots = parse::level_order(self.raw(key), max_nodes, min, max);
                Ok(BinaryTree::from_level_order(&slots))
            }
            _ => Err(InputError::KindMismatch { field: field.key }),
        }
    }

    pub fn choice(&self, key: &str) -> Result<&'static str, InputError> {
        let field = self.field(key)?;
        match field.kind {
            FieldKind::Choice(options) => parse::choice(field.key, self.raw(key), options),
            _ => Err(InputError::KindMismatch { field: field.key }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[Field] = &[
        Field {
            key: "nums",
            label: "Numbers",
            kind: FieldKind::Numbers {
                min_len: 0,
                max_len: 5,
                min: 0,
                max: 9,
            },
            default: "1,2,3",
        },
        Field {
            key: "k",
            label: "Window",
            kind: FieldKind::Number { min: 1, max: 5 },
            default: "2",
        },
    ];

    #[test]
    fn test_defaults_and_overrides() {
        let mut input = InputSet::defaults(FIELDS);
        assert_eq!(input.numbers("nums").unwrap(), vec![1, 2, 3]);
        input.set("nums", "4 5").unwrap();
        assert_eq!(input.numbers("nums").unwrap(), vec![4, 5]);
        assert!(input.set("missing", "1").is_err());
    }

    #[test]
    fn test_kind_mismatch() {
        let input = InputSet::defaults(FIELDS);
        assert_eq!(
            input.number("nums"),
            Err(InputError::KindMismatch { field: "nums" })
        );
    }

    #[test]
    fn test_tree_skips_children_of_null() {
        let tree = BinaryTree::from_level_order(&[
            Some(1),
            None,
            Some(2),
            Some(3),
        ]);
        assert_eq!(tree.len(), 3);
        let root = tree.nodes[0];
        assert_eq!(root.left, None);
        assert_eq!(root.right, Some(1));
        assert_eq!(tree.nodes[1].left, Some(2));
    }

    #[test]
    fn test_empty_tree() {
        assert!(BinaryTree::from_level_order(&[]).is_empty());
        assert!(BinaryTree::from_level_order(&[None, Some(1)]).is_empty());
    }
}
