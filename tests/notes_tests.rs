// Integration tests for the notebook generators

use algonote::errors::NoteError;
use algonote::input::BinaryTree;
use algonote::notes::binary_search::{koko_eating_bananas, ship_within_days, split_array_largest_sum};
use algonote::notes::dp::{coin_change, knapsack, longest_common_subsequence};
use algonote::notes::graph::{build_edges, dijkstra, topological_sort, TopoPhase};
use algonote::notes::monotonic_stack::{next_greater, sum_subarray_minimums, StackPhase};
use algonote::notes::sliding_window::{longest_unique_substring, max_sum_window};
use algonote::notes::sql_join::{nested_loop_join, JoinKind, Row};
use algonote::notes::tree::{max_depth, path_sum, Answer};
use algonote::notes::{find, notebook};
use proptest::prelude::*;

fn tree(slots: &[Option<i64>]) -> BinaryTree {
    BinaryTree::from_level_order(slots)
}

#[test]
fn test_longest_unique_substring() {
    let trace = longest_unique_substring("abcabcbb").expect("trace");
    let last = &trace.last().state;
    assert_eq!(last.best_len, 3);
    assert_eq!(last.best(), "abc");

    let trace = longest_unique_substring("").expect("empty string still records");
    assert!(trace.len() >= 2);
    assert_eq!(trace.last().state.best_len, 0);
}

#[test]
fn test_max_sum_window() {
    let trace = max_sum_window(&[2, 1, 5, 1, 3, 2], 3).expect("trace");
    let last = &trace.last().state;
    assert_eq!(last.best, Some(9));
    assert_eq!(last.best_start, Some(2));
}

#[test]
fn test_next_greater_element() {
    let trace = next_greater(&[1, 3, 2, 4]).expect("trace");

    let first = trace.first();
    assert_eq!(first.index, 0);
    assert_eq!(first.phase, StackPhase::Init);
    assert!(first.state.stack.is_empty());
    assert!(first.state.result.iter().all(Option::is_none));

    let last = trace.last();
    assert_eq!(last.phase, StackPhase::Done);
    assert_eq!(last.state.resolved(), Some(vec![3, 4, 4, -1]));
}

#[test]
fn test_next_greater_can_be_minus_one() {
    let trace = next_greater(&[-2, -1]).expect("trace");
    let assigns: Vec<_> = trace
        .iter()
        .filter(|step| step.phase == StackPhase::Assign)
        .collect();

    // scanned right to left: index 1 first, then index 0
    assert_eq!(assigns.len(), 2);
    assert!(assigns[0].explanation.starts_with("Stack is empty"));
    assert_eq!(assigns[1].state.stack, vec![-1]);
    assert_eq!(assigns[1].explanation, "result[0] = -1.");
    assert_eq!(trace.last().state.resolved(), Some(vec![-1, -1]));
}

#[test]
fn test_sum_subarray_minimums() {
    let trace = sum_subarray_minimums(&[3, 1, 2, 4]).expect("trace");
    assert_eq!(trace.last().state.total, 17);

    let trace = sum_subarray_minimums(&[11, 81, 94, 43, 3]).expect("trace");
    assert_eq!(trace.last().state.total, 444);
}

#[test]
fn test_binary_search_on_answer() {
    let ship = ship_within_days(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 5).expect("trace");
    assert_eq!(ship.last().state.lo, 15);

    let split = split_array_largest_sum(&[7, 2, 5, 10, 8], 2).expect("trace");
    assert_eq!(split.last().state.lo, 18);

    let koko = koko_eating_bananas(&[3, 6, 7, 11], 8).expect("trace");
    assert_eq!(koko.last().state.lo, 4);
}

#[test]
fn test_coin_change() {
    let trace = coin_change(&[1, 2, 5], 11).expect("trace");
    assert_eq!(trace.last().state.answer, Some(3));

    let trace = coin_change(&[2], 3).expect("trace");
    assert_eq!(trace.last().state.answer, Some(-1));
}

#[test]
fn test_knapsack_recovers_items() {
    let trace = knapsack(&[1, 3, 4, 5], &[1, 4, 5, 7], 7).expect("trace");
    let last = &trace.last().state;
    assert_eq!(last.table[4][7], Some(9));
    assert_eq!(last.chosen, vec![1, 2]);
}

#[test]
fn test_longest_common_subsequence() {
    let trace = longest_common_subsequence("abcde", "ace").expect("trace");
    assert_eq!(trace.last().state.subsequence.as_deref(), Some("ace"));
}

#[test]
fn test_dijkstra_distances_and_path() {
    let tuples = vec![
        vec![0, 1, 4],
        vec![0, 2, 1],
        vec![2, 1, 2],
        vec![1, 3, 1],
        vec![2, 3, 5],
        vec![3, 4, 3],
    ];
    let edges = build_edges(5, &tuples);
    let trace = dijkstra(5, &edges, 0).expect("trace");
    let last = &trace.last().state;
    assert_eq!(last.dist, vec![Some(0), Some(3), Some(1), Some(4), Some(7)]);
    assert_eq!(last.path_to(4), Some(vec![0, 2, 1, 3, 4]));
}

#[test]
fn test_topological_sort_and_cycle() {
    let tuples = vec![
        vec![5, 2],
        vec![5, 0],
        vec![4, 0],
        vec![4, 1],
        vec![2, 3],
        vec![3, 1],
    ];
    let edges = build_edges(6, &tuples);
    let trace = topological_sort(6, &edges).expect("trace");
    assert_eq!(trace.last().phase, TopoPhase::Done);
    assert_eq!(trace.last().state.order, vec![4, 5, 2, 0, 3, 1]);

    let edges = build_edges(3, &[vec![0, 1], vec![1, 2], vec![2, 1]]);
    let trace = topological_sort(3, &edges).expect("trace");
    assert_eq!(trace.last().phase, TopoPhase::Cycle);
    assert_eq!(trace.last().state.order, vec![0]);
}

#[test]
fn test_tree_recursion() {
    let depth = max_depth(&tree(&[Some(3), Some(9), Some(20), None, None, Some(15), Some(7)]))
        .expect("trace");
    assert_eq!(depth.last().state.answer, Some(Answer::Depth(3)));

    let slots = [
        Some(5),
        Some(4),
        Some(8),
        Some(11),
        None,
        Some(13),
        Some(4),
        Some(7),
        Some(2),
        None,
        None,
        None,
        Some(1),
    ];
    let found = path_sum(&tree(&slots), 22).expect("trace");
    assert_eq!(found.last().state.answer, Some(Answer::Found(true)));

    let missing = path_sum(&tree(&slots), 1000).expect("trace");
    assert_eq!(missing.last().state.answer, Some(Answer::Found(false)));

    let empty = max_depth(&tree(&[])).expect("trace");
    assert_eq!(empty.last().state.answer, Some(Answer::Depth(0)));
}

#[test]
fn test_sql_joins() {
    let left = vec![Row::new("1", "Ann"), Row::new("2", "Bob"), Row::new("3", "Cid")];
    let right = vec![
        Row::new("1", "Sales"),
        Row::new("3", "Ops"),
        Row::new("3", "HR"),
        Row::new("4", "Legal"),
    ];

    let counts: Vec<usize> = [JoinKind::Inner, JoinKind::Left, JoinKind::Right, JoinKind::Full]
        .into_iter()
        .map(|kind| {
            let trace = nested_loop_join(&left, &right, kind).expect("trace");
            trace.last().state.output.len()
        })
        .collect();
    assert_eq!(counts, vec![3, 4, 4, 5]);

    let trace = nested_loop_join(&left, &right, JoinKind::Left).expect("trace");
    let rows = trace.last().state.output_rows();
    assert_eq!(rows[1], ["2", "Bob", "NULL", "NULL"].map(String::from));
}

#[test]
fn test_null_keys_never_join() {
    let left = vec![Row::new("null", "a")];
    let right = vec![Row::new("null", "b")];
    let trace = nested_loop_join(&left, &right, JoinKind::Inner).expect("trace");
    assert!(trace.last().state.output.is_empty());
}

#[test]
fn test_generation_is_deterministic() {
    for note in notebook() {
        let input = note.default_input();
        let a = note.generate(&input).expect("default input generates");
        let b = note.generate(&input).expect("default input generates");
        assert_eq!(
            a.to_json().expect("serializes"),
            b.to_json().expect("serializes"),
            "{} is not deterministic",
            note.id()
        );
    }
}

#[test]
fn test_step_indices_are_sequential() {
    for note in notebook() {
        let trace = note.generate(&note.default_input()).expect("trace");
        for index in 0..trace.len() {
            let step = trace.step(index).expect("step in range");
            assert_eq!(step.index, index);
            assert_eq!(step.total, trace.len());
            assert!(!step.explanation.is_empty(), "{} step {} has no text", note.id(), index);
        }
        assert!(trace.step(trace.len()).is_none());
    }
}

#[test]
fn test_invalid_input_is_rejected() {
    let note = find("coin-change").expect("note exists");
    let mut input = note.default_input();
    input.set("amount", "lots").expect("field exists");
    assert!(note.generate(&input).is_err());

    assert!(input.set("nope", "1").is_err());
}

#[test]
fn test_boundary_inputs_still_record() {
    let empty = next_greater(&[]).expect("trace");
    assert!(empty.len() >= 1);
    assert_eq!(empty.first().phase, StackPhase::Init);
    assert_eq!(empty.last().state.resolved(), Some(vec![]));

    let single = next_greater(&[7]).expect("trace");
    assert_eq!(single.last().state.resolved(), Some(vec![-1]));

    let window = max_sum_window(&[], 3).expect("trace");
    assert_eq!(window.len(), 2);
    assert_eq!(window.last().state.best, None);

    let window = max_sum_window(&[4], 3).expect("trace");
    assert_eq!(window.last().state.k, 1);
    assert_eq!(window.last().state.best, Some(4));

    assert_eq!(sum_subarray_minimums(&[]).expect("trace").last().state.total, 0);
    assert_eq!(sum_subarray_minimums(&[5]).expect("trace").last().state.total, 5);

    let pack = knapsack(&[], &[], 5).expect("trace");
    assert_eq!(pack.last().state.table[0][5], Some(0));
    assert!(pack.last().state.chosen.is_empty());

    assert_eq!(coin_change(&[1, 2, 5], 0).expect("trace").last().state.answer, Some(0));

    for kind in [JoinKind::Inner, JoinKind::Left, JoinKind::Right, JoinKind::Full] {
        let join = nested_loop_join(&[], &[], kind).expect("trace");
        assert!(join.last().state.output.is_empty());
    }

    let path = dijkstra(1, &[], 0).expect("trace");
    assert_eq!(path.last().state.dist, vec![Some(0)]);

    let order = topological_sort(1, &[]).expect("trace");
    assert_eq!(order.last().phase, TopoPhase::Done);
    assert_eq!(order.last().state.order, vec![0]);

    let lcs = longest_common_subsequence("", "abc").expect("trace");
    assert_eq!(lcs.last().state.subsequence.as_deref(), Some(""));
}

#[test]
fn test_degenerate_field_values() {
    for note in notebook() {
        for field in note.fields() {
            for text in ["", "0", "1", "[]", "null"] {
                let mut input = note.default_input();
                input.set(field.key, text).expect("field exists");
                match note.generate(&input) {
                    Ok(trace) => {
                        assert!(
                            !trace.is_empty(),
                            "{} {}={:?} recorded nothing",
                            note.id(),
                            field.key,
                            text
                        );
                        assert!(trace.step(0).expect("first step").is_first());
                    }
                    Err(NoteError::Input(_)) => {}
                    Err(e) => panic!("{} {}={:?} failed: {}", note.id(), field.key, text, e),
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn generation_is_deterministic_for_any_input(
        note_index in 0usize..15,
        field_index in 0usize..3,
        text in "[-0-9a-c, \\[\\]]{0,24}",
    ) {
        let notes = notebook();
        let note = notes[note_index % notes.len()];
        let fields = note.fields();
        let field = &fields[field_index % fields.len()];

        let mut input = note.default_input();
        input.set(field.key, text.as_str()).expect("field exists");
        if let Ok(first) = note.generate(&input) {
            let second = note.generate(&input).expect("same input generates again");
            prop_assert!(first.len() >= 1);
            prop_assert_eq!(
                first.to_json().expect("serializes"),
                second.to_json().expect("serializes")
            );
        }
    }
}
