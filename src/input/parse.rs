//! Lenient parsers for user-typed inputs
//!
//! Malformed fragments are dropped rather than reported; only inputs that
//! leave nothing usable turn into an [`InputError`].

use crate::errors::InputError;

/// Split on commas and whitespace, ignoring surrounding brackets
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .map(|t| t.trim_matches(|c| c == '[' || c == ']'))
        .filter(|t| !t.is_empty())
}

/// Parse a list of integers.
///
/// Non-numeric tokens are dropped, values are clamped into `[min, max]` and
/// the list is cut to `max_len`.
pub fn numbers(
    field: &'static str,
    text: &str,
    min_len: usize,
    max_len: usize,
    min: i64,
    max: i64,
) -> Result<Vec<i64>, InputError> {
    let values: Vec<i64> = tokens(text)
        .filter_map(|t| t.parse::<i64>().ok())
        .map(|v| v.clamp(min, max))
        .take(max_len)
        .collect();

    if values.len() < min_len {
        return Err(InputError::TooFew {
            field,
            min: min_len,
            got: values.len(),
        });
    }
    Ok(values)
}

/// Parse a single integer, clamping it into `[min, max]`
pub fn number(field: &'static str, text: &str, min: i64, max: i64) -> Result<i64, InputError> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .map(|v| v.clamp(min, max))
        .map_err(|_| InputError::NotANumber {
            field,
            text: trimmed.to_string(),
        })
}

/// Trim and cut a string to `max_len` characters
pub fn text(raw: &str, max_len: usize) -> String {
    raw.trim().chars().take(max_len).collect()
}

/// Extract `[a,b,...]` groups holding exactly `arity` tokens.
///
/// Unterminated groups, groups of the wrong arity and text outside of
/// brackets are ignored.
pub fn tuples(raw: &str, arity: usize, max_len: usize) -> Vec<Vec<String>> {
    let mut groups = Vec::new();
    let mut rest = raw;

    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            break;
        };
        let body = &after[..close];
        rest = &after[close + 1..];

        // nested '[' means the previous group was never closed
        let body = match body.rfind('[') {
            Some(inner) => &body[inner + 1..],
            None => body,
        };

        let group: Vec<String> = body
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if group.len() == arity {
            groups.push(group);
        }
        if groups.len() == max_len {
            break;
        }
    }

    groups
}

/// Like [`tuples`], but also drops groups containing non-integers
pub fn int_tuples(raw: &str, arity: usize, max_len: usize) -> Vec<Vec<i64>> {
    tuples(raw, arity, usize::MAX)
        .into_iter()
        .filter_map(|group| {
            group
                .iter()
                .map(|t| t.parse::<i64>().ok())
                .collect::<Option<Vec<i64>>>()
        })
        .take(max_len)
        .collect()
}

/// Parse a level-order tree listing where `null` marks a missing child
pub fn level_order(raw: &str, max_nodes: usize, min: i64, max: i64) -> Vec<Option<i64>> {
    tokens(raw)
        .filter_map(|t| {
            if t.eq_ignore_ascii_case("null") || t.eq_ignore_ascii_case("none") || t == "#" {
                Some(None)
            } else {
                t.parse::<i64>().ok().map(|v| Some(v.clamp(min, max)))
            }
        })
        .take(max_nodes)
        .collect()
}

/// Case-insensitive lookup of `raw` in `options`
pub fn choice(
    field: &'static str,
    raw: &str,
    options: &'static [&'static str],
) -> Result<&'static str, InputError> {
    let trimmed = raw.trim();
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(trimmed))
        .copied()
        .ok_or_else(|| InputError::UnknownChoice {
            field,
            text: trimmed.to_string(),
            options: options.join("|"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_drops_garbage_and_clamps() {
        let values = numbers("nums", "1, x, 300, -7 4", 0, 20, 0, 100).unwrap();
        assert_eq!(values, vec![1, 100, 0, 4]);
    }

    #[test]
    fn test_numbers_accepts_brackets() {
        let values = numbers("nums", "[1,3,2,4]", 0, 20, -100, 100).unwrap();
        assert_eq!(values, vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_numbers_truncates() {
        let values = numbers("nums", "1 2 3 4 5", 0, 3, 0, 10).unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_numbers_too_few() {
        let err = numbers("weights", "a, b", 1, 10, 0, 10).unwrap_err();
        assert_eq!(
            err,
            InputError::TooFew {
                field: "weights",
                min: 1,
                got: 0
            }
        );
    }

    #[test]
    fn test_number_rejects_text_and_clamps() {
        assert!(matches!(
            number("days", "abc", 1, 10),
            Err(InputError::NotANumber { .. })
        ));
        assert_eq!(number("days", " 42 ", 1, 10).unwrap(), 10);
    }

    #[test]
    fn test_tuples_skip_malformed_groups() {
        let groups = int_tuples("[0,1,4], [1,2], [x,2,3], [2,3,1] [3,", 3, 10);
        assert_eq!(groups, vec![vec![0, 1, 4], vec![2, 3, 1]]);
    }

    #[test]
    fn test_tuples_recover_after_unclosed_group() {
        let groups = tuples("[1,Ann [2,Bob]", 2, 10);
        assert_eq!(groups, vec![vec!["2".to_string(), "Bob".to_string()]]);
    }

    #[test]
    fn test_level_order() {
        let nodes = level_order("3,9,20,null,null,15,7", 15, -99, 99);
        assert_eq!(
            nodes,
            vec![Some(3), Some(9), Some(20), None, None, Some(15), Some(7)]
        );
    }

    #[test]
    fn test_choice_is_case_insensitive() {
        const KINDS: &[&str] = &["inner", "left"];
        assert_eq!(choice("kind", " LEFT ", KINDS).unwrap(), "left");
        assert!(choice("kind", "cross", KINDS).is_err());
    }
}
