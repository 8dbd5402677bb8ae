//! Canonical ingredient-multiset encoding.
//!
//! Each entry serializes as `!<base36 item id>*<count>,`. The `!`
//! prefix and `*` terminator bracket the item id on both sides, so no
//! item id's encoding can appear as a substring of another entry's id
//! position. The deriver's consumer search relies on that property.
//!
//! Encoding is canonical: entries are aggregated by item id and ordered
//! by descending count, ties by ascending item id. Two multisets are
//! equal exactly when their encodings are byte-equal.

use std::collections::HashMap;

use crate::error::{FlipError, Result};
use crate::model::Ingredient;

const BASE36_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Encode an integer as an uppercase base-36 string.
pub fn base36_encode(mut number: u32) -> String {
    if number == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while number != 0 {
        digits.push(BASE36_ALPHABET[(number % 36) as usize]);
        number /= 36;
    }
    digits.reverse();
    // digits are drawn from the ASCII alphabet above
    String::from_utf8(digits).unwrap()
}

fn base36_decode(text: &str) -> Result<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FlipError::MalformedEncoding(format!(
            "bad base36 item id {text:?}"
        )));
    }
    u32::from_str_radix(text, 36)
        .map_err(|_| FlipError::MalformedEncoding(format!("bad base36 item id {text:?}")))
}

fn entry_string(item_id: u32, count: u32) -> String {
    format!("!{}*{},", base36_encode(item_id), count)
}

/// The substring that matches every encoded entry for `item_id`,
/// regardless of count. Used to find recipes consuming an item.
pub fn output_token(item_id: u32) -> String {
    format!("!{}*", base36_encode(item_id))
}

/// Sum duplicate item ids and sort into canonical order.
pub fn aggregate(entries: &[Ingredient]) -> Vec<Ingredient> {
    let mut counts: HashMap<u32, u64> = HashMap::new();
    for ing in entries {
        *counts.entry(ing.item_id).or_default() += ing.count as u64;
    }
    let mut aggregated: Vec<Ingredient> = counts
        .into_iter()
        .map(|(item_id, count)| Ingredient::new(item_id, count.min(u32::MAX as u64) as u32))
        .collect();
    aggregated.sort_by(|a, b| b.count.cmp(&a.count).then(a.item_id.cmp(&b.item_id)));
    aggregated
}

/// Canonical string for an ingredient multiset. Aggregates first, so
/// the input may carry duplicate item ids.
pub fn encode(entries: &[Ingredient]) -> String {
    aggregate(entries)
        .iter()
        .map(|ing| entry_string(ing.item_id, ing.count))
        .collect()
}

/// Decode a canonical ingredient string back into an aggregated
/// multiset. Any grammar violation is fatal: a malformed string means
/// an upstream invariant was broken, not a recoverable condition.
pub fn decode(text: &str) -> Result<Vec<Ingredient>> {
    let mut entries = Vec::new();
    let body = text.strip_suffix(',').unwrap_or(text);
    if body.is_empty() {
        return Ok(entries);
    }
    for component in body.split(',') {
        let Some(component) = component.strip_prefix('!') else {
            return Err(FlipError::MalformedEncoding(format!(
                "entry {component:?} does not start with '!'"
            )));
        };
        let Some((id_part, count_part)) = component.split_once('*') else {
            return Err(FlipError::MalformedEncoding(format!(
                "entry !{component:?} has no '*' separator"
            )));
        };
        let item_id = base36_decode(id_part)?;
        let count: u32 = count_part.parse().map_err(|_| {
            FlipError::MalformedEncoding(format!("bad count {count_part:?}"))
        })?;
        if count == 0 {
            return Err(FlipError::MalformedEncoding(format!(
                "zero count for item {item_id}"
            )));
        }
        entries.push(Ingredient::new(item_id, count));
    }
    Ok(aggregate(&entries))
}

/// Union-aggregate several multisets, dropping every entry for
/// `exclude`. The deriver uses this to fold a component recipe into a
/// product recipe while conserving the intermediate item exactly.
pub fn combine(lists: &[&[Ingredient]], exclude: Option<u32>) -> Vec<Ingredient> {
    let mut merged = Vec::new();
    for list in lists {
        for ing in *list {
            if Some(ing.item_id) != exclude {
                merged.push(*ing);
            }
        }
    }
    aggregate(&merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_round_trip() {
        for n in [0, 1, 35, 36, 12157, u32::MAX] {
            assert_eq!(base36_decode(&base36_encode(n)).unwrap(), n);
        }
        assert_eq!(base36_encode(35), "Z");
        assert_eq!(base36_encode(36), "10");
    }

    #[test]
    fn token_brackets_the_id() {
        // "1" must not match inside "10"
        let haystack = encode(&[Ingredient::new(36, 4)]);
        assert!(!haystack.contains(&output_token(1)));
        assert!(haystack.contains(&output_token(36)));
    }
}
