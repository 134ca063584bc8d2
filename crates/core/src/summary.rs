//! Frequency summaries behind the catalog charts.

use crate::constants::REACTION_SEPARATOR;
use crate::record::Table;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency {
    pub label: String,
    pub count: usize,
}

/// Most frequent adverse reactions.
///
/// Each present Adverse Reactions value is split on commas; tokens are trimmed and lowercased.
/// Rows without a value contribute nothing, but a blank token inside a value (`"Nausea,"`) is
/// counted under the empty label.
pub fn reaction_frequencies(table: &Table, limit: usize) -> Vec<Frequency> {
    let tokens = table
        .iter()
        .map(|record| record.adverse_reactions.as_str())
        .filter(|reactions| !reactions.is_empty())
        .flat_map(|reactions| reactions.split(REACTION_SEPARATOR))
        .map(|token| token.trim().to_lowercase());

    top_counts(tokens, limit)
}

/// Number of medications per class, ignoring rows without a class.
pub fn class_counts(table: &Table, limit: usize) -> Vec<Frequency> {
    let classes = table
        .iter()
        .map(|record| record.class.as_str())
        .filter(|class| !class.is_empty())
        .map(str::to_string);

    top_counts(classes, limit)
}

/// Counts labels, ordered by count descending then first appearance.
fn top_counts(labels: impl Iterator<Item = String>, limit: usize) -> Vec<Frequency> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for label in labels {
        let count = counts.entry(label.clone()).or_insert(0);
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }

    let mut frequencies: Vec<Frequency> = order
        .into_iter()
        .map(|label| Frequency {
            count: counts[&label],
            label,
        })
        .collect();
    // Stable sort keeps first-appearance order among equal counts.
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));
    frequencies.truncate(limit);
    frequencies
}
