//! Grouped summaries over loaded records.
//!
//! Groups come out in first-occurrence order so charts are deterministic
//! for a given input file. Sorting by value is an explicit, separate step.

use crate::types::{Field, Record};
use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// How a numeric field collapses within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Sum of the present values. A group with none sums to zero.
    Sum,
    /// Mean of the present values. Undefined for a group with none.
    Mean,
    /// First present value. Assumes the field is constant within the group.
    First,
}

/// Rules used for every state and phase summary.
pub const ELECTION_RULES: &[(Field, Rule)] = &[
    (Field::TotalElectors, Rule::Sum),
    (Field::PolledPct, Rule::Mean),
    (Field::TotalVotes, Rule::Sum),
    (Field::AmountSpent, Rule::First),
];

/// Rules used to total advertiser spend per page.
pub const AD_SPEND_RULES: &[(Field, Rule)] = &[
    (Field::AmountSpent, Rule::Sum),
    (Field::NumberOfAds, Rule::Sum),
];

/// Aggregated values of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    values: Vec<(Field, Option<f64>)>,
    rows: usize,
    inconsistent: Vec<Field>,
}

impl AggregateRecord {
    /// Wrap a single row without aggregating, keeping the fields named in `rules`.
    pub fn from_row<R: Record>(row: &R, rules: &[(Field, Rule)]) -> Self {
        AggregateRecord {
            values: rules.iter().map(|(f, _)| (*f, row.value(*f))).collect(),
            rows: 1,
            inconsistent: Vec::new(),
        }
    }

    /// Aggregated value of `field`; `None` when undefined or not aggregated.
    pub fn get(&self, field: Field) -> Option<f64> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, v)| *v)
    }

    /// Number of input rows folded into this record.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// `First` fields whose values disagreed within the group. The first
    /// value is kept regardless.
    pub fn inconsistent_fields(&self) -> &[Field] {
        &self.inconsistent
    }
}

#[derive(Default)]
struct FieldAcc {
    sum: f64,
    count: usize,
    first: Option<f64>,
    conflict: bool,
}

impl FieldAcc {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
        match self.first {
            None => self.first = Some(v),
            Some(f) if f != v => self.conflict = true,
            _ => {}
        }
    }

    fn finish(&self, rule: Rule) -> Option<f64> {
        match rule {
            Rule::Sum => Some(self.sum),
            Rule::Mean if self.count == 0 => None,
            Rule::Mean => Some(self.sum / self.count as f64),
            Rule::First => self.first,
        }
    }
}

struct GroupAcc {
    fields: Vec<FieldAcc>,
    rows: usize,
}

/// Ordered mapping from group key to its aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSummary<K: Eq + Hash> {
    groups: Vec<(K, AggregateRecord)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> GroupedSummary<K> {
    pub fn get(&self, key: &K) -> Option<&AggregateRecord> {
        self.index.get(key).map(|&i| &self.groups[i].1)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &AggregateRecord)> {
        self.groups.iter().map(|(k, r)| (k, r))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|(k, _)| k)
    }

    /// Groups sorted descending by `field`. The sort is stable, so ties keep
    /// first-occurrence order. Undefined values sort last.
    pub fn sorted_desc_by(&self, field: Field) -> Vec<(K, AggregateRecord)> {
        let mut rows = self.groups.clone();
        rows.sort_by(|a, b| cmp_desc(a.1.get(field), b.1.get(field)));
        rows
    }
}

fn cmp_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Partition `rows` by `key_fn` and collapse each group with `rules`.
///
/// Missing values are skipped by every rule. An empty input yields an
/// empty summary.
pub fn aggregate<R, K, F>(rows: &[R], key_fn: F, rules: &[(Field, Rule)]) -> GroupedSummary<K>
where
    R: Record,
    K: Eq + Hash + Clone + Debug,
    F: Fn(&R) -> K,
{
    let mut keys: Vec<K> = Vec::new();
    let mut accs: Vec<GroupAcc> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for row in rows {
        let key = key_fn(row);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                let i = keys.len();
                index.insert(key.clone(), i);
                keys.push(key);
                accs.push(GroupAcc {
                    fields: rules.iter().map(|_| FieldAcc::default()).collect(),
                    rows: 0,
                });
                i
            }
        };
        let acc = &mut accs[slot];
        acc.rows += 1;
        for (fa, (field, _)) in acc.fields.iter_mut().zip(rules) {
            if let Some(v) = row.value(*field) {
                fa.push(v);
            }
        }
    }

    let groups: Vec<(K, AggregateRecord)> = keys
        .into_iter()
        .zip(accs)
        .map(|(key, acc)| {
            let mut inconsistent = Vec::new();
            let values = acc
                .fields
                .iter()
                .zip(rules)
                .map(|(fa, (field, rule))| {
                    if *rule == Rule::First && fa.conflict {
                        warn!(
                            "{:?}: '{}' differs within group, keeping first value",
                            key,
                            field.column()
                        );
                        inconsistent.push(*field);
                    }
                    (*field, fa.finish(*rule))
                })
                .collect();
            (
                key,
                AggregateRecord {
                    values,
                    rows: acc.rows,
                    inconsistent,
                },
            )
        })
        .collect();

    debug!("Aggregated {} rows into {} groups", rows.len(), groups.len());
    GroupedSummary { groups, index }
}

/// Split `rows` into owned subsets by key, for drill-down lookups.
pub fn partition<R, K, F>(rows: &[R], key_fn: F) -> HashMap<K, Vec<R>>
where
    R: Clone,
    K: Eq + Hash,
    F: Fn(&R) -> K,
{
    let mut subsets: HashMap<K, Vec<R>> = HashMap::new();
    for row in rows {
        subsets.entry(key_fn(row)).or_default().push(row.clone());
    }
    subsets
}

/// The `n` largest groups by `sort_field`, descending. Ties keep
/// first-occurrence order.
pub fn top_n<R, K, F>(
    rows: &[R],
    key_fn: F,
    rules: &[(Field, Rule)],
    sort_field: Field,
    n: usize,
) -> Vec<(K, AggregateRecord)>
where
    R: Record,
    K: Eq + Hash + Clone + Debug,
    F: Fn(&R) -> K,
{
    let mut ranked = aggregate(rows, key_fn, rules).sorted_desc_by(sort_field);
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AdRecord, ElectionRecord};
    use pretty_assertions::assert_eq;

    fn election(state: &str, electors: u64, polled: f64, votes: u64) -> ElectionRecord {
        ElectionRecord {
            state: state.to_string(),
            constituency: format!("{}-{}", state, electors),
            phase: "1".to_string(),
            total_electors: Some(electors),
            polled_pct: Some(polled),
            total_votes: Some(votes),
            amount_spent: None,
        }
    }

    fn ad(page: &str, spend: f64) -> AdRecord {
        AdRecord {
            page_name: page.to_string(),
            amount_spent: Some(spend),
            number_of_ads: Some(1),
        }
    }

    fn state_key(r: &ElectionRecord) -> String {
        r.state.clone()
    }

    #[test]
    fn test_aggregate_by_state() {
        let rows = vec![
            election("A", 100, 50.0, 50),
            election("A", 200, 70.0, 140),
            election("B", 300, 60.0, 180),
        ];
        let rules = &[
            (Field::TotalElectors, Rule::Sum),
            (Field::PolledPct, Rule::Mean),
            (Field::TotalVotes, Rule::Sum),
        ];
        let summary = aggregate(&rows, state_key, rules);

        assert_eq!(summary.keys().cloned().collect::<Vec<_>>(), vec!["A", "B"]);
        let a = summary.get(&"A".to_string()).unwrap();
        assert_eq!(a.get(Field::TotalElectors), Some(300.0));
        assert_eq!(a.get(Field::PolledPct), Some(60.0));
        assert_eq!(a.get(Field::TotalVotes), Some(190.0));
        assert_eq!(a.rows(), 2);
        let b = summary.get(&"B".to_string()).unwrap();
        assert_eq!(b.get(Field::TotalElectors), Some(300.0));
        assert_eq!(b.get(Field::PolledPct), Some(60.0));
        assert_eq!(b.get(Field::TotalVotes), Some(180.0));
    }

    #[test]
    fn test_constant_key_conserves_sums() {
        let rows = vec![
            election("A", 100, 50.0, 50),
            election("B", 250, 70.0, 140),
            election("C", 300, 60.0, 180),
            election("A", 7, 10.0, 1),
        ];
        let summary = aggregate(&rows, |_| (), ELECTION_RULES);
        assert_eq!(summary.len(), 1);
        let total = summary.get(&()).unwrap();

        let electors: u64 = rows.iter().filter_map(|r| r.total_electors).sum();
        let votes: u64 = rows.iter().filter_map(|r| r.total_votes).sum();
        assert_eq!(total.get(Field::TotalElectors), Some(electors as f64));
        assert_eq!(total.get(Field::TotalVotes), Some(votes as f64));
        assert_eq!(total.rows(), rows.len());
    }

    #[test]
    fn test_missing_values_are_excluded() {
        let mut gap = election("A", 0, 0.0, 0);
        gap.total_electors = None;
        gap.polled_pct = None;
        let rows = vec![election("A", 100, 40.0, 10), gap];
        let summary = aggregate(&rows, state_key, ELECTION_RULES);
        let a = summary.get(&"A".to_string()).unwrap();
        // mean over the single present value, not (40 + 0) / 2
        assert_eq!(a.get(Field::PolledPct), Some(40.0));
        assert_eq!(a.get(Field::TotalElectors), Some(100.0));
        assert_eq!(a.rows(), 2);
    }

    #[test]
    fn test_mean_without_values_is_undefined() {
        let mut row = election("A", 100, 0.0, 10);
        row.polled_pct = None;
        let summary = aggregate(&[row], state_key, ELECTION_RULES);
        let a = summary.get(&"A".to_string()).unwrap();
        assert_eq!(a.get(Field::PolledPct), None);
        assert_eq!(a.get(Field::AmountSpent), None);
        assert_eq!(a.get(Field::TotalElectors), Some(100.0));
    }

    #[test]
    fn test_first_keeps_first_value_and_flags_disagreement() {
        let mut one = election("A", 1, 1.0, 1);
        one.amount_spent = Some(500.0);
        let mut two = election("A", 2, 2.0, 2);
        two.amount_spent = Some(900.0);
        let mut three = election("B", 3, 3.0, 3);
        three.amount_spent = Some(42.0);

        let summary = aggregate(&[one, two, three], state_key, ELECTION_RULES);
        let a = summary.get(&"A".to_string()).unwrap();
        assert_eq!(a.get(Field::AmountSpent), Some(500.0));
        assert_eq!(a.inconsistent_fields(), &[Field::AmountSpent]);
        let b = summary.get(&"B".to_string()).unwrap();
        assert!(b.inconsistent_fields().is_empty());
    }

    #[test]
    fn test_first_skips_leading_missing_value() {
        let one = election("A", 1, 1.0, 1);
        let mut two = election("A", 2, 2.0, 2);
        two.amount_spent = Some(75.0);
        let summary = aggregate(&[one, two], state_key, ELECTION_RULES);
        assert_eq!(
            summary.get(&"A".to_string()).unwrap().get(Field::AmountSpent),
            Some(75.0)
        );
    }

    #[test]
    fn test_empty_input_gives_empty_summary() {
        let rows: Vec<ElectionRecord> = Vec::new();
        let summary = aggregate(&rows, state_key, ELECTION_RULES);
        assert!(summary.is_empty());
        assert!(top_n(&rows, state_key, ELECTION_RULES, Field::TotalVotes, 5).is_empty());
    }

    #[test]
    fn test_top_n_ties_keep_first_occurrence() {
        let rows = vec![ad("X", 100.0), ad("Y", 300.0), ad("Z", 300.0)];
        let top = top_n(
            &rows,
            |r: &AdRecord| r.page_name.clone(),
            AD_SPEND_RULES,
            Field::AmountSpent,
            2,
        );
        let got: Vec<(String, Option<f64>)> = top
            .iter()
            .map(|(k, r)| (k.clone(), r.get(Field::AmountSpent)))
            .collect();
        // Y and Z tie on 300; Y appears first in the input, so it ranks first.
        assert_eq!(
            got,
            vec![("Y".to_string(), Some(300.0)), ("Z".to_string(), Some(300.0))]
        );
    }

    #[test]
    fn test_top_n_length_and_order() {
        let rows = vec![
            ad("P", 5.0),
            ad("Q", 50.0),
            ad("P", 100.0),
            ad("R", 20.0),
            ad("Q", 1.0),
        ];
        for n in 0..6 {
            let top = top_n(
                &rows,
                |r: &AdRecord| r.page_name.clone(),
                AD_SPEND_RULES,
                Field::AmountSpent,
                n,
            );
            assert_eq!(top.len(), n.min(3));
            let values: Vec<f64> = top
                .iter()
                .filter_map(|(_, r)| r.get(Field::AmountSpent))
                .collect();
            assert!(values.windows(2).all(|w| w[0] >= w[1]));
        }
        let top = top_n(
            &rows,
            |r: &AdRecord| r.page_name.clone(),
            AD_SPEND_RULES,
            Field::AmountSpent,
            3,
        );
        assert_eq!(top[0].0, "P");
        assert_eq!(top[0].1.get(Field::AmountSpent), Some(105.0));
        assert_eq!(top[0].1.get(Field::NumberOfAds), Some(2.0));
    }

    #[test]
    fn test_partition_keeps_every_row_once() {
        let rows = vec![
            election("A", 1, 1.0, 1),
            election("B", 2, 2.0, 2),
            election("A", 3, 3.0, 3),
        ];
        let subsets = partition(&rows, state_key);
        assert_eq!(subsets.len(), 2);
        assert_eq!(subsets["A"].len(), 2);
        assert_eq!(subsets["A"][1].total_electors, Some(3));
        assert_eq!(subsets.values().map(Vec::len).sum::<usize>(), rows.len());
    }

    #[test]
    fn test_undefined_values_sort_last() {
        let mut blank = ad("B", 0.0);
        blank.amount_spent = None;
        let rows = vec![blank, ad("A", 1.0)];
        let summary = aggregate(&rows, |r: &AdRecord| r.page_name.clone(), &[(Field::AmountSpent, Rule::First)]);
        let sorted = summary.sorted_desc_by(Field::AmountSpent);
        assert_eq!(sorted[0].0, "A");
        assert_eq!(sorted[1].0, "B");
    }
}
