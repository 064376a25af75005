use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Selection: which states the user picked
// ---------------------------------------------------------------------------

/// Distinct state names in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    states: Vec<String>,
}

impl Selection {
    /// Deduplicate, keeping the first occurrence of each name.
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let states = states
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| seen.insert(s.clone()))
            .collect();
        Selection { states }
    }

    /// The first `n` distinct states of the dataset, in load order.
    pub fn default_for(dataset: &Dataset, n: usize) -> Self {
        Selection::new(dataset.state_names().into_iter().take(n))
    }

    /// Keep only names the dataset actually contains.
    pub fn restricted_to(self, dataset: &Dataset) -> Self {
        Selection {
            states: self
                .states
                .into_iter()
                .filter(|s| dataset.contains_state(s))
                .collect(),
        }
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn contains(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// How many more states are needed to reach `minimum`, if any.
    pub fn shortfall(&self, minimum: usize) -> Option<usize> {
        (self.len() < minimum).then(|| minimum - self.len())
    }

    /// Copy with `state` added at the end or removed.
    pub fn toggled(&self, state: &str) -> Self {
        let mut states = self.states.clone();
        if let Some(pos) = states.iter().position(|s| s == state) {
            states.remove(pos);
        } else {
            states.push(state.to_string());
        }
        Selection { states }
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Return indices of records whose state is selected, in dataset order.
pub fn filtered_indices(dataset: &Dataset, selection: &Selection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.contains(&r.state))
        .map(|(i, _)| i)
        .collect()
}

/// Records whose state is selected, in dataset order.
pub fn filtered_records<'a>(dataset: &'a Dataset, selection: &Selection) -> Vec<&'a Record> {
    filtered_indices(dataset, selection)
        .into_iter()
        .map(|i| &dataset.records[i])
        .collect()
}
