//! Recommended column ordering
//!
//! A [`LayoutStrategy`] decides where each column goes; [`recommend_with`]
//! validates its input and output and turns the order into 1-based ranks.

use std::cmp::Reverse;

use ahash::{AHashMap, AHashSet};

use crate::column::ColumnDescriptor;
use crate::error::LayoutError;

/// Produces a column order for one table.
pub trait LayoutStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns a permutation of `0..columns.len()`: entry `i` is the index of
    /// the input column placed at position `i`. Must not depend on anything
    /// but `columns`.
    fn order(&self, columns: &[ColumnDescriptor]) -> Vec<usize>;
}

/// Greedy "largest alignment first" heuristic, the classic struct field
/// ordering rule. Variable-length columns go after every fixed one. The sort
/// is stable, so columns with equal alignment keep their declared order.
///
/// Not optimal for every size/alignment mix; swap in another strategy when
/// that matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescendingAlignment;

impl LayoutStrategy for DescendingAlignment {
    fn name(&self) -> &'static str {
        "descending-alignment"
    }

    fn order(&self, columns: &[ColumnDescriptor]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..columns.len()).collect();
        order.sort_by_key(|&idx| Reverse(columns[idx].type_alignment.placement_key()));
        order
    }
}

/// Column name to recommended 1-based position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankMap {
    ranks: AHashMap<String, usize>,
}

impl RankMap {
    #[inline]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.ranks.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Outcome of running a strategy over one table.
#[derive(Debug, Clone)]
pub struct Recommendation {
    strategy: &'static str,
    order: Vec<usize>,
    ranks: RankMap,
}

impl Recommendation {
    pub fn strategy(&self) -> &'static str {
        self.strategy
    }

    /// Input indices in recommended order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    #[inline]
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.ranks.get(name)
    }

    /// `columns` (the slice this recommendation was computed for) in
    /// recommended order.
    pub fn ordered<'a>(&self, columns: &'a [ColumnDescriptor]) -> Vec<&'a ColumnDescriptor> {
        self.order
            .iter()
            .filter_map(|&idx| columns.get(idx))
            .collect()
    }

    pub fn into_ranks(self) -> RankMap {
        self.ranks
    }
}

/// Ranks `columns` with the default [`DescendingAlignment`] heuristic.
pub fn recommend(columns: &[ColumnDescriptor]) -> Result<RankMap, LayoutError> {
    recommend_with(columns, &DescendingAlignment).map(Recommendation::into_ranks)
}

pub fn recommend_with(
    columns: &[ColumnDescriptor],
    strategy: &dyn LayoutStrategy,
) -> Result<Recommendation, LayoutError> {
    ensure_unique_names(columns)?;

    let order = strategy.order(columns);
    if !is_permutation(&order, columns.len()) {
        return Err(LayoutError::InvalidPermutation {
            strategy: strategy.name(),
            columns: columns.len(),
        });
    }

    let ranks = order
        .iter()
        .enumerate()
        .map(|(position, &idx)| (columns[idx].name.clone(), position + 1))
        .collect();

    Ok(Recommendation {
        strategy: strategy.name(),
        order,
        ranks: RankMap { ranks },
    })
}

pub(crate) fn ensure_unique_names(columns: &[ColumnDescriptor]) -> Result<(), LayoutError> {
    let mut seen = AHashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.name.as_str()) {
            return Err(LayoutError::DuplicateColumn {
                name: column.name.clone(),
            });
        }
    }
    Ok(())
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    order.iter().all(|&idx| match seen.get_mut(idx) {
        Some(slot) if !*slot => {
            *slot = true;
            true
        }
        _ => false,
    })
}
