//! Pairwise Jaccard similarity between reviewers.
//!
//! The matrix is indexed by a fixed reviewer ordering; row `i` and column `i`
//! both refer to `users[i]`. Downstream graph builders rely on that ordering
//! to map cells back to reviewer nodes.

pub mod cache;

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{RevgraphError, RevgraphResult};

pub use cache::SimilarityCache;

/// Mapping from reviewer id to the set of products that reviewer reviewed.
///
/// Built once per run from relational rows and not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProducts {
    map: BTreeMap<String, BTreeSet<String>>,
}

impl UserProducts {
    /// Group `(reviewer, product)` pairs. Duplicate pairs collapse.
    pub fn from_pairs<I, U, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (user, product) in pairs {
            map.entry(user.into()).or_default().insert(product.into());
        }
        Self { map }
    }

    /// Unique reviewers in sorted order. This is the ordering used for
    /// matrix indices throughout a run.
    pub fn users(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    pub fn products(&self, user: &str) -> Option<&BTreeSet<String>> {
        self.map.get(user)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Jaccard index `|a ∩ b| / |a ∪ b|`.
///
/// Two empty sets have no overlap, so the result is 0.0 rather than NaN.
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Square similarity matrix over an ordered reviewer list.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    users: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Compute every ordered pair `(i, j)`, including the diagonal.
    pub fn compute(input: &UserProducts, users: &[String]) -> RevgraphResult<Self> {
        let sets = users
            .iter()
            .map(|u| {
                input
                    .products(u)
                    .ok_or_else(|| RevgraphError::UnknownEntity(u.clone()))
            })
            .collect::<RevgraphResult<Vec<_>>>()?;

        let values = sets
            .iter()
            .map(|a| sets.iter().map(|b| jaccard(a, b)).collect())
            .collect();

        Ok(Self { users: users.to_vec(), values })
    }

    /// Wrap already-computed values. Fails unless `values` is `users.len()` square.
    pub fn from_values(users: Vec<String>, values: Vec<Vec<f64>>) -> RevgraphResult<Self> {
        let n = users.len();
        if values.len() != n {
            return Err(RevgraphError::MatrixShape(format!(
                "expected {} rows, found {}",
                n,
                values.len()
            )));
        }
        if let Some((i, row)) = values.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(RevgraphError::MatrixShape(format!(
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                n
            )));
        }
        Ok(Self { users, values })
    }

    pub fn dimension(&self) -> usize {
        self.users.len()
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Off-diagonal cells as `(from, to, similarity)`, row-major.
    pub fn off_diagonal(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.values.iter().enumerate().flat_map(move |(i, row)| {
            row.iter()
                .enumerate()
                .filter(move |(j, _)| *j != i)
                .map(move |(j, v)| (self.users[i].as_str(), self.users[j].as_str(), *v))
        })
    }
}
