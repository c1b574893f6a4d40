// Stract is an open source web search engine.
// Copyright (C) 2023 Stract ApS
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::cluster::{Cluster, ClusterSet};
use crate::clusterer::Clusterer;
use crate::document::DocumentSource;
use crate::error::{Error, Result};
use crate::freq::TermListGroup;
use crate::point::{Centroid, Point};
use crate::similarity::{CosineDistance, Similarity};

/// Safety cap on iterations regardless of `max_iters`, since `max_iters ==
/// 0` means "no cap".
pub const KMEANS_HARD_ITER_CAP: usize = 100;

/// How the initial `k` centroids are chosen.
#[derive(Debug, Clone, Default)]
pub enum Seeding {
    /// The first `k` points of the document source, in order. Simplest,
    /// fully deterministic; the default.
    #[default]
    FirstK,
    /// A uniformly random choice of `k` distinct points, seeded for
    /// reproducibility.
    Random { seed: u64 },
    /// An explicit, caller-chosen set of `k` document indices into the
    /// source, in seed order. Useful for reproducing a known-good
    /// clustering or for tests that need a specific starting point.
    Indices(Vec<usize>),
}

#[derive(Debug, Clone)]
pub struct KMeansConfig {
    pub k: usize,
    /// `0` means uncapped, subject to [`KMEANS_HARD_ITER_CAP`].
    pub max_iters: usize,
    pub seed: Seeding,
}

impl KMeansConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iters: 0,
            seed: Seeding::FirstK,
        }
    }

    pub fn max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn seed(mut self, seed: Seeding) -> Self {
        self.seed = seed;
        self
    }
}

/// Iterative assign-then-update clustering with a fixed cluster count.
pub struct KMeans {
    config: KMeansConfig,
    similarity: CosineDistance,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self::with_config(KMeansConfig::new(k))
    }

    pub fn with_config(config: KMeansConfig) -> Self {
        Self {
            config,
            similarity: CosineDistance,
        }
    }

    fn seed_indices(&self, points: &[Point]) -> Vec<usize> {
        match &self.config.seed {
            Seeding::FirstK => (0..self.config.k).collect(),
            Seeding::Random { seed } => {
                use rand::seq::SliceRandom;
                use rand::SeedableRng;

                let mut rng = rand::rngs::StdRng::seed_from_u64(*seed);
                let mut indices: Vec<usize> = (0..points.len()).collect();
                indices.shuffle(&mut rng);
                indices.truncate(self.config.k);
                indices
            }
            Seeding::Indices(indices) => indices.clone(),
        }
    }

    /// Assigns every point to the cluster with maximum similarity to its
    /// current centroid. Ties go to the lowest-index cluster.
    fn assign(&self, points: &[Point], set: &ClusterSet) -> Vec<usize> {
        points
            .iter()
            .map(|point| {
                let mut best = 0;
                let mut best_sim = f64::NEG_INFINITY;
                for (i, cluster) in set.iter().enumerate() {
                    let sim = self.similarity.similarity(point, cluster.get_centroid());
                    if sim > best_sim {
                        best_sim = sim;
                        best = i;
                    }
                }
                best
            })
            .collect()
    }
}

impl Clusterer for KMeans {
    fn cluster(&self, source: &mut dyn DocumentSource) -> Result<ClusterSet> {
        let k = self.config.k;
        if k == 0 {
            return Err(Error::InvalidArgument("k must be greater than 0".into()));
        }

        let (tlg, docs) = TermListGroup::build(source);
        if docs.is_empty() {
            return Err(Error::InvalidArgument(
                "document source must not be empty".into(),
            ));
        }
        if k > docs.len() {
            return Err(Error::InvalidArgument(format!(
                "k ({k}) exceeds document count ({})",
                docs.len()
            )));
        }

        let points: Vec<Point> = docs
            .into_iter()
            .map(|doc| Point::initialize(&tlg, doc))
            .collect();

        let mut set = ClusterSet::new();
        for &seed in &self.seed_indices(&points) {
            let mut cluster = Cluster::new();
            let mut centroid = Centroid::empty();
            centroid.set_to_point(&points[seed]);
            cluster.set_centroid(centroid);
            set.add_cluster(cluster);
        }

        let cap = if self.config.max_iters == 0 {
            KMEANS_HARD_ITER_CAP
        } else {
            self.config.max_iters.min(KMEANS_HARD_ITER_CAP)
        };

        let mut assignment: Vec<usize> = vec![usize::MAX; points.len()];
        let mut iterations = 0;

        loop {
            let new_assignment = self.assign(&points, &set);
            let changed = new_assignment != assignment;

            set.clear_clusters();
            for (point, &cluster_idx) in points.iter().zip(new_assignment.iter()) {
                set.add_to_cluster(point.clone(), cluster_idx)?;
            }

            for i in 0..set.size() {
                if set.get_cluster(i)?.size() > 0 {
                    set.get_cluster_mut(i)?.recalculate();
                }
            }

            assignment = new_assignment;
            iterations += 1;

            tracing::debug!(iterations, changed, "kmeans iteration");

            if !changed || iterations >= cap {
                break;
            }
        }

        tracing::info!(
            iterations,
            converged = iterations < cap,
            "kmeans finished"
        );

        Ok(set)
    }

    fn description(&self) -> &'static str {
        "KMeans Clusterer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InMemoryDocumentSource;
    use crate::term::Term;

    fn doc(terms: &[&str]) -> Vec<(Term, u32)> {
        terms.iter().map(|t| ((*t).into(), 1u32)).collect()
    }

    #[test]
    fn empty_source_is_invalid_argument() {
        let mut source = InMemoryDocumentSource::new(vec![]);
        let err = KMeans::new(3).cluster(&mut source).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn k_greater_than_mset_is_invalid_argument() {
        let mut source = InMemoryDocumentSource::new(vec![doc(&["a"]), doc(&["b"])]);
        let err = KMeans::new(5).cluster(&mut source).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn k_zero_is_invalid_argument() {
        let mut source = InMemoryDocumentSource::new(vec![doc(&["a"])]);
        let err = KMeans::new(0).cluster(&mut source).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn two_well_separated_pairs_converge_in_at_most_two_iterations() {
        let mut source = InMemoryDocumentSource::new(vec![
            doc(&["a", "b"]),
            doc(&["a", "b"]),
            doc(&["c", "d"]),
            doc(&["c", "d"]),
        ]);

        let set = KMeans::with_config(
            KMeansConfig::new(2)
                .max_iters(50)
                .seed(Seeding::Indices(vec![0, 2])),
        )
        .cluster(&mut source)
        .unwrap();

        assert_eq!(set.size(), 2);

        let cluster0_ids: Vec<_> = set
            .get_cluster(0)
            .unwrap()
            .get_documents()
            .iter()
            .map(|d| d.id())
            .collect();
        let cluster1_ids: Vec<_> = set
            .get_cluster(1)
            .unwrap()
            .get_documents()
            .iter()
            .map(|d| d.id())
            .collect();

        let mut cluster0_sorted = cluster0_ids.clone();
        cluster0_sorted.sort();
        let mut cluster1_sorted = cluster1_ids.clone();
        cluster1_sorted.sort();

        assert_eq!(cluster0_sorted, vec![0, 1]);
        assert_eq!(cluster1_sorted, vec![2, 3]);
    }

    #[test]
    fn every_document_appears_in_exactly_one_cluster() {
        let mut source = InMemoryDocumentSource::new(vec![
            doc(&["a"]),
            doc(&["b"]),
            doc(&["c"]),
            doc(&["a", "b"]),
            doc(&["c", "a"]),
        ]);
        let set = KMeans::new(2).cluster(&mut source).unwrap();

        let total: usize = set.iter().map(|c| c.size()).sum();
        assert_eq!(total, 5);

        let mut seen = std::collections::HashSet::new();
        for cluster in set.iter() {
            for doc in cluster.get_documents().iter() {
                assert!(seen.insert(doc.id()), "document assigned twice");
            }
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn rerunning_from_same_input_is_idempotent() {
        let build = || {
            InMemoryDocumentSource::new(vec![
                doc(&["a", "b"]),
                doc(&["a", "b"]),
                doc(&["c", "d"]),
                doc(&["c", "d"]),
            ])
        };

        let mut first_source = build();
        let first = KMeans::new(2).cluster(&mut first_source).unwrap();

        let mut second_source = build();
        let second = KMeans::new(2).cluster(&mut second_source).unwrap();

        for i in 0..first.size() {
            let a: Vec<_> = first
                .get_cluster(i)
                .unwrap()
                .get_documents()
                .iter()
                .map(|d| d.id())
                .collect();
            let b: Vec<_> = second
                .get_cluster(i)
                .unwrap()
                .get_documents()
                .iter()
                .map(|d| d.id())
                .collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn description_is_the_literal_string() {
        assert_eq!(KMeans::new(1).description(), "KMeans Clusterer");
    }
}
