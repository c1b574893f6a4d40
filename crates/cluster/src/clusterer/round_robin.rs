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
use crate::point::Point;

/// Deals documents into `k` clusters in round-robin order. Does not
/// compute centroids; callers that need them must trigger
/// [`ClusterSet::recalculate_centroids`].
pub struct RoundRobin {
    k: usize,
}

impl RoundRobin {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl Clusterer for RoundRobin {
    fn cluster(&self, source: &mut dyn DocumentSource) -> Result<ClusterSet> {
        if self.k == 0 {
            return Err(Error::InvalidArgument("k must be greater than 0".into()));
        }

        let (tlg, docs) = TermListGroup::build(source);
        if docs.is_empty() {
            return Err(Error::InvalidArgument(
                "document source must not be empty".into(),
            ));
        }

        tracing::debug!(k = self.k, n = docs.len(), "round robin clustering");

        let mut set = ClusterSet::new();
        for _ in 0..self.k {
            set.add_cluster(Cluster::new());
        }

        for (i, doc) in docs.into_iter().enumerate() {
            let point = Point::initialize(&tlg, doc);
            set.add_to_cluster(point, i % self.k)?;
        }

        Ok(set)
    }

    fn description(&self) -> &'static str {
        "Round Robin Clusterer"
    }
}
