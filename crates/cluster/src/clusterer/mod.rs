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

pub mod kmeans;
pub mod round_robin;

pub use kmeans::{KMeans, KMeansConfig, Seeding, KMEANS_HARD_ITER_CAP};
pub use round_robin::RoundRobin;

use crate::cluster::ClusterSet;
use crate::document::DocumentSource;
use crate::error::Result;

/// A strategy that partitions a [`DocumentSource`] into a [`ClusterSet`].
pub trait Clusterer {
    fn cluster(&self, source: &mut dyn DocumentSource) -> Result<ClusterSet>;
    fn description(&self) -> &'static str;
}
