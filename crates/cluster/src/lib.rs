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

//! Document clustering core: partitions a ranked set of retrieved
//! documents into a user-requested number of groups, each represented by
//! a centroid in a term-weighted vector space, using TF-IDF weights and
//! cosine similarity.
//!
//! Data flow: a ranked [`document::DocumentSource`] feeds a
//! [`freq::TermListGroup`], which is used to build one [`point::Point`]
//! per document. A [`clusterer::Clusterer`] (e.g. [`clusterer::KMeans`] or
//! [`clusterer::RoundRobin`]) then partitions those points into a
//! [`cluster::ClusterSet`], consulting a [`similarity::Similarity`] (e.g.
//! [`similarity::CosineDistance`]) during assignment.

pub mod cluster;
pub mod clusterer;
pub mod document;
pub mod error;
pub mod freq;
pub mod point;
pub mod similarity;
pub mod term;

pub use cluster::{Cluster, ClusterSet, DocumentSet};
pub use clusterer::{Clusterer, KMeans, KMeansConfig, RoundRobin, Seeding};
pub use document::{Document, DocumentSource, InMemoryDocumentSource};
pub use error::{Error, Result};
pub use freq::{DummyFreqSource, FreqSource, TermListGroup};
pub use point::{Centroid, Point, PointType};
pub use similarity::{CosineDistance, Similarity};
pub use term::Term;
