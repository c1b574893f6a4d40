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

use std::ops::{Index, IndexMut};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::point::{Centroid, Point};

/// An ordered, index-addressable set of document handles, in insertion
/// order. Returned by [`Cluster::get_documents`].
#[derive(Debug, Clone, Default)]
pub struct DocumentSet(Vec<Document>);

impl DocumentSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.0.iter()
    }
}

impl Index<usize> for DocumentSet {
    type Output = Document;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// A centroid plus the ordered set of points assigned to it.
#[derive(Debug, Clone, Default)]
pub struct Cluster {
    centroid: Centroid,
    points: Vec<Point>,
}

impl Cluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Empties the point list. The centroid is not reset.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }

    pub fn get_index(&self, index: usize) -> Result<&Point> {
        self.points.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.points.len(),
        })
    }

    pub fn get_documents(&self) -> DocumentSet {
        DocumentSet(self.points.iter().map(|p| p.document().clone()).collect())
    }

    pub fn get_centroid(&self) -> &Centroid {
        &self.centroid
    }

    pub fn set_centroid(&mut self, centroid: Centroid) {
        self.centroid = centroid;
    }

    /// Rebuilds the centroid as the component-wise mean of the current
    /// point list. On an empty cluster, clears the centroid rather than
    /// leaving it stale (the source leaves this case as an implementation
    /// choice; callers that want a last-known centroid preserved, such as
    /// the K-Means update step, must avoid calling this on empty clusters).
    pub fn recalculate(&mut self) {
        self.centroid.clear();

        if self.points.is_empty() {
            return;
        }

        for point in &self.points {
            for (term, _wdf) in point.termlist_iter() {
                let weight = point.get_value(&term);
                self.centroid.add_value(term, weight);
            }
        }

        self.centroid.divide(self.points.len());
        self.centroid.recalc_magnitude();
    }
}

/// An ordered collection of [`Cluster`]s.
#[derive(Debug, Clone, Default)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        self.clusters.len()
    }

    pub fn add_cluster(&mut self, cluster: Cluster) {
        self.clusters.push(cluster);
    }

    pub fn get_cluster(&self, index: usize) -> Result<&Cluster> {
        self.clusters.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.clusters.len(),
        })
    }

    pub fn get_cluster_mut(&mut self, index: usize) -> Result<&mut Cluster> {
        let len = self.clusters.len();
        self.clusters
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    pub fn add_to_cluster(&mut self, point: Point, index: usize) -> Result<()> {
        self.get_cluster_mut(index)?.add_point(point);
        Ok(())
    }

    /// Clears the points in every cluster; centroids are retained.
    pub fn clear_clusters(&mut self) {
        for cluster in &mut self.clusters {
            cluster.clear();
        }
    }

    pub fn recalculate_centroids(&mut self) {
        for cluster in &mut self.clusters {
            cluster.recalculate();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }
}

impl Index<usize> for ClusterSet {
    type Output = Cluster;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clusters[index]
    }
}

impl IndexMut<usize> for ClusterSet {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.clusters[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentSource};
    use crate::term::Term;

    fn point(id: u64, weights: &[(&str, f64)]) -> Point {
        let mut source = crate::document::InMemoryDocumentSource::new(vec![weights
            .iter()
            .map(|(t, w)| ((*t).into(), (*w) as u32))
            .collect()]);
        let _ = id;
        let doc: Document = source.next();
        let tlg = crate::freq::DummyFreqSource;
        let mut p = Point::initialize(&tlg, doc);
        for (term, w) in weights {
            p.set_value((*term).into(), *w);
        }
        p
    }

    #[test]
    fn recalculate_is_component_wise_mean() {
        let mut cluster = Cluster::new();
        cluster.add_point(point(0, &[("a", 2.0), ("b", 4.0)]));
        cluster.add_point(point(1, &[("a", 4.0), ("b", 0.0)]));
        cluster.recalculate();

        let centroid = cluster.get_centroid();
        assert!((centroid.get_value(&Term::from("a")) - 3.0).abs() < 1e-12);
        assert!((centroid.get_value(&Term::from("b")) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_is_distinguishable_error() {
        let set = ClusterSet::new();
        let err = set.get_cluster(0).unwrap_err();
        assert_eq!(
            err,
            Error::OutOfRange { index: 0, len: 0 }
        );
    }

    #[test]
    fn clear_clusters_retains_centroids() {
        let mut set = ClusterSet::new();
        let mut cluster = Cluster::new();
        cluster.add_point(point(0, &[("a", 1.0)]));
        cluster.recalculate();
        set.add_cluster(cluster);

        let before = set.get_cluster(0).unwrap().get_centroid().get_value(&"a".into());
        set.clear_clusters();
        let after = set.get_cluster(0).unwrap().get_centroid().get_value(&"a".into());

        assert_eq!(before, after);
        assert_eq!(set.get_cluster(0).unwrap().size(), 0);
    }

    #[test]
    fn subscript_supports_mutation() {
        let mut set = ClusterSet::new();
        set.add_cluster(Cluster::new());
        set[0].add_point(point(0, &[("a", 1.0)]));
        assert_eq!(set[0].size(), 1);
    }
}
