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

use std::ops::{Deref, DerefMut};

use hashbrown::HashMap;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::freq::FreqSource;
use crate::term::Term;

/// A sparse `term -> weight` map with a cached squared magnitude.
/// Both [`Point`] and [`Centroid`] are thin wrappers around this value.
#[derive(Debug, Clone, Default)]
pub struct PointType {
    weights: HashMap<Term, f64>,
    termlist: Vec<(Term, u32)>,
    magnitude: f64,
}

impl PointType {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get_value(&self, term: &Term) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn set_value(&mut self, term: Term, weight: f64) {
        match self.weights.get_mut(&term) {
            Some(w) => {
                self.magnitude -= *w * *w;
                *w = weight;
                self.magnitude += weight * weight;
            }
            None => {
                self.magnitude += weight * weight;
                self.termlist.push((term.clone(), 1));
                self.weights.insert(term, weight);
            }
        }
    }

    pub fn add_value(&mut self, term: Term, weight: f64) {
        match self.weights.get_mut(&term) {
            Some(w) => {
                self.magnitude -= *w * *w;
                *w += weight;
                self.magnitude += *w * *w;
            }
            None => {
                self.magnitude += weight * weight;
                self.termlist.push((term.clone(), 1));
                self.weights.insert(term, weight);
            }
        }
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.weights.contains_key(term)
    }

    pub fn get_magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn recalc_magnitude(&mut self) {
        self.magnitude = self.weights.values().map(|w| w * w).sum();
    }

    pub fn termlist_size(&self) -> usize {
        self.termlist.len()
    }

    pub fn termlist_iter(&self) -> PointTermIter<'_> {
        PointTermIter {
            entries: &self.termlist,
            pos: 0,
        }
    }
}

/// Forward iterator over a [`PointType`]'s stored `(term, wdf)` entries, in
/// insertion order. `termfreq` and `positionlist` exist to satisfy the
/// iterator shape but are not meaningful for a point's own termlist and
/// surface [`Error::Unimplemented`].
pub struct PointTermIter<'a> {
    entries: &'a [(Term, u32)],
    pos: usize,
}

impl<'a> PointTermIter<'a> {
    pub fn wdf(&self) -> Option<u32> {
        self.entries.get(self.pos).map(|(_, wdf)| *wdf)
    }

    /// Advances to the first entry equal to `term`. Precondition: `term`
    /// is present at or after the current position. Returns `false`
    /// (without advancing further) if it never appears — the source
    /// leaves this case undefined; we choose to stop rather than panic.
    pub fn skip_to(&mut self, term: &Term) -> bool {
        while let Some((t, _)) = self.entries.get(self.pos) {
            if t == term {
                return true;
            }
            self.pos += 1;
        }
        false
    }

    pub fn termfreq(&self) -> Result<usize> {
        Err(Error::Unimplemented("termfreq on point term iterator"))
    }

    pub fn positionlist(&self) -> Result<std::iter::Empty<usize>> {
        Err(Error::Unimplemented("positionlist on point term iterator"))
    }
}

impl<'a> Iterator for PointTermIter<'a> {
    type Item = (Term, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.pos)?.clone();
        self.pos += 1;
        Some(entry)
    }
}

/// A [`PointType`] bound to the document it was built from.
#[derive(Debug, Clone)]
pub struct Point {
    inner: PointType,
    document: Document,
}

impl Point {
    /// Computes TF-IDF weights for every distinct term in `document`
    /// against the document frequencies recorded in `tlg`.
    pub fn initialize(tlg: &impl FreqSource, document: Document) -> Self {
        let mut inner = PointType::empty();
        let n = tlg.doccount();

        let mut seen = hashbrown::HashSet::new();
        for (term, wdf) in document.terms() {
            if !seen.insert(term.clone()) {
                continue;
            }

            let wdf = wdf.max(1);
            let tf = 1.0 + (wdf as f64).ln();
            let df = tlg.termfreq(&term);
            let idf = if df > 0 {
                ((n as f64) / (df as f64)).ln()
            } else {
                0.0
            };

            inner.set_value(term, tf * idf);
        }

        Self { inner, document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Deref for Point {
    type Target = PointType;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Point {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// The arithmetic-mean representative of a [`crate::cluster::Cluster`]'s
/// assigned points.
#[derive(Debug, Clone, Default)]
pub struct Centroid {
    inner: PointType,
}

impl Centroid {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set_to_point(&mut self, point: &Point) {
        self.inner = point.inner.clone();
    }

    pub fn clear(&mut self) {
        self.inner = PointType::empty();
    }

    /// Divides every stored weight by `n`. Does **not** refresh the cached
    /// magnitude — call [`PointType::recalc_magnitude`] afterwards if the
    /// magnitude will be consulted. Carried forward from the source as-is.
    pub fn divide(&mut self, n: usize) {
        for w in self.inner.weights.values_mut() {
            *w /= n as f64;
        }
    }
}

impl Deref for Centroid {
    type Target = PointType;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Centroid {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
