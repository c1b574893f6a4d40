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

use hashbrown::{HashMap, HashSet};

use crate::document::{Document, DocumentSource};
use crate::term::Term;

/// Maps a term to the number of documents containing it.
pub trait FreqSource {
    fn termfreq(&self, term: &Term) -> usize;
    fn doccount(&self) -> usize;
}

/// Returns 1 for any term and 1 for `doccount`. Used to build points
/// without IDF weighting.
pub struct DummyFreqSource;

impl FreqSource for DummyFreqSource {
    fn termfreq(&self, _term: &Term) -> usize {
        1
    }

    fn doccount(&self) -> usize {
        1
    }
}

/// A [`FreqSource`] built by scanning every document in a [`DocumentSource`]
/// once and counting, per term, the number of distinct documents it
/// appears in.
pub struct TermListGroup {
    termfreq: HashMap<Term, usize>,
    doccount: usize,
}

impl TermListGroup {
    /// Scans `source` to completion, returning the built group alongside
    /// every document produced (in source order), since a `DocumentSource`
    /// is non-restartable and the caller will need the documents again to
    /// build [`crate::point::Point`]s.
    pub fn build(source: &mut dyn DocumentSource) -> (Self, Vec<Document>) {
        let mut termfreq = HashMap::new();
        let mut docs = Vec::with_capacity(source.size());

        while !source.at_end() {
            let doc = source.next();
            let mut seen = HashSet::new();
            for (term, _wdf) in doc.terms() {
                if seen.insert(term.clone()) {
                    *termfreq.entry(term).or_insert(0usize) += 1;
                }
            }
            docs.push(doc);
        }

        let doccount = docs.len();
        tracing::debug!(
            doccount,
            distinct_terms = termfreq.len(),
            "built term list group"
        );

        (Self { termfreq, doccount }, docs)
    }
}

impl FreqSource for TermListGroup {
    fn termfreq(&self, term: &Term) -> usize {
        self.termfreq.get(term).copied().unwrap_or(0)
    }

    fn doccount(&self) -> usize {
        self.doccount
    }
}
