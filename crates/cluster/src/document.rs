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

use std::rc::Rc;

use crate::term::Term;

/// A finite, non-restartable lazy sequence of documents.
///
/// Implementations are expected to call into whatever external index or
/// document store backs the ranked set; the core only ever consumes this
/// trait. `next` must not be called once `at_end` returns true.
pub trait DocumentSource {
    fn next(&mut self) -> Document;
    fn at_end(&self) -> bool;
    /// Upper bound on remaining + produced items.
    fn size(&self) -> usize;
}

/// An opaque handle into the external document store. Cheap to clone: it
/// does not own the underlying document storage, only a reference to the
/// term stream captured when the handle was produced.
#[derive(Debug, Clone)]
pub struct Document {
    id: u64,
    terms: Rc<[(Term, u32)]>,
}

impl Document {
    pub fn new(id: u64, terms: Vec<(Term, u32)>) -> Self {
        Self {
            id,
            terms: terms.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Enumerates this document's `(term, wdf)` pairs. Deterministic across
    /// calls; does not consume the document.
    pub fn terms(&self) -> impl Iterator<Item = (Term, u32)> + '_ {
        self.terms.iter().cloned()
    }
}

/// A trivial [`DocumentSource`] over documents already held in memory.
/// Exists so the core is testable (and usable) without a real index.
pub struct InMemoryDocumentSource {
    docs: Vec<Document>,
    pos: usize,
    max_items: Option<usize>,
}

impl InMemoryDocumentSource {
    pub fn new(docs: Vec<Vec<(Term, u32)>>) -> Self {
        let docs = docs
            .into_iter()
            .enumerate()
            .map(|(id, terms)| Document::new(id as u64, terms))
            .collect();
        Self {
            docs,
            pos: 0,
            max_items: None,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }
}

impl DocumentSource for InMemoryDocumentSource {
    fn next(&mut self) -> Document {
        debug_assert!(!self.at_end());
        let doc = self.docs[self.pos].clone();
        self.pos += 1;
        doc
    }

    fn at_end(&self) -> bool {
        self.pos >= self.size()
    }

    fn size(&self) -> usize {
        match self.max_items {
            Some(max) => max.min(self.docs.len()),
            None => self.docs.len(),
        }
    }
}
