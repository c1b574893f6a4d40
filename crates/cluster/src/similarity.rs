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

use crate::point::PointType;

/// A pluggable similarity metric over two [`PointType`]s.
pub trait Similarity {
    fn similarity(&self, a: &PointType, b: &PointType) -> f64;
    fn description(&self) -> &'static str;
}

/// Cosine similarity: `(a . b) / (|a| * |b|)`. Despite the name, this
/// returns a *similarity* in `[0, 1]` for non-negative weights; larger is
/// more similar.
pub struct CosineDistance;

impl Similarity for CosineDistance {
    fn similarity(&self, a: &PointType, b: &PointType) -> f64 {
        let mag_a = a.get_magnitude().sqrt();
        let mag_b = b.get_magnitude().sqrt();

        if mag_a == 0.0 || mag_b == 0.0 {
            return 0.0;
        }

        let (smaller, larger) = if a.termlist_size() <= b.termlist_size() {
            (a, b)
        } else {
            (b, a)
        };

        let dot: f64 = smaller
            .termlist_iter()
            .map(|(term, _)| smaller.get_value(&term) * larger.get_value(&term))
            .sum();

        dot / (mag_a * mag_b)
    }

    fn description(&self) -> &'static str {
        "Cosine Similarity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(weights: &[(&str, f64)]) -> PointType {
        let mut p = PointType::empty();
        for (term, w) in weights {
            p.set_value((*term).into(), *w);
        }
        p
    }

    #[test]
    fn disjoint_documents_have_zero_similarity() {
        let a = point(&[("x", 3.0), ("y", 1.0)]);
        let b = point(&[("z", 2.0), ("w", 4.0)]);
        assert_eq!(CosineDistance.similarity(&a, &b), 0.0);
    }

    #[test]
    fn identical_documents_have_unit_similarity() {
        let a = point(&[("x", 2.0), ("y", 2.0)]);
        let b = point(&[("x", 2.0), ("y", 2.0)]);
        assert!((CosineDistance.similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_magnitude_operand_gives_zero_not_nan() {
        let a = PointType::empty();
        let b = point(&[("x", 1.0)]);
        assert_eq!(CosineDistance.similarity(&a, &b), 0.0);
        assert_eq!(CosineDistance.similarity(&b, &a), 0.0);
    }

    #[test]
    fn description_is_the_literal_string() {
        assert_eq!(CosineDistance.description(), "Cosine Similarity");
    }

    proptest::proptest! {
        #[test]
        fn bounded_and_symmetric(
            a in proptest::collection::vec(0.0f64..5.0, 4),
            b in proptest::collection::vec(0.0f64..5.0, 4),
        ) {
            let terms = ["a", "b", "c", "d"];
            let pa = point(&terms.iter().copied().zip(a).collect::<Vec<_>>());
            let pb = point(&terms.iter().copied().zip(b).collect::<Vec<_>>());

            let sim_ab = CosineDistance.similarity(&pa, &pb);
            let sim_ba = CosineDistance.similarity(&pb, &pa);

            proptest::prop_assert!((0.0..=1.0 + 1e-9).contains(&sim_ab));
            proptest::prop_assert!((sim_ab - sim_ba).abs() < 1e-9);
        }

        #[test]
        fn self_similarity_is_one_for_nonzero_points(
            weights in proptest::collection::vec(0.01f64..5.0, 1..4),
        ) {
            let terms = ["a", "b", "c"];
            let pa = point(&terms.iter().copied().zip(weights).collect::<Vec<_>>());
            proptest::prop_assert!((CosineDistance.similarity(&pa, &pa) - 1.0).abs() < 1e-9);
        }
    }
}
