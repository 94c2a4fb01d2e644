//! Primitive assembly: vertex streams to triangle index triples.

/// How consecutive vertices form triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Every three vertices form a triangle; a trailing remainder is ignored
    Triangles,
    /// Each vertex after the second closes a triangle with the previous
    /// two; odd triangles swap their first two vertices to keep the
    /// winding consistent
    TriangleStrip,
    /// Every triangle shares vertex 0
    TriangleFan,
}

impl Primitive {
    /// Triangles formed by `count` vertices, as positions in the stream.
    pub fn assemble(self, count: usize) -> Vec<[usize; 3]> {
        if count < 3 {
            return Vec::new();
        }

        match self {
            Primitive::Triangles => (0..count / 3).map(|t| [3 * t, 3 * t + 1, 3 * t + 2]).collect(),
            Primitive::TriangleStrip => (0..count - 2)
                .map(|i| if i % 2 == 0 { [i, i + 1, i + 2] } else { [i + 1, i, i + 2] })
                .collect(),
            Primitive::TriangleFan => (1..count - 1).map(|i| [0, i, i + 1]).collect(),
        }
    }

    pub fn triangle_count(self, count: usize) -> usize {
        match self {
            _ if count < 3 => 0,
            Primitive::Triangles => count / 3,
            Primitive::TriangleStrip | Primitive::TriangleFan => count - 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_list() {
        assert_eq!(
            Primitive::Triangles.assemble(7),
            vec![[0, 1, 2], [3, 4, 5]]
        );
    }

    #[test]
    fn test_strip_alternates_winding() {
        assert_eq!(
            Primitive::TriangleStrip.assemble(5),
            vec![[0, 1, 2], [2, 1, 3], [2, 3, 4]]
        );
    }

    #[test]
    fn test_fan_shares_first_vertex() {
        assert_eq!(
            Primitive::TriangleFan.assemble(5),
            vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]
        );
    }

    #[test]
    fn test_too_few_vertices() {
        for primitive in [Primitive::Triangles, Primitive::TriangleStrip, Primitive::TriangleFan] {
            assert!(primitive.assemble(2).is_empty());
            assert_eq!(primitive.triangle_count(2), 0);
        }
    }

    #[test]
    fn test_triangle_count_matches_assembly() {
        for primitive in [Primitive::Triangles, Primitive::TriangleStrip, Primitive::TriangleFan] {
            for n in 0..10 {
                assert_eq!(primitive.triangle_count(n), primitive.assemble(n).len());
            }
        }
    }
}
