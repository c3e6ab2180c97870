//! Vertex welding table.

use indexmap::IndexMap;

use crate::export::quantize::QuantizedPoint;

/// Maps quantized points to dense indices in insertion order.
#[derive(Default, Debug, Clone)]
pub struct VertexTable {
    /// Points and their indices.
    indices: IndexMap<QuantizedPoint, u32>,
}

impl VertexTable {
    /// Creates a new empty `VertexTable`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the given point, adding it if required.
    pub fn insert(&mut self, p: QuantizedPoint) -> u32 {
        let next = self.indices.len() as u32;
        *self.indices.entry(p).or_insert(next)
    }

    /// Returns the number of distinct points.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns an iterator of points in index order.
    pub fn iter_points(&self) -> impl Iterator<Item = QuantizedPoint> + '_ {
        self.indices.keys().copied()
    }

    /// Flattens the points into XYZ triples multiplied by `scale`.
    pub fn flatten(&self, scale: f64) -> Vec<f64> {
        self.iter_points().flat_map(|p| p.scaled(scale)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64, z: i64) -> QuantizedPoint {
        QuantizedPoint { x, y, z }
    }

    #[test]
    fn assigns_dense_indices_in_insertion_order() {
        let mut table = VertexTable::new();
        assert!(table.is_empty());
        assert_eq!(table.insert(p(0, 0, 0)), 0);
        assert_eq!(table.insert(p(1, 0, 0)), 1);
        assert_eq!(table.insert(p(0, 1, 0)), 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn reinsertion_is_idempotent() {
        let mut table = VertexTable::new();
        let first = table.insert(p(5, 6, 7));
        table.insert(p(8, 9, 10));
        assert_eq!(table.insert(p(5, 6, 7)), first);
        assert_eq!(table.insert(p(5, 6, 7)), first);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn flattens_in_index_order() {
        let mut table = VertexTable::new();
        table.insert(p(1, 2, 3));
        table.insert(p(4, 5, 6));
        table.insert(p(1, 2, 3));
        assert_eq!(table.flatten(1.0), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(table.flatten(2.0)[5], 12.0);
    }
}
