//! Manual order overlay
//!
//! A user-imposed order over the ids of the current filtered view. The
//! overlay only ever permutes the ids it was created with; the owning view
//! drops it whenever the query changes.

use crate::domain::EntryId;
use crate::error::ReorderError;

/// User-imposed ordering of the currently displayed ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualOrder {
    ids: Vec<EntryId>,
}

impl ManualOrder {
    /// Start from the view's natural order
    pub fn new(natural: Vec<EntryId>) -> Self {
        Self { ids: natural }
    }

    pub fn ids(&self) -> &[EntryId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Move the id at `source` to `target`, shifting the ids between
    pub fn reorder(&mut self, source: usize, target: usize) -> Result<(), ReorderError> {
        let len = self.ids.len();
        for index in [source, target] {
            if index >= len {
                return Err(ReorderError::OutOfBounds { index, len });
            }
        }
        if source == target {
            return Err(ReorderError::SameIndex(source));
        }

        let id = self.ids.remove(source);
        self.ids.insert(target, id);
        Ok(())
    }

    /// Drop `source_id` onto the position currently held by `target_id`
    pub fn reorder_ids(&mut self, source_id: &EntryId, target_id: &EntryId) -> Result<(), ReorderError> {
        let source = self.index_of(source_id)?;
        let target = self.index_of(target_id)?;
        self.reorder(source, target)
    }

    fn index_of(&self, id: &EntryId) -> Result<usize, ReorderError> {
        self.ids
            .iter()
            .position(|i| i == id)
            .ok_or_else(|| ReorderError::UnknownId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(ids: &[&str]) -> ManualOrder {
        ManualOrder::new(ids.iter().map(|s| EntryId::new(*s)).collect())
    }

    fn names(order: &ManualOrder) -> Vec<&str> {
        order.ids().iter().map(|i| i.as_str()).collect()
    }

    #[test]
    fn test_reorder_forward() {
        let mut o = order(&["a", "b", "c", "d"]);
        o.reorder(0, 2).unwrap();
        assert_eq!(names(&o), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_reorder_backward() {
        let mut o = order(&["a", "b", "c", "d"]);
        o.reorder(3, 1).unwrap();
        assert_eq!(names(&o), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn test_reorder_then_inverse_restores() {
        let original = order(&["a", "b", "c", "d", "e"]);
        for i in 0..5 {
            for j in 0..5 {
                if i == j {
                    continue;
                }
                let mut o = original.clone();
                o.reorder(i, j).unwrap();
                o.reorder(j, i).unwrap();
                assert_eq!(o, original, "reorder({}, {}) not undone", i, j);
            }
        }
    }

    #[test]
    fn test_reorder_same_index_is_error() {
        let mut o = order(&["a", "b"]);
        assert_eq!(o.reorder(1, 1), Err(ReorderError::SameIndex(1)));
        assert_eq!(names(&o), vec!["a", "b"]);
    }

    #[test]
    fn test_reorder_out_of_bounds() {
        let mut o = order(&["a", "b"]);
        assert_eq!(o.reorder(0, 2), Err(ReorderError::OutOfBounds { index: 2, len: 2 }));
        assert_eq!(o.reorder(5, 0), Err(ReorderError::OutOfBounds { index: 5, len: 2 }));
        assert_eq!(names(&o), vec!["a", "b"]);
    }

    #[test]
    fn test_reorder_empty() {
        let mut o = order(&[]);
        assert!(o.is_empty());
        assert!(o.reorder(0, 0).is_err());
    }

    #[test]
    fn test_reorder_ids() {
        let mut o = order(&["a", "b", "c"]);
        o.reorder_ids(&EntryId::new("c"), &EntryId::new("a")).unwrap();
        assert_eq!(names(&o), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reorder_ids_unknown() {
        let mut o = order(&["a", "b"]);
        assert_eq!(
            o.reorder_ids(&EntryId::new("z"), &EntryId::new("a")),
            Err(ReorderError::UnknownId("z".to_string()))
        );
    }

    #[test]
    fn test_reorder_keeps_id_set() {
        let mut o = order(&["a", "b", "c", "d"]);
        o.reorder(1, 3).unwrap();
        o.reorder(0, 2).unwrap();
        let mut sorted = names(&o);
        sorted.sort();
        assert_eq!(sorted, vec!["a", "b", "c", "d"]);
        assert_eq!(o.len(), 4);
    }
}
