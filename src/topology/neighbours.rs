use std::collections::HashSet;

use crate::math::{normalize_angle, ANGLE_TOLERANCE};

use super::edge::EdgeId;

/// One incident edge and the polar angle at which it leaves the vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub edge: EdgeId,
    /// Departure angle in `[0, 2π)`.
    pub angle: f64,
}

/// The incident edges of a vertex, sorted by departure angle (ascending,
/// i.e. counter-clockwise).
///
/// Edge ids are generation-checked handles: an entry whose edge has been
/// removed from the map goes stale rather than dangling, and is dropped by
/// [`Neighbours::cleanse`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighbours {
    entries: Vec<Neighbour>,
}

impl Neighbours {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighbour> {
        self.entries.iter()
    }

    /// Incident edge ids in angular order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.entries.iter().map(|n| n.edge)
    }

    #[must_use]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.position(edge).is_some()
    }

    #[must_use]
    pub fn position(&self, edge: EdgeId) -> Option<usize> {
        self.entries.iter().position(|n| n.edge == edge)
    }

    /// Returns the departure angle cached for `edge`.
    #[must_use]
    pub fn angle_of(&self, edge: EdgeId) -> Option<f64> {
        self.entries.iter().find(|n| n.edge == edge).map(|n| n.angle)
    }

    /// Inserts `edge` at its angular position and returns the index used.
    ///
    /// Re-inserting an edge that is already present replaces its entry.
    pub fn insert(&mut self, edge: EdgeId, angle: f64) -> usize {
        self.remove(edge);
        let angle = normalize_angle(angle);
        let idx = self.entries.partition_point(|n| n.angle <= angle);
        self.entries.insert(idx, Neighbour { edge, angle });
        idx
    }

    /// Removes `edge`; returns `true` if it was present.
    pub fn remove(&mut self, edge: EdgeId) -> bool {
        match self.position(edge) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// The entry clockwise from `edge` (cyclic).
    #[must_use]
    pub fn before(&self, edge: EdgeId) -> Option<EdgeId> {
        let idx = self.position(edge)?;
        let n = self.entries.len();
        Some(self.entries[(idx + n - 1) % n].edge)
    }

    /// The entry counter-clockwise from `edge` (cyclic).
    #[must_use]
    pub fn after(&self, edge: EdgeId) -> Option<EdgeId> {
        let idx = self.position(edge)?;
        Some(self.entries[(idx + 1) % self.entries.len()].edge)
    }

    /// The first entry after `home`, cyclically, that is not in `visited`.
    ///
    /// `home` itself is considered last.
    #[must_use]
    pub fn first_unvisited(&self, home: EdgeId, visited: &HashSet<EdgeId>) -> Option<EdgeId> {
        let idx = self.position(home)?;
        let n = self.entries.len();
        (1..=n)
            .map(|step| self.entries[(idx + step) % n].edge)
            .find(|e| !visited.contains(e))
    }

    /// Returns `true` if the entries are in ascending angle order.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].angle <= w[1].angle)
    }

    /// Returns pairs of adjacent entries whose directions coincide.
    #[must_use]
    pub fn coincident_directions(&self) -> Vec<(EdgeId, EdgeId)> {
        let n = self.entries.len();
        if n < 2 {
            return Vec::new();
        }
        let mut pairs = Vec::new();
        for i in 0..n {
            let a = &self.entries[i];
            let b = &self.entries[(i + 1) % n];
            // The wrap-around pair compares across 2π.
            let gap = if i + 1 == n {
                b.angle + std::f64::consts::TAU - a.angle
            } else {
                b.angle - a.angle
            };
            if gap < ANGLE_TOLERANCE {
                pairs.push((a.edge, b.edge));
            }
        }
        // With two entries both gaps describe the same pair.
        pairs.truncate(if n == 2 { 1 } else { n });
        pairs
    }

    /// Recomputes every angle with `angle_of` and re-sorts.
    pub fn rebuild(&mut self, mut angle_of: impl FnMut(EdgeId) -> f64) {
        for n in &mut self.entries {
            n.angle = normalize_angle(angle_of(n.edge));
        }
        self.entries.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    }

    /// Drops degenerate entries and returns the edges whose entries went.
    ///
    /// An entry is degenerate if `is_live` rejects its edge (gone, or no
    /// longer touching this vertex), or if its direction duplicates the
    /// entry before it within [`ANGLE_TOLERANCE`].
    pub fn cleanse(&mut self, mut is_live: impl FnMut(EdgeId) -> bool) -> Vec<EdgeId> {
        let mut dropped = Vec::new();
        self.entries.retain(|n| {
            let keep = is_live(n.edge);
            if !keep {
                dropped.push(n.edge);
            }
            keep
        });

        let mut kept: Vec<Neighbour> = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            match kept.last() {
                Some(prev) if entry.angle - prev.angle < ANGLE_TOLERANCE => dropped.push(entry.edge),
                _ => kept.push(entry),
            }
        }
        // Across 2π: the last entry may duplicate the first.
        if kept.len() > 1 {
            if let (Some(first), Some(last)) = (kept.first(), kept.last()) {
                if first.angle + std::f64::consts::TAU - last.angle < ANGLE_TOLERANCE {
                    if let Some(last) = kept.pop() {
                        dropped.push(last.edge);
                    }
                }
            }
        }
        self.entries = kept;
        dropped
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn ids(n: usize) -> Vec<EdgeId> {
        let mut sm: SlotMap<EdgeId, ()> = SlotMap::with_key();
        (0..n).map(|_| sm.insert(())).collect()
    }

    #[test]
    fn insert_keeps_angular_order() {
        let e = ids(3);
        let mut nb = Neighbours::new();
        nb.insert(e[0], 3.0);
        nb.insert(e[1], 1.0);
        nb.insert(e[2], -0.5); // wraps to 2π - 0.5
        let order: Vec<_> = nb.edges().collect();
        assert_eq!(order, vec![e[1], e[0], e[2]]);
        assert!(nb.is_sorted());
    }

    #[test]
    fn before_and_after_are_cyclic() {
        let e = ids(3);
        let mut nb = Neighbours::new();
        for (i, id) in e.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            nb.insert(*id, i as f64);
        }
        assert_eq!(nb.after(e[2]), Some(e[0]));
        assert_eq!(nb.before(e[0]), Some(e[2]));
        assert_eq!(nb.after(e[0]), Some(e[1]));
        let stranger = ids(4)[3];
        assert_eq!(nb.after(stranger), None);
    }

    #[test]
    fn first_unvisited_skips_visited_and_ends_at_home() {
        let e = ids(3);
        let mut nb = Neighbours::new();
        nb.insert(e[0], 0.0);
        nb.insert(e[1], 1.0);
        nb.insert(e[2], 2.0);
        let mut visited = HashSet::new();
        visited.insert(e[1]);
        assert_eq!(nb.first_unvisited(e[0], &visited), Some(e[2]));
        visited.insert(e[2]);
        assert_eq!(nb.first_unvisited(e[0], &visited), Some(e[0]));
        visited.insert(e[0]);
        assert_eq!(nb.first_unvisited(e[0], &visited), None);
    }

    #[test]
    fn cleanse_drops_dead_and_duplicate_directions() {
        let e = ids(4);
        let mut nb = Neighbours::new();
        nb.insert(e[0], 0.5);
        nb.insert(e[1], 0.5 + 1e-9);
        nb.insert(e[2], 2.0);
        nb.insert(e[3], 4.0);
        let dropped = nb.cleanse(|id| id != e[3]);
        assert_eq!(nb.len(), 2);
        assert!(dropped.contains(&e[3]));
        assert!(dropped.contains(&e[1]));
        assert!(nb.contains(e[0]) && nb.contains(e[2]));
    }

    #[test]
    fn cleanse_catches_duplicates_across_zero() {
        let e = ids(2);
        let mut nb = Neighbours::new();
        nb.insert(e[0], 1e-9);
        nb.insert(e[1], -1e-9);
        let dropped = nb.cleanse(|_| true);
        assert_eq!(nb.len(), 1);
        assert_eq!(dropped, vec![e[1]]);
    }

    #[test]
    fn rebuild_resorts() {
        let e = ids(2);
        let mut nb = Neighbours::new();
        nb.insert(e[0], 0.0);
        nb.insert(e[1], 1.0);
        nb.rebuild(|id| if id == e[0] { 2.0 } else { 1.0 });
        assert_eq!(nb.edges().collect::<Vec<_>>(), vec![e[1], e[0]]);
        assert!((nb.angle_of(e[0]).unwrap() - 2.0).abs() < 1e-12);
    }
}
