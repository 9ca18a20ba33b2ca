//! # Groups
//!
//! Tags marking an entity for group-filtered batch processing.

/// The closed set of groups an entity can be enrolled in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    /// Entities moved by the physics systems.
    Movers,
    /// Living things.
    Organisms,
    /// Scratch group for ad-hoc scans.
    Dummy,
}

impl Group {
    /// Number of groups.
    pub const COUNT: usize = 3;

    /// Every group.
    pub const ALL: [Self; Self::COUNT] = [Self::Movers, Self::Organisms, Self::Dummy];
}

/// Fixed-size group membership array of one entity.
///
/// Each cell holds one group or `None`. A group appears in at most one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupSlots {
    cells: [Option<Group>; Group::COUNT],
}

impl GroupSlots {
    /// Returns whether `group` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, group: Group) -> bool {
        self.cells.contains(&Some(group))
    }

    /// Puts `group` in the first free cell among the first `limit` cells.
    ///
    /// Returns `false` if already present or if those cells are all taken.
    pub fn enroll(&mut self, group: Group, limit: usize) -> bool {
        if self.contains(group) {
            return false;
        }

        let limit = limit.min(Group::COUNT);
        match self.cells[..limit].iter_mut().find(|cell| cell.is_none()) {
            Some(cell) => {
                *cell = Some(group);
                true
            }
            None => false,
        }
    }

    /// Clears the cell holding `group`.
    ///
    /// Returns `false` if `group` is not present.
    pub fn dismiss(&mut self, group: Group) -> bool {
        match self.cells.iter_mut().find(|cell| **cell == Some(group)) {
            Some(cell) => {
                *cell = None;
                true
            }
            None => false,
        }
    }

    /// Empties every cell.
    #[inline]
    pub fn clear(&mut self) {
        self.cells = [None; Group::COUNT];
    }

    /// Returns the number of occupied cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Returns whether no cell is occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Iterates over the enrolled groups in cell order.
    pub fn iter(&self) -> impl Iterator<Item = Group> + '_ {
        self.cells.iter().filter_map(|cell| *cell)
    }

    /// Returns the raw cells, empty ones included.
    #[inline]
    #[must_use]
    pub const fn cells(&self) -> &[Option<Group>; Group::COUNT] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enroll_dismiss() {
        let mut groups = GroupSlots::default();
        assert!(groups.is_empty());

        assert!(groups.enroll(Group::Movers, Group::COUNT));
        assert!(!groups.enroll(Group::Movers, Group::COUNT));
        assert!(groups.contains(Group::Movers));

        assert!(groups.dismiss(Group::Movers));
        assert!(!groups.dismiss(Group::Movers));
        assert!(groups.is_empty());
    }

    #[test]
    fn test_enroll_respects_limit() {
        let mut groups = GroupSlots::default();
        assert!(groups.enroll(Group::Movers, 2));
        assert!(groups.enroll(Group::Organisms, 2));
        assert!(!groups.enroll(Group::Dummy, 2));
        assert_eq!(groups.len(), 2);

        assert!(groups.dismiss(Group::Movers));
        assert!(groups.enroll(Group::Dummy, 2));
        assert_eq!(groups.iter().collect::<Vec<_>>(), vec![Group::Dummy, Group::Organisms]);
    }

    #[test]
    fn test_full_capacity_holds_every_group() {
        let mut groups = GroupSlots::default();
        for group in Group::ALL {
            assert!(groups.enroll(group, Group::COUNT));
        }
        assert_eq!(groups.len(), Group::COUNT);

        groups.clear();
        assert!(groups.is_empty());
    }
}
