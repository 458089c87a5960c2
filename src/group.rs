//! Group (chain) management.
//!
//! Groups are stored in an arena and addressed by [`GroupId`]. A group holds
//! the indices of its member points; points hold the id of their group. Two
//! stones are in the same group iff their ids are equal.
//!
//! Liberties are not cached on the group. [`Groups::liberties`] takes the
//! union of the members' liberty lists every time it is asked.

use std::collections::HashSet;

use tracing::trace;

use crate::point::{Point, Stone};

/// Handle to a group in the [`Groups`] arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

/// A maximal connected set of same-colored stones.
#[derive(Clone, Debug)]
pub struct Group {
    color: Stone,
    members: Vec<usize>,
}

impl Group {
    pub fn color(&self) -> Stone {
        self.color
    }

    /// Indices of the member points, in no particular order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Arena of live groups. Freed slots are reused.
#[derive(Clone, Debug, Default)]
pub struct Groups {
    slots: Vec<Option<Group>>,
    free: Vec<usize>,
}

impl Groups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live groups.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|g| g.is_some()).count()
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Iterate over live groups.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &Group)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.as_ref().map(|g| (GroupId(i), g)))
    }

    /// Create a singleton group for the stone just placed at `pt`.
    pub(crate) fn new_group(&mut self, points: &mut [Point], pt: usize, color: Stone) -> GroupId {
        let group = Group {
            color,
            members: vec![pt],
        };
        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(group);
                GroupId(slot)
            }
            None => {
                self.slots.push(Some(group));
                GroupId(self.slots.len() - 1)
            }
        };
        points[pt].set_group(Some(id));
        id
    }

    /// Absorb every member of `from` into `into` and retarget their group
    /// references. `from` is destroyed. Merging a group with itself is a no-op.
    pub(crate) fn merge(&mut self, points: &mut [Point], into: GroupId, from: GroupId) {
        if into == from {
            return;
        }
        let Some(absorbed) = self.release(from) else {
            return;
        };
        for &pt in &absorbed.members {
            points[pt].set_group(Some(into));
        }
        if let Some(target) = self.slots[into.0].as_mut() {
            debug_assert_eq!(target.color, absorbed.color);
            trace!(
                into = into.0,
                from = from.0,
                absorbed = absorbed.members.len(),
                "merged groups"
            );
            target.members.extend(absorbed.members);
        }
    }

    /// Destroy a group and hand back its members. Points still refer to the
    /// released id; the caller is responsible for clearing them.
    pub(crate) fn release(&mut self, id: GroupId) -> Option<Group> {
        let group = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        Some(group)
    }

    /// The distinct empty points adjacent to any member of the group.
    pub fn liberties(&self, points: &[Point], id: GroupId) -> HashSet<usize> {
        let mut libs = HashSet::new();
        if let Some(group) = self.get(id) {
            for &pt in &group.members {
                libs.extend(points[pt].liberties().iter().copied());
            }
        }
        libs
    }

    /// Number of distinct liberties of the group. A liberty shared by several
    /// members counts once.
    pub fn liberty_count(&self, points: &[Point], id: GroupId) -> usize {
        self.liberties(points, id).len()
    }
}
