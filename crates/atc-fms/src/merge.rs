//! Leg storage and route-amendment splicing.
//!
//! Legs live in a [`LegArena`] and are addressed by stable [`LegId`]s. The
//! flight plan is an ordered list of ids; an amendment computes a new list
//! (a [`Splice`]) instead of editing the old one in place, so the splice
//! arithmetic can be exercised without any navigation data.

use crate::leg::Leg;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LegId(usize);

/// Owns every leg referenced by a flight plan.
#[derive(Debug, Clone, Default)]
pub struct LegArena {
    slots: Vec<Option<Leg>>,
}

impl LegArena {
    pub fn insert(&mut self, leg: Leg) -> LegId {
        self.slots.push(Some(leg));
        LegId(self.slots.len() - 1)
    }

    pub fn get(&self, id: LegId) -> Option<&Leg> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: LegId) -> Option<&mut Leg> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, id: LegId) -> Option<Leg> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// Drop every leg not referenced by `order` and re-number the rest
    /// densely, returning the re-numbered order.
    pub fn compact(&mut self, order: &[LegId]) -> Vec<LegId> {
        let mut slots = Vec::with_capacity(order.len());
        for id in order {
            if let Some(leg) = self.remove(*id) {
                slots.push(Some(leg));
            }
        }
        self.slots = slots;
        (0..self.slots.len()).map(LegId).collect()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Result of planning an amendment over the leg order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub order: Vec<LegId>,
    /// Index into `order` of the leg the pointer moves to.
    pub current_leg: usize,
    /// Legs no longer referenced by `order`.
    pub removed: Vec<LegId>,
}

/// Replace the whole plan with `new_legs`, pointer at the first one.
pub fn replace_all(order: &[LegId], new_legs: &[LegId]) -> Splice {
    Splice {
        order: new_legs.to_vec(),
        current_leg: 0,
        removed: order.to_vec(),
    }
}

/// Insert `new_legs` right after the current leg and move onto the first of
/// them. With an empty plan the new legs simply become the plan.
pub fn insert_after_current(
    order: &[LegId],
    current_leg: usize,
    new_legs: &[LegId],
) -> Splice {
    if order.is_empty() {
        return replace_all(order, new_legs);
    }

    let at = (current_leg + 1).min(order.len());
    let mut spliced = Vec::with_capacity(order.len() + new_legs.len());
    spliced.extend_from_slice(&order[..at]);
    spliced.extend_from_slice(new_legs);
    spliced.extend_from_slice(&order[at..]);

    Splice {
        order: spliced,
        current_leg: at.min(order.len() + new_legs.len() - 1),
        removed: Vec::new(),
    }
}

/// Splice `new_legs` in front of the continuity leg, discarding the whole
/// legs between the current leg and the continuity leg.
///
/// Legs before the current leg (already flown) are never discarded, and the
/// continuity leg itself is kept. A continuity leg behind the current leg
/// discards nothing.
pub fn merge_at_continuity(
    order: &[LegId],
    current_leg: usize,
    continuity_leg: usize,
    new_legs: &[LegId],
) -> Splice {
    let start = current_leg.min(order.len());
    let end = continuity_leg.clamp(start, order.len());

    let mut spliced = Vec::with_capacity(order.len() + new_legs.len());
    spliced.extend_from_slice(&order[..start]);
    spliced.extend_from_slice(new_legs);
    spliced.extend_from_slice(&order[end..]);

    let last = spliced.len().saturating_sub(1);
    Splice {
        order: spliced,
        current_leg: start.min(last),
        removed: order[start..end].to_vec(),
    }
}
