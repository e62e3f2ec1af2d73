//! Fixed-capacity particle arena with a free list.

use crate::particle::Particle;

/// Arena of particle slots.
///
/// Slots are allocated once; spawning pops an index off the free list and
/// releasing pushes it back, so neither allocates and the active count can
/// never exceed the capacity.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    free: Vec<usize>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity],
            // Reversed so the lowest indices are handed out first.
            free: (0..capacity).rev().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Claim a slot, `None` when every slot is in use.
    pub fn acquire(&mut self) -> Option<(usize, &mut Particle)> {
        let idx = self.free.pop()?;
        let slot = &mut self.slots[idx];
        slot.active = true;
        Some((idx, slot))
    }

    /// Return an active slot to the free list.
    pub fn release(&mut self, idx: usize) {
        if let Some(slot) = self.slots.get_mut(idx) {
            if slot.active {
                slot.active = false;
                self.free.push(idx);
            }
        }
    }

    /// Deactivate everything.
    pub fn clear(&mut self) {
        for p in &mut self.slots {
            p.active = false;
        }
        self.free = (0..self.slots.len()).rev().collect();
    }

    pub fn get(&self, idx: usize) -> Option<&Particle> {
        self.slots.get(idx)
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Particle] {
        &mut self.slots
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.active)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn active_count_stays_bounded(ops in proptest::collection::vec((any::<bool>(), 0usize..40), 0..300)) {
            let mut pool = ParticlePool::new(16);
            for (spawn, idx) in ops {
                if spawn {
                    let _ = pool.acquire();
                } else {
                    pool.release(idx);
                }
                prop_assert!(pool.active_count() <= pool.capacity());
                prop_assert_eq!(pool.iter_active().count(), pool.active_count());
            }
        }
    }
}
