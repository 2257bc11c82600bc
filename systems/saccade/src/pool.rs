use breath_garden_core::{shuffle, GroupId, RandomSource};

/// Randomised order in which activation groups receive their growth turn.
#[derive(Clone, Debug)]
pub struct ActivationOrderPool {
    order: Vec<GroupId>,
}

impl ActivationOrderPool {
    /// Builds a shuffled permutation of the groups `0..size`.
    #[must_use]
    pub fn new(size: usize, rng: &mut dyn RandomSource) -> Self {
        let count = u32::try_from(size).unwrap_or(u32::MAX);
        let mut pool = Self {
            order: (0..count).map(GroupId::new).collect(),
        };
        pool.reshuffle(rng);
        pool
    }

    /// Shuffles the permutation again.
    pub fn reshuffle(&mut self, rng: &mut dyn RandomSource) {
        shuffle(rng, &mut self.order);
    }

    /// Group activated by the saccade with the provided one-based count.
    ///
    /// Counts of zero or past the end of the pool yield nothing.
    #[must_use]
    pub fn get(&self, saccade_count: usize) -> Option<GroupId> {
        let index = saccade_count.checked_sub(1)?;
        self.order.get(index).copied()
    }

    /// Number of groups in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Reports whether the pool holds no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Groups in activation order.
    #[must_use]
    pub fn order(&self) -> &[GroupId] {
        &self.order
    }
}
