//! Integer id allocation for stored records.

/// Next id after the largest of `ids`, or 1 when there are none.
fn next_id(ids: impl IntoIterator<Item = u64>) -> u64 {
    ids.into_iter().max().unwrap_or(0) + 1
}

/// Hands out strictly increasing ids for one record type.
///
/// Seeded from the records on disk. The high-water mark never moves back,
/// so deleting the newest record does not make its id available again
/// while the store is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdAllocator {
    high_water: u64,
}

impl IdAllocator {
    pub fn seeded(ids: impl IntoIterator<Item = u64>) -> Self {
        IdAllocator {
            high_water: next_id(ids) - 1,
        }
    }

    /// Record an id that was assigned elsewhere.
    pub fn observe(&mut self, id: u64) {
        self.high_water = self.high_water.max(id);
    }

    pub fn allocate(&mut self) -> u64 {
        self.high_water += 1;
        self.high_water
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id() {
        assert_eq!(next_id([]), 1);
        assert_eq!(next_id([3, 9, 4]), 10);
    }

    #[test]
    fn test_allocator_is_monotonic() {
        let mut ids = IdAllocator::seeded([2, 5]);
        assert_eq!(ids.allocate(), 6);
        ids.observe(3);
        assert_eq!(ids.allocate(), 7);
        ids.observe(20);
        assert_eq!(ids.allocate(), 21);
    }
}
