//! Local RIB Matrix (spec §4.3): a dense 2-D store indexed by
//! `(as_id, prefix_block_id)`, allocated once and reset in place.

use crate::announcement::CachedAnnouncement;
use crate::topology::ASNId;

/// Row-major layout: `ribs[as_id][block_id]`. For a fixed receiver AS
/// this places consecutive prefix cells adjacent in memory, matching
/// the loop nest of the propagator (spec §4.5), which iterates all
/// prefixes for one (receiver, neighbor) pair at a time.
#[derive(Debug)]
pub struct Rib {
    cells: Vec<Vec<CachedAnnouncement>>,
    n_as: usize,
    n_prefix: usize,
}

impl Rib {
    pub fn new(n_as: usize, n_prefix: usize) -> Self {
        Rib {
            cells: vec![vec![CachedAnnouncement::EMPTY; n_prefix]; n_as],
            n_as,
            n_prefix,
        }
    }

    pub fn n_as(&self) -> usize {
        self.n_as
    }

    pub fn n_prefix(&self) -> usize {
        self.n_prefix
    }

    #[inline]
    pub fn get(&self, as_id: ASNId, block_id: u32) -> &CachedAnnouncement {
        &self.cells[as_id as usize][block_id as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, as_id: ASNId, block_id: u32) -> &mut CachedAnnouncement {
        &mut self.cells[as_id as usize][block_id as usize]
    }

    /// Gets the receiver and sender cells for the same prefix without a
    /// second mutable borrow of the whole matrix, needed by the
    /// propagator's per-cell comparison (spec §4.5).
    #[inline]
    pub fn get_pair_mut(
        &mut self,
        receiver_id: ASNId,
        sender_id: ASNId,
        block_id: u32,
    ) -> (&mut CachedAnnouncement, &CachedAnnouncement) {
        let (receiver_id, sender_id) = (receiver_id as usize, sender_id as usize);
        debug_assert_ne!(receiver_id, sender_id, "an AS is never its own neighbor");
        if receiver_id < sender_id {
            let (left, right) = self.cells.split_at_mut(sender_id);
            (&mut left[receiver_id][block_id as usize], &right[0][block_id as usize])
        } else {
            let (left, right) = self.cells.split_at_mut(receiver_id);
            (&mut right[0][block_id as usize], &left[sender_id][block_id as usize])
        }
    }

    pub fn reset_all(&mut self) {
        for row in &mut self.cells {
            for cell in row {
                cell.reset();
            }
        }
    }

    pub fn reset_non_seeded(&mut self) {
        for row in &mut self.cells {
            for cell in row {
                if !cell.seeded {
                    cell.reset();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::RelationshipClass;

    #[test]
    fn new_rib_is_all_empty() {
        let rib = Rib::new(3, 2);
        for as_id in 0..3 {
            for block_id in 0..2 {
                assert!(rib.get(as_id, block_id).is_empty());
            }
        }
    }

    #[test]
    fn reset_non_seeded_preserves_seeded_cells() {
        let mut rib = Rib::new(2, 1);
        rib.get_mut(0, 0).seeded = true;
        rib.get_mut(0, 0).path_length = 1;
        rib.get_mut(1, 0).path_length = 3;

        rib.reset_non_seeded();

        assert!(!rib.get(0, 0).is_empty());
        assert!(rib.get(1, 0).is_empty());
    }

    #[test]
    fn get_pair_mut_gives_independent_references() {
        let mut rib = Rib::new(3, 1);
        rib.get_mut(1, 0).path_length = 5;
        rib.get_mut(1, 0).relationship = RelationshipClass::CustomerToProvider.value();

        let (receiver, sender) = rib.get_pair_mut(0, 1, 0);
        assert!(receiver.is_empty());
        assert_eq!(sender.path_length, 5);
    }
}
