//! Packed announcement records (spec §4, data model).
//!
//! Split into a cache-dense "cached" part that lives in the RIB matrix
//! and is touched on every comparison, and a bulkier "static" part
//! (origin, prefix string, timestamp) kept in a separate pool and
//! referenced by index. This is the same split the original
//! extrapolator makes between `AnnouncementCachedData` and
//! `AnnouncementStaticData`.

use crate::priority::MAX_PATH_LENGTH;
use crate::relationship::RelationshipClass;
use crate::topology::{ASNId, ASN};

pub type Prefix = ipnetwork::IpNetwork;

/// Immutable once written during seeding. Referenced elsewhere by
/// index into a contiguous pool, never by pointer.
#[derive(Debug, Clone)]
pub struct StaticAnnouncement {
    pub origin_asn: ASN,
    pub prefix: Prefix,
    pub timestamp: i64,
    pub prefix_string: String,
    pub prefix_id: u32,
    pub prefix_block_id: u32,
}

/// One RIB cell. 12 meaningful bytes before alignment padding: an
/// `ASNId` (4), a `u32` static index (4), and three `u8` fields.
///
/// `received_from_id` is used when the sender has a dense ID;
/// `received_from_stub_asn` is set only by the stub-elision special
/// case of the seeder (spec §4.4 step 1), where the sender is a stub
/// ASN that was never assigned an ID. At most one of the two is
/// meaningful for a given non-empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedAnnouncement {
    pub received_from_id: ASNId,
    pub received_from_stub_asn: Option<ASN>,
    pub static_index: u32,
    pub seeded: bool,
    pub path_length: u8,
    pub relationship: u8,
}

impl CachedAnnouncement {
    /// The default / empty state (I1): `path_length == 0` and no other
    /// field is meaningful.
    pub const EMPTY: CachedAnnouncement = CachedAnnouncement {
        received_from_id: 0,
        received_from_stub_asn: None,
        static_index: 0,
        seeded: false,
        path_length: 0,
        relationship: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.path_length == 0
    }

    pub fn relationship_class(&self) -> RelationshipClass {
        RelationshipClass::from_value(self.relationship)
    }

    pub fn reset(&mut self) {
        *self = CachedAnnouncement::EMPTY;
    }

    /// Write a fresh, non-seeded accepted cell during propagation
    /// (spec §4.5 step 7).
    pub fn accept_propagated(
        &mut self,
        sender_id: ASNId,
        new_len: u8,
        relationship: RelationshipClass,
        static_index: u32,
    ) {
        debug_assert!(new_len <= MAX_PATH_LENGTH);
        self.received_from_id = sender_id;
        self.received_from_stub_asn = None;
        self.path_length = new_len;
        self.relationship = relationship.value();
        self.static_index = static_index;
        self.seeded = false;
    }
}

impl Default for CachedAnnouncement {
    fn default() -> Self {
        CachedAnnouncement::EMPTY
    }
}

/// Grows during seeding, immutable afterwards. Indexed by `u32` so
/// `CachedAnnouncement::static_index` stays a 4-byte cross-reference.
#[derive(Debug, Default)]
pub struct StaticPool {
    records: Vec<StaticAnnouncement>,
}

impl StaticPool {
    pub fn new() -> Self {
        StaticPool { records: Vec::new() }
    }

    pub fn push(&mut self, record: StaticAnnouncement) -> u32 {
        let index = self.records.len() as u32;
        self.records.push(record);
        index
    }

    pub fn get(&self, index: u32) -> &StaticAnnouncement {
        &self.records[index as usize]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
