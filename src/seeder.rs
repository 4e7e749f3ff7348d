//! Seeder (spec §4.4): walks each observed AS_PATH, writing a seeded
//! RIB entry at each hop (or just the origin, under `origin_only`),
//! applying inter-announcement tie-breaking for duplicates.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use std::cell::RefCell;

use log::{debug, warn};

use crate::announcement::{Prefix, StaticAnnouncement, StaticPool};
use crate::config::{SeedingConfig, TiebrakingMethod, TimestampComparison};
use crate::relationship::RelationshipClass;
use crate::rib::Rib;
use crate::topology::{ASNId, TopologyStore, ASN};

/// Abstract input record for one observed announcement (spec §4.4,
/// §6). Loaders produce these; the core never parses a file itself.
#[derive(Debug, Clone)]
pub struct AnnouncementRecord {
    pub prefix_string: String,
    pub prefix: Prefix,
    pub as_path: Vec<ASN>,
    pub timestamp: i64,
    pub origin: ASN,
    pub prefix_id: u32,
    pub prefix_block_id: u32,
}

pub struct Seeder<'a> {
    topology: &'a TopologyStore,
    config: SeedingConfig,
    rng: RefCell<StdRng>,
}

impl<'a> Seeder<'a> {
    pub fn new(topology: &'a TopologyStore, config: SeedingConfig, rng_seed: u64) -> Self {
        Seeder {
            topology,
            config,
            rng: RefCell::new(StdRng::seed_from_u64(rng_seed)),
        }
    }

    /// Seeds every announcement into `rib`, pushing each one's static
    /// data into `static_pool`. `rib` must already be sized for the
    /// widest `prefix_block_id` that will be seeded.
    pub fn seed_all(
        &self,
        rib: &mut Rib,
        static_pool: &mut StaticPool,
        announcements: impl IntoIterator<Item = AnnouncementRecord>,
    ) {
        for record in announcements {
            self.seed_one(rib, static_pool, record);
        }
    }

    fn seed_one(&self, rib: &mut Rib, static_pool: &mut StaticPool, record: AnnouncementRecord) {
        // B1: empty AS_PATH -- nothing to seed, not an error.
        if record.as_path.is_empty() {
            return;
        }

        let block_id = record.prefix_block_id;
        if block_id as usize >= rib.n_prefix() {
            warn!(
                "prefix_block_id {block_id} out of range for a RIB of width {}; rejecting announcement",
                rib.n_prefix()
            );
            return;
        }

        let static_index = static_pool.push(StaticAnnouncement {
            origin_asn: record.origin,
            prefix: record.prefix,
            timestamp: record.timestamp,
            prefix_string: record.prefix_string.clone(),
            prefix_id: record.prefix_id,
            prefix_block_id: record.prefix_block_id,
        });

        self.seed_path(rib, static_pool, &record.as_path, static_index, block_id);
    }

    fn seed_path(
        &self,
        rib: &mut Rib,
        static_pool: &StaticPool,
        as_path: &[ASN],
        static_index: u32,
        block_id: u32,
    ) {
        let len = as_path.len();
        let end_index: i64 = if self.config.origin_only {
            len as i64 - 1
        } else {
            0
        };

        // Tracks the dense ID of the last hop on this walk that was
        // actually found in the topology, mirroring the original
        // extrapolator's `lastID`/`lastIDSet` (spec §4.4 step 5): the
        // fallback for `received_from_id` when the immediately
        // preceding path entry is unknown is the most recently
        // *resolved* hop, which may be several positions further
        // toward the origin if a run of unknown ASNs sits in between.
        let mut last_resolved_id: Option<ASNId> = None;

        let mut i = len as i64 - 1;
        while i >= end_index {
            let idx = i as usize;
            let asn = as_path[idx];

            let Some(asn_id) = self.topology.asn_to_id(asn) else {
                self.handle_missing_asn(rib, as_path, idx, static_index, block_id);
                i -= 1;
                continue;
            };

            // Prepending: same ASN as the previous (closer-to-vantage)
            // hop. Skip without writing; the next distinct hop absorbs
            // the inflated length.
            if idx + 1 < len && as_path[idx] == as_path[idx + 1] {
                debug!("AS {asn} prepended on path, skipping duplicate hop");
                i -= 1;
                continue;
            }

            let relationship = if idx == len - 1 {
                RelationshipClass::Origin
            } else {
                match self.topology.relationship_priority(as_path[idx + 1], asn) {
                    Some(class) => class,
                    None => {
                        debug!(
                            "no relationship record between {} and {asn}, treating as broken",
                            as_path[idx + 1]
                        );
                        RelationshipClass::BROKEN
                    }
                }
            };

            let raw_length = len - idx;
            if raw_length > crate::priority::MAX_PATH_LENGTH as usize {
                warn!(
                    "AS_PATH position {idx} would give AS {asn} path_length {raw_length}, \
                     exceeding the {}-hop ceiling; stopping this walk short",
                    crate::priority::MAX_PATH_LENGTH
                );
                break;
            }
            let new_path_length = raw_length as u8;

            let received_from_id = if idx == len - 1 {
                asn_id
            } else {
                match self.topology.asn_to_id(as_path[idx + 1]) {
                    Some(prev_id) => prev_id,
                    None => last_resolved_id.unwrap_or(asn_id),
                }
            };
            let received_from_asn = self.topology.id_to_asn(received_from_id);
            last_resolved_id = Some(asn_id);

            // Seeding orders by timestamp first (spec §9: seeded data
            // is ground truth, ordered by observation freshness), not
            // by the packed relationship/path-length priority the
            // propagator uses -- two direct observations of the same
            // prefix at the same AS are competing facts, not competing
            // routes to rank.
            let current = *rib.get(asn_id, block_id);
            let accept = if current.is_empty() {
                true
            } else {
                let new_timestamp = static_pool.get(static_index).timestamp;
                let current_timestamp = static_pool.get(current.static_index).timestamp;
                let current_from_asn = current
                    .received_from_stub_asn
                    .unwrap_or_else(|| self.topology.id_to_asn(current.received_from_id));

                self.resolve_tie(
                    new_timestamp,
                    current_timestamp,
                    relationship,
                    current.relationship_class(),
                    new_path_length,
                    current.path_length,
                    received_from_asn,
                    current_from_asn,
                )
            };

            if accept {
                let cell = rib.get_mut(asn_id, block_id);
                cell.received_from_id = received_from_id;
                cell.received_from_stub_asn = None;
                cell.path_length = new_path_length;
                cell.relationship = relationship.value();
                cell.static_index = static_index;
                cell.seeded = true;
            }

            i -= 1;
        }
    }

    /// Step 1 of spec §4.4: an AS on the path absent from the
    /// topology. If stub elision is enabled and this is the only hop
    /// being seeded, the announcement is deposited into the stub's
    /// provider instead.
    fn handle_missing_asn(
        &self,
        rib: &mut Rib,
        as_path: &[ASN],
        idx: usize,
        static_index: u32,
        block_id: u32,
    ) {
        let asn = as_path[idx];
        let single_hop = self.config.origin_only || as_path.len() == 1;

        if self.topology.is_stub_elision_enabled() && single_hop {
            if let Some(provider_id) = self.topology.stub_provider_id(asn) {
                let provider_cell = rib.get_mut(provider_id, block_id);
                if provider_cell.is_empty() {
                    provider_cell.relationship = RelationshipClass::CustomerToProvider.value();
                    provider_cell.static_index = static_index;
                    provider_cell.path_length = 2;
                    provider_cell.received_from_id = 0;
                    provider_cell.received_from_stub_asn = Some(asn);
                    provider_cell.seeded = true;
                }
                return;
            }
        }

        debug!("ASN {asn} on seeded path has no topology record, skipping hop");
    }

    /// Final step of spec §4.4: timestamp comparison, then the
    /// mandatory relationship/path-length comparison, then the
    /// configured random/lowest-ASN tie-break when relationship and
    /// path length are both equal between the incoming and current
    /// record.
    ///
    /// `PreferNewer` rejects the incoming record when it is strictly
    /// newer and accepts it when strictly older -- an inversion kept
    /// intentionally (see the seeding section of DESIGN.md).
    #[allow(clippy::too_many_arguments)]
    fn resolve_tie(
        &self,
        new_timestamp: i64,
        current_timestamp: i64,
        new_relationship: RelationshipClass,
        current_relationship: RelationshipClass,
        new_path_length: u8,
        current_path_length: u8,
        new_from_asn: ASN,
        current_from_asn: ASN,
    ) -> bool {
        match self.config.timestamp_comparison {
            TimestampComparison::Disabled => {}
            TimestampComparison::PreferNewer => {
                if new_timestamp > current_timestamp {
                    return false;
                }
                if new_timestamp < current_timestamp {
                    return true;
                }
            }
            TimestampComparison::PreferOlder => {
                if new_timestamp < current_timestamp {
                    return false;
                }
                if new_timestamp > current_timestamp {
                    return true;
                }
            }
        }

        // Timestamps equal (or disabled): the current record keeps its
        // seat if it has a strictly better relationship class or a
        // strictly shorter path length. Only when both compare exactly
        // equal does the random/lowest-ASN tie-break get a say.
        if current_relationship.value() > new_relationship.value()
            || current_path_length < new_path_length
        {
            return false;
        }
        if current_relationship == new_relationship && current_path_length == new_path_length {
            return match self.config.tiebraking_method {
                TiebrakingMethod::Random => self.rng.borrow_mut().gen_bool(0.5),
                TiebrakingMethod::PreferLowestAsn => new_from_asn <= current_from_asn,
            };
        }
        true
    }
}
