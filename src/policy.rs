//! Policy abstraction (spec §4.6): the injectable per-AS comparator
//! used by the propagator. `GaoRexfordPolicy` is the default, and only,
//! implementation this crate ships, but the trait boundary is kept so
//! alternative comparators (route-origin validation, tier-aware
//! policies) can be substituted without touching the sweep in
//! `propagator`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

use crate::announcement::StaticPool;
use crate::relationship::RelationshipClass;
use crate::rib::Rib;
use crate::topology::{ASNId, TopologyStore};

/// Tie-break policy applied when two candidate routes compare equal on
/// everything the packed priority encodes (seeded flag, relationship
/// class, path length). Mirrors the seeding-configuration enum of
/// spec §6, since the propagator's step 6 reuses the same options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampComparison {
    Disabled,
    PreferNewer,
    PreferOlder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreakMethod {
    Random,
    LowestAsn,
}

#[derive(Debug, Clone, Copy)]
pub struct TieBreakConfig {
    pub timestamp_comparison: TimestampComparison,
    pub method: TieBreakMethod,
}

impl Default for TieBreakConfig {
    fn default() -> Self {
        TieBreakConfig {
            timestamp_comparison: TimestampComparison::Disabled,
            method: TieBreakMethod::LowestAsn,
        }
    }
}

/// Owned by the policy instance, seeded per run -- never a
/// process-wide singleton (spec §5, §9).
pub struct TieBreaker {
    config: TieBreakConfig,
    rng: RefCell<StdRng>,
}

impl TieBreaker {
    pub fn new(config: TieBreakConfig, seed: u64) -> Self {
        TieBreaker {
            config,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Returns `true` if the incoming (`new`) announcement should
    /// replace the current one, given they are equal in (seeded,
    /// relationship, path_length). `new_received_from_asn` is the ASN
    /// of the sender the incoming route would be credited to.
    fn accept(
        &self,
        current_received_from_asn: u32,
        new_timestamp: i64,
        current_timestamp: i64,
        new_received_from_asn: u32,
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

        match self.config.method {
            TieBreakMethod::Random => self.rng.borrow_mut().gen_bool(0.5),
            TieBreakMethod::LowestAsn => new_received_from_asn <= current_received_from_asn,
        }
    }
}

/// Per-AS comparator capability (spec §4.6).
pub trait PropagationPolicy {
    fn process_provider_anns(
        &self,
        topology: &TopologyStore,
        rib: &mut Rib,
        static_pool: &StaticPool,
        receiver_id: ASNId,
        tie_breaker: &TieBreaker,
    );

    fn process_peer_anns(
        &self,
        topology: &TopologyStore,
        rib: &mut Rib,
        static_pool: &StaticPool,
        receiver_id: ASNId,
        tie_breaker: &TieBreaker,
    );

    fn process_customer_anns(
        &self,
        topology: &TopologyStore,
        rib: &mut Rib,
        static_pool: &StaticPool,
        receiver_id: ASNId,
        tie_breaker: &TieBreaker,
    );
}

/// The default Gao-Rexford comparator described in spec §4.5.
#[derive(Debug, Default, Clone, Copy)]
pub struct GaoRexfordPolicy;

impl GaoRexfordPolicy {
    /// Shared body for all three propagation directions: scan every
    /// neighbor of `edge_class`, compare each of their cells against
    /// the receiver's for the same prefix, and accept if strictly
    /// better.
    fn process_neighbors(
        &self,
        topology: &TopologyStore,
        rib: &mut Rib,
        static_pool: &StaticPool,
        receiver_id: ASNId,
        neighbors: &[crate::topology::AsnIdPair],
        edge_class: RelationshipClass,
        tie_breaker: &TieBreaker,
    ) {
        let n_prefix = rib.n_prefix() as u32;

        for neighbor in neighbors {
            for block_id in 0..n_prefix {
                let (receiver_cell, sender_cell) =
                    rib.get_pair_mut(receiver_id, neighbor.id, block_id);

                if sender_cell.is_empty() {
                    continue;
                }
                if receiver_cell.seeded {
                    continue;
                }

                // Spec §7 "PathTooLong": stop extending rather than
                // overflow the 254-length ceiling `Priority` encodes
                // (a length of 255 would itself trip the encoding's
                // own debug assertion the next time this cell is
                // compared as a sender).
                let new_len = match sender_cell.path_length.checked_add(1) {
                    Some(len) if len <= crate::priority::MAX_PATH_LENGTH => len,
                    _ => continue,
                };

                let accept = if receiver_cell.is_empty() {
                    true
                } else {
                    let incoming_priority =
                        crate::priority::Priority::new(false, edge_class, new_len).pack();
                    let current_priority = crate::priority::Priority::new(
                        false,
                        receiver_cell.relationship_class(),
                        receiver_cell.path_length,
                    )
                    .pack();

                    if incoming_priority > current_priority {
                        true
                    } else if incoming_priority < current_priority {
                        false
                    } else {
                        let new_static = static_pool.get(sender_cell.static_index);
                        let current_static = static_pool.get(receiver_cell.static_index);
                        let new_from_asn = topology.id_to_asn(neighbor.id);
                        let current_from_asn = if let Some(stub_asn) =
                            receiver_cell.received_from_stub_asn
                        {
                            stub_asn
                        } else {
                            topology.id_to_asn(receiver_cell.received_from_id)
                        };

                        tie_breaker.accept(
                            current_from_asn,
                            new_static.timestamp,
                            current_static.timestamp,
                            new_from_asn,
                        )
                    }
                };

                if accept {
                    receiver_cell.accept_propagated(
                        neighbor.id,
                        new_len,
                        edge_class,
                        sender_cell.static_index,
                    );
                }
            }
        }
    }
}

impl PropagationPolicy for GaoRexfordPolicy {
    fn process_provider_anns(
        &self,
        topology: &TopologyStore,
        rib: &mut Rib,
        static_pool: &StaticPool,
        receiver_id: ASNId,
        tie_breaker: &TieBreaker,
    ) {
        self.process_neighbors(
            topology,
            rib,
            static_pool,
            receiver_id,
            topology.providers_of(receiver_id),
            RelationshipClass::ProviderToCustomer,
            tie_breaker,
        );
    }

    fn process_peer_anns(
        &self,
        topology: &TopologyStore,
        rib: &mut Rib,
        static_pool: &StaticPool,
        receiver_id: ASNId,
        tie_breaker: &TieBreaker,
    ) {
        self.process_neighbors(
            topology,
            rib,
            static_pool,
            receiver_id,
            topology.peers_of(receiver_id),
            RelationshipClass::PeerToPeer,
            tie_breaker,
        );
    }

    fn process_customer_anns(
        &self,
        topology: &TopologyStore,
        rib: &mut Rib,
        static_pool: &StaticPool,
        receiver_id: ASNId,
        tie_breaker: &TieBreaker,
    ) {
        self.process_neighbors(
            topology,
            rib,
            static_pool,
            receiver_id,
            topology.customers_of(receiver_id),
            RelationshipClass::CustomerToProvider,
            tie_breaker,
        );
    }
}
