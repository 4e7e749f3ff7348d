//! Three-phase propagation sweep (spec §4.5): a single pass over the
//! topology's rank ordering is sufficient because the provider/customer
//! graph is a DAG by rank. Each AS imports from its providers, then its
//! peers, then its customers, and the overall sweep runs bottom-up then
//! top-down so every route has a chance to reach every AS in one pass.

use log::debug;

use crate::announcement::StaticPool;
use crate::policy::{PropagationPolicy, TieBreakConfig, TieBreaker};
use crate::rib::Rib;
use crate::topology::TopologyStore;

pub struct Propagator<P: PropagationPolicy> {
    policy: P,
    tie_break_config: TieBreakConfig,
    rng_seed: u64,
}

impl<P: PropagationPolicy> Propagator<P> {
    pub fn new(policy: P, tie_break_config: TieBreakConfig, rng_seed: u64) -> Self {
        Propagator {
            policy,
            tie_break_config,
            rng_seed,
        }
    }

    /// Runs the full customer->provider, peer<->peer, provider->customer
    /// sweep once. `rib` must already hold the seeded routes.
    pub fn propagate(&self, topology: &TopologyStore, rib: &mut Rib, static_pool: &StaticPool) {
        let tie_breaker = TieBreaker::new(self.tie_break_config, self.rng_seed);
        let max_rank = topology.max_rank();

        debug!("propagation phase A: customer -> provider (ranks 1..={max_rank})");
        for rank in 1..=max_rank {
            for &id in &topology.ranks()[rank] {
                self.policy
                    .process_customer_anns(topology, rib, static_pool, id, &tie_breaker);
            }
        }

        debug!("propagation phase B: peer <-> peer (all ranks)");
        for rank_ids in topology.ranks() {
            for &id in rank_ids {
                self.policy
                    .process_peer_anns(topology, rib, static_pool, id, &tie_breaker);
            }
        }

        debug!("propagation phase C: provider -> customer (ranks {max_rank}..=0, descending)");
        if max_rank > 0 {
            for rank in (0..=max_rank - 1).rev() {
                for &id in &topology.ranks()[rank] {
                    self.policy
                        .process_provider_anns(topology, rib, static_pool, id, &tie_breaker);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcement::{Prefix, StaticAnnouncement};
    use crate::policy::GaoRexfordPolicy;
    use crate::topology::TopologyRecord;
    use std::net::Ipv4Addr;

    fn prefix() -> Prefix {
        Prefix::new(std::net::IpAddr::V4(Ipv4Addr::new(1, 2, 0, 0)), 16).unwrap()
    }

    fn topo_record(asn: u32, rank: u32, providers: &[u32], peers: &[u32], customers: &[u32]) -> TopologyRecord {
        TopologyRecord {
            asn,
            propagation_rank: rank,
            providers: providers.to_vec(),
            peers: peers.to_vec(),
            customers: customers.to_vec(),
            stubs: Vec::new(),
            is_stub: false,
        }
    }

    // Scenario: basic uphill -- a route seeded at a customer leaf
    // propagates up to its provider.
    #[test]
    fn basic_uphill_propagation() {
        let topology = TopologyStore::build(
            vec![topo_record(1, 1, &[], &[], &[2]), topo_record(2, 0, &[1], &[], &[])],
            false,
        )
        .unwrap();
        let mut rib = Rib::new(topology.n_as(), 1);
        let mut pool = StaticPool::new();

        let customer_id = topology.asn_to_id(2).unwrap();
        let static_index = pool.push(StaticAnnouncement {
            origin_asn: 2,
            prefix: prefix(),
            timestamp: 0,
            prefix_string: "1.2.0.0/16".to_string(),
            prefix_id: 0,
            prefix_block_id: 0,
        });
        {
            let cell = rib.get_mut(customer_id, 0);
            cell.path_length = 1;
            cell.relationship = crate::relationship::RelationshipClass::Origin.value();
            cell.static_index = static_index;
            cell.seeded = true;
            cell.received_from_id = customer_id;
        }

        let propagator = Propagator::new(GaoRexfordPolicy, TieBreakConfig::default(), 0);
        propagator.propagate(&topology, &mut rib, &pool);

        let provider_id = topology.asn_to_id(1).unwrap();
        assert!(!rib.get(provider_id, 0).is_empty());
        assert_eq!(rib.get(provider_id, 0).path_length, 2);
    }

    // Scenario: peer routes never reach a peer's provider (Gao-Rexford
    // export rule -- peer/provider routes export only to customers).
    #[test]
    fn peer_route_does_not_climb_to_providers_provider() {
        // 3 -- peer -- 4, 3's provider is 1.
        let topology = TopologyStore::build(
            vec![
                topo_record(1, 1, &[], &[], &[3]),
                topo_record(3, 0, &[1], &[4], &[]),
                topo_record(4, 0, &[], &[3], &[]),
            ],
            false,
        )
        .unwrap();
        let mut rib = Rib::new(topology.n_as(), 1);
        let mut pool = StaticPool::new();

        let id4 = topology.asn_to_id(4).unwrap();
        let static_index = pool.push(StaticAnnouncement {
            origin_asn: 4,
            prefix: prefix(),
            timestamp: 0,
            prefix_string: "1.2.0.0/16".to_string(),
            prefix_id: 0,
            prefix_block_id: 0,
        });
        {
            let cell = rib.get_mut(id4, 0);
            cell.path_length = 1;
            cell.relationship = crate::relationship::RelationshipClass::Origin.value();
            cell.static_index = static_index;
            cell.seeded = true;
            cell.received_from_id = id4;
        }

        let propagator = Propagator::new(GaoRexfordPolicy, TieBreakConfig::default(), 0);
        propagator.propagate(&topology, &mut rib, &pool);

        let id1 = topology.asn_to_id(1).unwrap();
        assert!(rib.get(id1, 0).is_empty());
    }

    #[test]
    fn seeded_route_is_never_overwritten_by_a_propagated_one() {
        let topology = TopologyStore::build(
            vec![
                topo_record(1, 1, &[], &[], &[2, 3]),
                topo_record(2, 0, &[1], &[], &[]),
                topo_record(3, 0, &[1], &[], &[]),
            ],
            false,
        )
        .unwrap();
        let mut rib = Rib::new(topology.n_as(), 1);
        let mut pool = StaticPool::new();

        let id1 = topology.asn_to_id(1).unwrap();
        let id2 = topology.asn_to_id(2).unwrap();

        // AS 1 gets a direct seeded route, much worse priority (long path).
        let seeded_index = pool.push(StaticAnnouncement {
            origin_asn: 1,
            prefix: prefix(),
            timestamp: 0,
            prefix_string: "1.2.0.0/16".to_string(),
            prefix_id: 0,
            prefix_block_id: 0,
        });
        {
            let cell = rib.get_mut(id1, 0);
            cell.path_length = 200;
            cell.relationship = crate::relationship::RelationshipClass::CustomerToProvider.value();
            cell.static_index = seeded_index;
            cell.seeded = true;
            cell.received_from_id = id1;
        }

        // AS 2 originates a short route that would otherwise win on priority.
        let origin_index = pool.push(StaticAnnouncement {
            origin_asn: 2,
            prefix: prefix(),
            timestamp: 0,
            prefix_string: "1.2.0.0/16".to_string(),
            prefix_id: 0,
            prefix_block_id: 0,
        });
        {
            let cell = rib.get_mut(id2, 0);
            cell.path_length = 1;
            cell.relationship = crate::relationship::RelationshipClass::Origin.value();
            cell.static_index = origin_index;
            cell.seeded = true;
            cell.received_from_id = id2;
        }

        let propagator = Propagator::new(GaoRexfordPolicy, TieBreakConfig::default(), 0);
        propagator.propagate(&topology, &mut rib, &pool);

        assert_eq!(rib.get(id1, 0).path_length, 200);
        assert!(rib.get(id1, 0).seeded);
    }
}
