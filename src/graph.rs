//! Top-level orchestrator tying the core components together, mirroring
//! `original_source/BGPExtrapolator/include/Graphs/Graph.hpp`'s `Graph`
//! class: one object owning the topology store, the RIB matrix, and
//! the static announcement pool, exposing `seed`, `propagate`,
//! `traceback`, and the two reset operations as its public surface.
//! Analogous in role to a simulation engine's top-level session object,
//! adapted to own a RIB matrix and static pool instead of a per-AS
//! policy store.

use crate::announcement::StaticPool;
use crate::config::{PropagationConfig, SeedingConfig};
use crate::policy::GaoRexfordPolicy;
use crate::propagator::Propagator;
use crate::rib::Rib;
use crate::seeder::{AnnouncementRecord, Seeder};
use crate::tracer::{self, TraceResult, TracebackError};
use crate::topology::{TopologyRecord, TopologyStore, ASN};

/// Owns every mutable structure a run touches: the immutable topology
/// store, the RIB matrix (allocated once, reset in place per spec
/// §5), and the static announcement pool (grown during seeding,
/// immutable after).
pub struct Graph {
    topology: TopologyStore,
    rib: Rib,
    static_pool: StaticPool,
}

impl Graph {
    /// Builds the topology store from abstract records, verifies it is
    /// acyclic (spec §9), and allocates a RIB matrix sized for
    /// `n_prefix` dense prefix blocks. Returns `Err` only for the
    /// load-time fatal conditions of spec §4.2/§7 (duplicate ASN,
    /// cyclic topology) -- never for a single malformed adjacency
    /// entry, which is warned and skipped.
    pub fn build(
        records: impl IntoIterator<Item = TopologyRecord>,
        n_prefix: usize,
        stub_elision: bool,
    ) -> crate::error::Result<Graph> {
        let topology = TopologyStore::build(records, stub_elision)?;
        topology.detect_cycles()?;
        let rib = Rib::new(topology.n_as(), n_prefix);

        Ok(Graph {
            topology,
            rib,
            static_pool: StaticPool::new(),
        })
    }

    pub fn topology(&self) -> &TopologyStore {
        &self.topology
    }

    pub fn rib(&self) -> &Rib {
        &self.rib
    }

    pub fn static_pool(&self) -> &StaticPool {
        &self.static_pool
    }

    /// Seeds every observed announcement into the RIB (spec §4.4).
    pub fn seed(
        &mut self,
        announcements: impl IntoIterator<Item = AnnouncementRecord>,
        config: SeedingConfig,
        rng_seed: u64,
    ) {
        let seeder = Seeder::new(&self.topology, config, rng_seed);
        seeder.seed_all(&mut self.rib, &mut self.static_pool, announcements);
    }

    /// Runs the three-phase Gao-Rexford sweep once (spec §4.5) using
    /// the default policy.
    pub fn propagate(&mut self, config: PropagationConfig) {
        let propagator = Propagator::new(
            GaoRexfordPolicy,
            config.into(),
            config.rng_seed,
        );
        propagator.propagate(&self.topology, &mut self.rib, &self.static_pool);
    }

    /// Reconstructs the AS_PATH from `asn` to the origin of whatever is
    /// in its RIB for `block_id` (spec §4.7).
    pub fn traceback(&self, asn: ASN, block_id: u32) -> Result<TraceResult, TracebackError> {
        tracer::traceback(&self.topology, &self.rib, asn, block_id)
    }

    /// Bulk-clears the RIB to all-empty (spec §4.3).
    pub fn reset_all(&mut self) {
        self.rib.reset_all();
    }

    /// Bulk-clears the RIB, leaving seeded cells untouched (spec §4.3,
    /// used by the idempotent-reset property P5).
    pub fn reset_non_seeded(&mut self) {
        self.rib.reset_non_seeded();
    }
}

/// Exposed for callers that want to run a custom `PropagationPolicy`
/// against an already-built `Graph` without going through
/// `Graph::propagate` -- e.g. to compare the default Gao-Rexford
/// comparator against a future ROV-aware one (spec §4.6).
pub fn propagate_with<P: crate::policy::PropagationPolicy>(
    graph: &mut Graph,
    policy: P,
    config: PropagationConfig,
) {
    let propagator = Propagator::new(policy, config.into(), config.rng_seed);
    propagator.propagate(&graph.topology, &mut graph.rib, &graph.static_pool);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcement::Prefix;
    use std::net::Ipv4Addr;

    fn prefix() -> Prefix {
        Prefix::new(std::net::IpAddr::V4(Ipv4Addr::new(1, 2, 0, 0)), 16).unwrap()
    }

    fn topo_record(asn: ASN, rank: u32, providers: &[ASN], customers: &[ASN]) -> TopologyRecord {
        TopologyRecord {
            asn,
            propagation_rank: rank,
            providers: providers.to_vec(),
            peers: Vec::new(),
            customers: customers.to_vec(),
            stubs: Vec::new(),
            is_stub: false,
        }
    }

    #[test]
    fn seed_propagate_and_traceback_roundtrip() {
        let mut graph = Graph::build(
            vec![topo_record(1, 1, &[], &[2]), topo_record(2, 0, &[1], &[])],
            1,
            false,
        )
        .unwrap();

        graph.seed(
            vec![AnnouncementRecord {
                prefix_string: "1.2.0.0/16".to_string(),
                prefix: prefix(),
                as_path: vec![2],
                timestamp: 100,
                origin: 2,
                prefix_id: 0,
                prefix_block_id: 0,
            }],
            SeedingConfig::default(),
            0,
        );
        graph.propagate(PropagationConfig::default());

        let result = graph.traceback(1, 0).unwrap();
        assert_eq!(result.as_path, vec![1, 2]);
    }

    #[test]
    fn reset_all_non_seeded_is_idempotent_under_reproagation() {
        let mut graph = Graph::build(
            vec![topo_record(1, 1, &[], &[2]), topo_record(2, 0, &[1], &[])],
            1,
            false,
        )
        .unwrap();
        graph.seed(
            vec![AnnouncementRecord {
                prefix_string: "1.2.0.0/16".to_string(),
                prefix: prefix(),
                as_path: vec![2],
                timestamp: 100,
                origin: 2,
                prefix_id: 0,
                prefix_block_id: 0,
            }],
            SeedingConfig::default(),
            0,
        );
        graph.propagate(PropagationConfig::default());
        let first = graph.traceback(1, 0).unwrap();

        graph.reset_non_seeded();
        graph.propagate(PropagationConfig::default());
        let second = graph.traceback(1, 0).unwrap();

        assert_eq!(first, second);
    }
}
