//! Tracer / Result Builder (spec §4.7): reconstructs the full AS_PATH
//! to a prefix's origin by walking `received_from` back-pointers.
//! Grounded on `original_source/BGPExtrapolator/src/Graphs/Graph.cpp`'s
//! `Graph::Traceback`, including its defensive cycle check (a
//! `std::cout` "Cycle Found!" there becomes a `log::warn!` here).

use log::warn;

use crate::rib::Rib;
use crate::topology::{TopologyStore, ASN};

/// A reconstructed path, origin-last, vantage-first -- the same
/// convention as seeding input (spec §4.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceResult {
    pub as_path: Vec<ASN>,
    pub prefix_block_id: u32,
    /// Set when traceback hit a cycle and returned a partial path
    /// rather than looping forever (spec §7, `CycleInTraceback`).
    pub truncated: bool,
}

/// Expected, per-query outcomes distinct from the crate-wide
/// `error::Error` -- a caller walking thousands of traceback queries
/// checks each one individually rather than aborting a batch on the
/// first miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TracebackError {
    #[error("AS {0} has no topology record")]
    UnknownAs(ASN),
    #[error("no route for the requested prefix")]
    EmptyRoute,
}

/// Walks `received_from` back-pointers starting at `(asn, block_id)`
/// until the origin is reached, an out-of-graph next-hop (an elided
/// stub) is appended, or a cycle is detected.
pub fn traceback(
    topology: &TopologyStore,
    rib: &Rib,
    asn: ASN,
    block_id: u32,
) -> Result<TraceResult, TracebackError> {
    let mut id = topology
        .asn_to_id(asn)
        .ok_or(TracebackError::UnknownAs(asn))?;

    let mut path = Vec::new();
    let mut current_asn = asn;

    loop {
        let cell = rib.get(id, block_id);
        if cell.is_empty() && path.is_empty() {
            return Err(TracebackError::EmptyRoute);
        }

        path.push(current_asn);

        let next_asn = match cell.received_from_stub_asn {
            Some(stub_asn) => stub_asn,
            None => topology.id_to_asn(cell.received_from_id),
        };

        if next_asn == current_asn {
            return Ok(TraceResult {
                as_path: path,
                prefix_block_id: block_id,
                truncated: false,
            });
        }

        if path.contains(&next_asn) {
            warn!(
                "cycle detected tracing back AS {asn} prefix block {block_id}: \
                 {next_asn} already visited, truncating path"
            );
            return Ok(TraceResult {
                as_path: path,
                prefix_block_id: block_id,
                truncated: true,
            });
        }

        match topology.asn_to_id(next_asn) {
            Some(next_id) => {
                id = next_id;
                current_asn = next_asn;
            }
            None => {
                // Out-of-graph next-hop (e.g. an elided stub whose ASN
                // was never assigned an ID): append once and terminate.
                path.push(next_asn);
                return Ok(TraceResult {
                    as_path: path,
                    prefix_block_id: block_id,
                    truncated: false,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcement::{Prefix, StaticAnnouncement, StaticPool};
    use crate::relationship::RelationshipClass;
    use crate::topology::TopologyRecord;
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
    fn unknown_as_fails() {
        let topology = TopologyStore::build(vec![topo_record(1, 0, &[], &[])], false).unwrap();
        let rib = Rib::new(topology.n_as(), 1);
        assert_eq!(traceback(&topology, &rib, 999, 0), Err(TracebackError::UnknownAs(999)));
    }

    #[test]
    fn empty_cell_fails_with_no_route() {
        let topology = TopologyStore::build(vec![topo_record(1, 0, &[], &[])], false).unwrap();
        let rib = Rib::new(topology.n_as(), 1);
        assert_eq!(traceback(&topology, &rib, 1, 0), Err(TracebackError::EmptyRoute));
    }

    #[test]
    fn traces_a_multi_hop_path_to_the_origin() {
        let topology = TopologyStore::build(
            vec![topo_record(1, 1, &[], &[2]), topo_record(2, 0, &[1], &[])],
            false,
        )
        .unwrap();
        let mut rib = Rib::new(topology.n_as(), 1);
        let mut pool = StaticPool::new();
        let static_index = pool.push(StaticAnnouncement {
            origin_asn: 2,
            prefix: prefix(),
            timestamp: 0,
            prefix_string: "1.2.0.0/16".to_string(),
            prefix_id: 0,
            prefix_block_id: 0,
        });

        let id1 = topology.asn_to_id(1).unwrap();
        let id2 = topology.asn_to_id(2).unwrap();

        let origin_cell = rib.get_mut(id2, 0);
        origin_cell.path_length = 1;
        origin_cell.relationship = RelationshipClass::Origin.value();
        origin_cell.static_index = static_index;
        origin_cell.received_from_id = id2;

        let customer_cell = rib.get_mut(id1, 0);
        customer_cell.path_length = 2;
        customer_cell.relationship = RelationshipClass::CustomerToProvider.value();
        customer_cell.static_index = static_index;
        customer_cell.received_from_id = id2;

        let result = traceback(&topology, &rib, 1, 0).unwrap();
        assert_eq!(result.as_path, vec![1, 2]);
        assert!(!result.truncated);
    }

    #[test]
    fn stub_received_from_terminates_path_with_the_stub_asn() {
        let mut provider = topo_record(2, 0, &[], &[]);
        provider.stubs = vec![1];
        let topology = TopologyStore::build(vec![provider], true).unwrap();
        let mut rib = Rib::new(topology.n_as(), 1);
        let mut pool = StaticPool::new();
        let static_index = pool.push(StaticAnnouncement {
            origin_asn: 1,
            prefix: prefix(),
            timestamp: 0,
            prefix_string: "1.2.0.0/16".to_string(),
            prefix_id: 0,
            prefix_block_id: 0,
        });

        let provider_id = topology.asn_to_id(2).unwrap();
        let cell = rib.get_mut(provider_id, 0);
        cell.path_length = 2;
        cell.relationship = RelationshipClass::CustomerToProvider.value();
        cell.static_index = static_index;
        cell.received_from_stub_asn = Some(1);

        let result = traceback(&topology, &rib, 2, 0).unwrap();
        assert_eq!(result.as_path, vec![2, 1]);
    }

    #[test]
    fn cycle_is_detected_and_path_truncated() {
        // Construct a cell whose received_from points back to a
        // non-origin AS already on the path, simulating a corrupted
        // RIB the tracer must defend against (spec §7 CycleInTraceback).
        let topology = TopologyStore::build(
            vec![topo_record(1, 0, &[], &[2]), topo_record(2, 0, &[], &[1])],
            false,
        )
        .unwrap();
        let mut rib = Rib::new(topology.n_as(), 1);

        let id1 = topology.asn_to_id(1).unwrap();
        let id2 = topology.asn_to_id(2).unwrap();

        let cell1 = rib.get_mut(id1, 0);
        cell1.path_length = 2;
        cell1.relationship = RelationshipClass::PeerToPeer.value();
        cell1.received_from_id = id2;

        let cell2 = rib.get_mut(id2, 0);
        cell2.path_length = 2;
        cell2.relationship = RelationshipClass::PeerToPeer.value();
        cell2.received_from_id = id1;

        let result = traceback(&topology, &rib, 1, 0).unwrap();
        assert!(result.truncated);
        assert_eq!(result.as_path, vec![1, 2]);
    }
}
