//! Topology Store (spec §4.2): ASN <-> dense-ID bijection, per-AS
//! adjacency lists, propagation ranks, and the stub-elision map.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::error::{Error, Result};
use crate::relationship::RelationshipClass;

pub type ASN = u32;
/// Dense index assigned at topology load time, `id in [0, n_as)`.
pub type ASNId = u32;

/// Abstract input record for a single AS, as described in spec §4.2 and
/// §6. Loaders (e.g. `io::tsv`) produce these; `TopologyStore::build`
/// consumes them without knowing how they were read.
#[derive(Debug, Clone, Default)]
pub struct TopologyRecord {
    pub asn: ASN,
    pub propagation_rank: u32,
    pub providers: Vec<ASN>,
    pub peers: Vec<ASN>,
    pub customers: Vec<ASN>,
    pub stubs: Vec<ASN>,
    pub is_stub: bool,
}

/// A small pair caching an ASN alongside its dense ID, so the hot path
/// never re-hashes a neighbor's ASN to find its ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsnIdPair {
    pub asn: ASN,
    pub id: ASNId,
}

#[derive(Debug, Default)]
pub struct TopologyStore {
    asn_to_id: HashMap<ASN, ASNId>,
    id_to_asn: Vec<ASN>,

    providers_of: Vec<Vec<AsnIdPair>>,
    peers_of: Vec<Vec<AsnIdPair>>,
    customers_of: Vec<Vec<AsnIdPair>>,

    ranks: Vec<u32>,
    rank_to_ids: Vec<Vec<ASNId>>,

    /// Priority of the edge walked from `from` to `to`, keyed on the
    /// raw ASN pair (used only by the seeder, which walks AS_PATHs by
    /// ASN rather than by ID). Populated symmetrically: a customer's
    /// provider edge inserts both directions.
    relationship_priority: HashMap<(ASN, ASN), RelationshipClass>,

    stub_elision_enabled: bool,
    stub_asn_to_provider_id: HashMap<ASN, ASNId>,
}

impl TopologyStore {
    pub fn build(
        records: impl IntoIterator<Item = TopologyRecord>,
        stub_elision: bool,
    ) -> Result<TopologyStore> {
        let mut records: Vec<TopologyRecord> = records.into_iter().collect();
        records.sort_by_key(|r| r.asn);

        let mut store = TopologyStore {
            stub_elision_enabled: stub_elision,
            ..Default::default()
        };

        let mut seen_asns: HashSet<ASN> = HashSet::new();
        let mut max_rank = 0u32;
        let mut kept_records: Vec<&TopologyRecord> = Vec::with_capacity(records.len());

        for record in &records {
            if !seen_asns.insert(record.asn) {
                return Err(Error::DuplicateAsn(record.asn));
            }

            if stub_elision && record.is_stub {
                continue;
            }

            let id = store.id_to_asn.len() as ASNId;
            store.asn_to_id.insert(record.asn, id);
            store.id_to_asn.push(record.asn);
            max_rank = max_rank.max(record.propagation_rank);
            kept_records.push(record);
        }

        store.providers_of.resize(kept_records.len(), Vec::new());
        store.peers_of.resize(kept_records.len(), Vec::new());
        store.customers_of.resize(kept_records.len(), Vec::new());
        store.ranks.resize(kept_records.len(), 0);
        store.rank_to_ids.resize(max_rank as usize + 1, Vec::new());

        for record in &records {
            // Relationship priority is recorded regardless of stub
            // elision: the provider of a stub must still be able to
            // look up the priority of the edge to that stub ASN
            // (spec §4.2 build step 3 note).
            for &provider in &record.providers {
                store
                    .relationship_priority
                    .insert((record.asn, provider), RelationshipClass::CustomerToProvider);
                store
                    .relationship_priority
                    .insert((provider, record.asn), RelationshipClass::ProviderToCustomer);
            }
            for &peer in &record.peers {
                store
                    .relationship_priority
                    .insert((record.asn, peer), RelationshipClass::PeerToPeer);
                store
                    .relationship_priority
                    .insert((peer, record.asn), RelationshipClass::PeerToPeer);
            }
            for &customer in &record.customers {
                store
                    .relationship_priority
                    .insert((record.asn, customer), RelationshipClass::ProviderToCustomer);
                store
                    .relationship_priority
                    .insert((customer, record.asn), RelationshipClass::CustomerToProvider);
            }

            for &stub_asn in &record.stubs {
                if let Some(&provider_id) = store.asn_to_id.get(&record.asn) {
                    store.stub_asn_to_provider_id.insert(stub_asn, provider_id);
                }
            }
        }

        for record in kept_records {
            let id = store.asn_to_id[&record.asn];
            store.ranks[id as usize] = record.propagation_rank;
            store.rank_to_ids[record.propagation_rank as usize].push(id);

            store.providers_of[id as usize] =
                Self::resolve_neighbors(&store.asn_to_id, &record.providers, record.asn);
            store.peers_of[id as usize] =
                Self::resolve_neighbors(&store.asn_to_id, &record.peers, record.asn);
            store.customers_of[id as usize] =
                Self::resolve_neighbors(&store.asn_to_id, &record.customers, record.asn);
        }

        Ok(store)
    }

    fn resolve_neighbors(
        asn_to_id: &HashMap<ASN, ASNId>,
        neighbors: &[ASN],
        owner_asn: ASN,
    ) -> Vec<AsnIdPair> {
        let mut resolved = Vec::with_capacity(neighbors.len());
        for &asn in neighbors {
            match asn_to_id.get(&asn) {
                Some(&id) => resolved.push(AsnIdPair { asn, id }),
                None => warn!(
                    "AS {owner_asn}: neighbor ASN {asn} has no topology record, skipping edge"
                ),
            }
        }
        resolved
    }

    /// DFS cycle check over the provider graph (spec §9, "Cyclic
    /// graphs"). Run before rank assignment so a cyclic input topology
    /// is refused rather than silently producing undefined propagation
    /// semantics.
    pub fn detect_cycles(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            InProgress,
            Done,
        }

        let mut marks: HashMap<ASNId, Mark> = HashMap::new();

        for start in 0..self.id_to_asn.len() as ASNId {
            if marks.contains_key(&start) {
                continue;
            }
            let mut stack: Vec<(ASNId, usize)> = vec![(start, 0)];
            let mut path: Vec<ASNId> = vec![start];
            marks.insert(start, Mark::InProgress);

            while let Some(&mut (node, ref mut next_child)) = stack.last_mut() {
                let providers = &self.providers_of[node as usize];
                if *next_child < providers.len() {
                    let child = providers[*next_child].id;
                    *next_child += 1;

                    match marks.get(&child) {
                        Some(Mark::InProgress) => return Err(Error::CyclicTopology),
                        Some(Mark::Done) => continue,
                        None => {
                            marks.insert(child, Mark::InProgress);
                            path.push(child);
                            stack.push((child, 0));
                        }
                    }
                } else {
                    stack.pop();
                    path.pop();
                    marks.insert(node, Mark::Done);
                }
            }
        }

        Ok(())
    }

    pub fn n_as(&self) -> usize {
        self.id_to_asn.len()
    }

    pub fn max_rank(&self) -> usize {
        self.rank_to_ids.len().saturating_sub(1)
    }

    pub fn ranks(&self) -> &[Vec<ASNId>] {
        &self.rank_to_ids
    }

    pub fn rank_of(&self, id: ASNId) -> u32 {
        self.ranks[id as usize]
    }

    pub fn asn_to_id(&self, asn: ASN) -> Option<ASNId> {
        self.asn_to_id.get(&asn).copied()
    }

    pub fn id_to_asn(&self, id: ASNId) -> ASN {
        self.id_to_asn[id as usize]
    }

    pub fn providers_of(&self, id: ASNId) -> &[AsnIdPair] {
        &self.providers_of[id as usize]
    }

    pub fn peers_of(&self, id: ASNId) -> &[AsnIdPair] {
        &self.peers_of[id as usize]
    }

    pub fn customers_of(&self, id: ASNId) -> &[AsnIdPair] {
        &self.customers_of[id as usize]
    }

    pub fn relationship_priority(&self, from_asn: ASN, to_asn: ASN) -> Option<RelationshipClass> {
        self.relationship_priority.get(&(from_asn, to_asn)).copied()
    }

    pub fn is_stub_elision_enabled(&self) -> bool {
        self.stub_elision_enabled
    }

    pub fn stub_provider_id(&self, stub_asn: ASN) -> Option<ASNId> {
        self.stub_asn_to_provider_id.get(&stub_asn).copied()
    }

    pub fn is_known_stub(&self, asn: ASN) -> bool {
        self.stub_asn_to_provider_id.contains_key(&asn)
    }
}
