//! Delimited-file loaders for the two input record types of spec §6,
//! grounded on `original_source/BGPExtrapolator/src/Graphs/Graph.cpp`'s
//! `rapidcsv::Document` loading (`LoadRelationshipsCSV`,
//! `LoadAnnouncementsCSV`): columns are looked up by header name, not
//! position, so column order in the file carries no meaning -- the
//! same tolerance `rapidcsv::Document::GetCell<T>("name", row)` gives
//! the original. Built on the `csv` crate with a tab delimiter instead
//! of `rapidcsv`, since there is no Rust equivalent of that header-led
//! library in this ecosystem and `csv` + `serde` is the idiomatic
//! substitute.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::seeder::AnnouncementRecord;
use crate::topology::{TopologyRecord, ASN};

/// Raw row shape for the relationships file. List columns stay
/// strings here; `io::asn_list::parse` turns them into `Vec<ASN>`
/// after `csv` has done the column lookup.
#[derive(Debug, Deserialize)]
struct RawTopologyRow {
    asn: ASN,
    propagation_rank: u32,
    providers: String,
    peers: String,
    customers: String,
    stubs: String,
    stub: bool,
}

/// Raw row shape for the announcements file.
#[derive(Debug, Deserialize)]
struct RawAnnouncementRow {
    prefix: String,
    as_path: String,
    timestamp: i64,
    origin: ASN,
    prefix_id: u32,
    prefix_block_id: u32,
}

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)?)
}

/// Loads the relationships file of spec §6 into abstract
/// `TopologyRecord`s. Does not itself reject duplicate ASNs or unknown
/// neighbors -- those are `TopologyStore::build`'s job (spec §4.2).
pub fn load_topology(path: impl AsRef<Path>) -> Result<Vec<TopologyRecord>> {
    let mut rdr = reader(path.as_ref())?;
    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let row: RawTopologyRow = result?;
        records.push(TopologyRecord {
            asn: row.asn,
            propagation_rank: row.propagation_rank,
            providers: crate::io::asn_list::parse(&row.providers)?,
            peers: crate::io::asn_list::parse(&row.peers)?,
            customers: crate::io::asn_list::parse(&row.customers)?,
            stubs: crate::io::asn_list::parse(&row.stubs)?,
            is_stub: row.stub,
        });
    }

    Ok(records)
}

/// Loads the announcements file of spec §6 into abstract
/// `AnnouncementRecord`s. `as_path` is parsed with the same brace-list
/// parser as the relationships columns; `prefix` is parsed into an
/// `IpNetwork` in addition to being kept verbatim as `prefix_string`
/// for output.
pub fn load_announcements(path: impl AsRef<Path>) -> Result<Vec<AnnouncementRecord>> {
    let mut rdr = reader(path.as_ref())?;
    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let row: RawAnnouncementRow = result?;
        let prefix = row
            .prefix
            .parse()
            .map_err(|_| Error::MalformedRecord(format!("invalid prefix {:?}", row.prefix)))?;

        records.push(AnnouncementRecord {
            prefix_string: row.prefix,
            prefix,
            as_path: crate::io::asn_list::parse(&row.as_path)?,
            timestamp: row.timestamp,
            origin: row.origin,
            prefix_id: row.prefix_id,
            prefix_block_id: row.prefix_block_id,
        });
    }

    Ok(records)
}
