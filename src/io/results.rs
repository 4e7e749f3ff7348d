//! Results writer (spec §6), grounded on
//! `original_source/BGPExtrapolator/src/Graphs/Graph.cpp`'s
//! `GenerateTracebackResultsCSV`: one row per (AS, prefix), the
//! `as_path` column brace-delimited in the same vantage-first order
//! the tracer returns it in. `block_id` is always written as `0`,
//! matching the original's single-block output (spec §6).

use std::io::Write;
use std::path::Path;

use crate::announcement::StaticAnnouncement;
use crate::error::Result;
use crate::tracer::TraceResult;

/// One row of the results file: a traced path plus the static
/// attributes of the announcement it traces (spec §6's output shape).
pub struct ResultRow<'a> {
    pub static_data: &'a StaticAnnouncement,
    pub trace: &'a TraceResult,
}

/// Writes the results TSV. Empty cells are never passed in by the
/// caller (the core skips them per spec §6), so this writer has no
/// filtering logic of its own.
pub fn write(path: impl AsRef<Path>, rows: &[ResultRow<'_>]) -> Result<()> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_to(&mut out, rows)
}

fn write_to(out: &mut impl Write, rows: &[ResultRow<'_>]) -> Result<()> {
    writeln!(out, "prefix\ttimestamp\torigin\tprefix_id\tblock_id\tprefix_block_id\tas_path")?;

    for row in rows {
        write!(
            out,
            "{}\t{}\t{}\t{}\t0\t{}\t{{",
            row.static_data.prefix_string,
            row.static_data.timestamp,
            row.static_data.origin_asn,
            row.static_data.prefix_id,
            row.trace.prefix_block_id,
        )?;

        for (i, asn) in row.trace.as_path.iter().enumerate() {
            if i > 0 {
                write!(out, ",")?;
            }
            write!(out, "{asn}")?;
        }

        writeln!(out, "}}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcement::Prefix;
    use std::net::Ipv4Addr;

    fn prefix() -> Prefix {
        Prefix::new(std::net::IpAddr::V4(Ipv4Addr::new(1, 2, 0, 0)), 16).unwrap()
    }

    #[test]
    fn writes_header_and_brace_delimited_path() {
        let static_data = StaticAnnouncement {
            origin_asn: 3,
            prefix: prefix(),
            timestamp: 100,
            prefix_string: "1.2.0.0/16".to_string(),
            prefix_id: 7,
            prefix_block_id: 0,
        };
        let trace = TraceResult {
            as_path: vec![1, 2, 3],
            prefix_block_id: 0,
            truncated: false,
        };
        let rows = vec![ResultRow {
            static_data: &static_data,
            trace: &trace,
        }];

        let mut buf = Vec::new();
        write_to(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("prefix\ttimestamp\torigin\tprefix_id\tblock_id\tprefix_block_id\tas_path\n"));
        assert!(text.contains("1.2.0.0/16\t100\t3\t7\t0\t0\t{1,2,3}\n"));
    }
}
