use crate::topology::ASN;

/// Crate-wide error type.
///
/// Only load-time and I/O conditions are represented here. The
/// recoverable per-record conditions of the seeder and propagator
/// (unknown ASN on a path, broken relationship, prepending, path too
/// long, traceback cycles) are handled in place and logged, never
/// raised as `Error` -- a single malformed announcement must not abort
/// a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate ASN {0} in relationships input")]
    DuplicateAsn(ASN),

    #[error("topology contains a cycle in the provider graph; propagation requires a DAG")]
    CyclicTopology,

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
