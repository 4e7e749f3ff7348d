//! Offline BGP route-propagation simulator.
//!
//! Given a static AS-relationship topology and a set of observed BGP
//! announcements, reconstructs the per-AS local RIB each AS would hold
//! under the Gao-Rexford export model and standard BGP best-path
//! tie-breaking, and can trace the full AS_PATH to any prefix's origin
//! from any AS.
//!
//! The propagation core (`priority`, `announcement`, `topology`,
//! `rib`, `seeder`, `propagator`, `policy`, `tracer`) consumes already
//! parsed records and produces an in-memory RIB; it never touches a
//! file path. The `io` module and the `extrapolate` binary are the
//! ambient collaborators that make this a runnable crate: delimited
//! loaders/writer, JSON config loading, and a CLI.

pub mod announcement;
pub mod config;
pub mod error;
pub mod graph;
pub mod io;
pub mod policy;
pub mod priority;
pub mod propagator;
pub mod relationship;
pub mod rib;
pub mod seeder;
pub mod tracer;
pub mod topology;

pub use announcement::{CachedAnnouncement, Prefix, StaticAnnouncement, StaticPool};
pub use error::{Error, Result};
pub use graph::Graph;
pub use policy::{GaoRexfordPolicy, PropagationPolicy};
pub use priority::Priority;
pub use propagator::Propagator;
pub use relationship::RelationshipClass;
pub use rib::Rib;
pub use seeder::{AnnouncementRecord, Seeder};
pub use tracer::{traceback, TraceResult, TracebackError};
pub use topology::{TopologyRecord, TopologyStore, ASN};
