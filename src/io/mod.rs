//! I/O layer (spec §1 "external collaborators", made concrete per
//! `SPEC_FULL.md`): delimited-file loading/writing and the AS-list
//! parser. Kept outside the propagation core's dependency graph --
//! `io` depends on the core's record and result types, never the
//! other way around.

pub mod asn_list;
pub mod results;
pub mod tsv;
