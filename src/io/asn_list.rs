//! Brace-delimited ASN list parser (spec §6): `{1,2,3}` or `{}` /
//! `{ }` for empty, the column format the relationships TSV packs
//! adjacency lists into. Parsed with `str::split` rather than a
//! hand-rolled scanner, since Rust's standard parsing is no slower and
//! a lot more readable.

use crate::error::{Error, Result};
use crate::topology::ASN;

/// Parses a brace-delimited, comma-separated list of ASNs. Tolerates
/// surrounding whitespace around the braces and around each token.
/// `{}` and `{ }` both parse to an empty list. A literal `0` is
/// rejected: ASN 0 is a reserved sentinel (spec §6).
pub fn parse(s: &str) -> Result<Vec<ASN>> {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| Error::MalformedRecord(format!("ASN list not brace-delimited: {s:?}")))?;

    let inner = inner.trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|token| {
            let token = token.trim();
            let asn: ASN = token
                .parse()
                .map_err(|_| Error::MalformedRecord(format!("invalid ASN token {token:?} in {s:?}")))?;
            if asn == 0 {
                return Err(Error::MalformedRecord(format!(
                    "ASN 0 is a reserved sentinel, found in {s:?}"
                )));
            }
            Ok(asn)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_braces_parse_to_empty_list() {
        assert_eq!(parse("{}").unwrap(), Vec::<ASN>::new());
        assert_eq!(parse("{ }").unwrap(), Vec::<ASN>::new());
    }

    #[test]
    fn parses_comma_separated_asns() {
        assert_eq!(parse("{1,2,3}").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse("  { 1, 2 , 3 }  ").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn rejects_non_brace_delimited_input() {
        assert!(parse("1,2,3").is_err());
    }

    #[test]
    fn rejects_literal_zero_sentinel() {
        assert!(parse("{0}").is_err());
        assert!(parse("{1,0,2}").is_err());
    }
}
