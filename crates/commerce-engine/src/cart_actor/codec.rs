//! Persisted cart encoding.
//!
//! A cart is stored as one string: a version tag, then `id,quantity` pairs
//! separated by `;`:
//!
//! ```text
//! v1:1,2;7,1
//! ```
//!
//! Untagged strings are read as the same pair list. Pairs that do not parse,
//! or carry a quantity below one, are skipped rather than failing the whole
//! cart; repeated ids are merged.

use crate::model::{CartLine, ProductId};
use std::collections::BTreeMap;
use thiserror::Error;

pub const CART_ENCODING_VERSION: &str = "v1";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CodecError {
    #[error("Unsupported cart encoding version: {0}")]
    UnsupportedVersion(String),
}

/// Lines recovered from a stored cart, plus the pairs that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedCart {
    pub lines: Vec<CartLine>,
    pub skipped: Vec<String>,
}

pub fn encode(lines: &[CartLine]) -> String {
    let pairs = lines
        .iter()
        .map(|line| format!("{},{}", line.product_id.0, line.quantity))
        .collect::<Vec<_>>()
        .join(";");
    format!("{CART_ENCODING_VERSION}:{pairs}")
}

pub fn decode(raw: &str) -> Result<DecodedCart, CodecError> {
    let body = match raw.trim().split_once(':') {
        Some((version, body)) if version == CART_ENCODING_VERSION => body,
        Some((version, _)) => return Err(CodecError::UnsupportedVersion(version.to_string())),
        None => raw.trim(),
    };

    let mut merged: BTreeMap<ProductId, u32> = BTreeMap::new();
    let mut skipped = Vec::new();
    for pair in body.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        match parse_pair(pair) {
            Some((id, quantity)) => {
                let entry = merged.entry(id).or_insert(0);
                *entry = entry.saturating_add(quantity);
            }
            None => skipped.push(pair.to_string()),
        }
    }

    Ok(DecodedCart {
        lines: merged
            .into_iter()
            .map(|(id, quantity)| CartLine::new(id, quantity))
            .collect(),
        skipped,
    })
}

fn parse_pair(pair: &str) -> Option<(ProductId, u32)> {
    let (id, quantity) = pair.split_once(',')?;
    let id = id.trim().parse::<u64>().ok()?;
    let quantity = quantity.trim().parse::<u32>().ok()?;
    (quantity > 0).then_some((ProductId(id), quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_tags_version() {
        let lines = [CartLine::new(ProductId(1), 2), CartLine::new(ProductId(7), 1)];
        assert_eq!(encode(&lines), "v1:1,2;7,1");
        assert_eq!(encode(&[]), "v1:");
    }

    #[test]
    fn test_decode_reads_untagged_pairs() {
        let decoded = decode("3,1;4,2").unwrap();
        assert_eq!(
            decoded.lines,
            vec![CartLine::new(ProductId(3), 1), CartLine::new(ProductId(4), 2)]
        );
        assert!(decoded.skipped.is_empty());
    }

    #[test]
    fn test_decode_skips_malformed_pairs_and_merges_repeats() {
        let decoded = decode("v1:1,2;oops;5,0;1,3;6,-2;;8,x").unwrap();
        assert_eq!(decoded.lines, vec![CartLine::new(ProductId(1), 5)]);
        assert_eq!(decoded.skipped, vec!["oops", "5,0", "6,-2", "8,x"]);
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        assert_eq!(
            decode("v2:1,1"),
            Err(CodecError::UnsupportedVersion("v2".into()))
        );
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode("").unwrap(), DecodedCart::default());
        assert_eq!(decode("v1:").unwrap(), DecodedCart::default());
    }
}
