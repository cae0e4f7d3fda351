//! CSV ingestion for batch sources.
//!
//! Neither file has a header row. Recipients are `address,count`; tokens are a
//! single `tokenId` column (extra columns are ignored).

use std::io::Read;
use std::num::NonZeroU32;
use std::path::Path;

use anyhow::{Context, Result, bail};
use mintdesk_batch::WorkItem;
use mintdesk_config::is_address;

fn reader<R: Read>(source: R) -> csv::Reader<R> {
  csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(source)
}

pub fn read_recipients(path: &Path) -> Result<Vec<WorkItem>> {
  let file = std::fs::File::open(path)
    .with_context(|| format!("failed to open recipients file: {}", path.display()))?;
  parse_recipients(file).with_context(|| format!("invalid recipients file: {}", path.display()))
}

pub fn read_tokens(path: &Path) -> Result<Vec<WorkItem>> {
  let file = std::fs::File::open(path)
    .with_context(|| format!("failed to open tokens file: {}", path.display()))?;
  parse_tokens(file).with_context(|| format!("invalid tokens file: {}", path.display()))
}

/// Rows missing either column are skipped. Every malformed address is
/// reported at once so the operator can fix the file in one pass.
pub fn parse_recipients<R: Read>(source: R) -> Result<Vec<WorkItem>> {
  let mut rows = Vec::new();
  for record in reader(source).records() {
    let record = record?;
    let address = record.get(0).unwrap_or_default();
    let count = record.get(1).unwrap_or_default();
    if address.is_empty() || count.is_empty() {
      continue;
    }
    rows.push((address.to_string(), count.to_string()));
  }

  let bad: Vec<&str> = rows
    .iter()
    .filter(|(address, _)| !is_address(address))
    .map(|(address, _)| address.as_str())
    .collect();
  if !bad.is_empty() {
    bail!("invalid addresses:\n{}", bad.join("\n"));
  }

  rows
    .into_iter()
    .map(|(address, count)| {
      let count: NonZeroU32 = count
        .parse()
        .with_context(|| format!("count for {address} must be a positive integer, got '{count}'"))?;
      Ok(WorkItem::recipient(address, count))
    })
    .collect()
}

/// Rows with an empty first column are skipped.
pub fn parse_tokens<R: Read>(source: R) -> Result<Vec<WorkItem>> {
  let mut items = Vec::new();
  for record in reader(source).records() {
    let record = record?;
    match record.get(0) {
      Some(token_id) if !token_id.is_empty() => items.push(WorkItem::token(token_id)),
      _ => continue,
    }
  }
  Ok(items)
}

#[cfg(test)]
mod tests {
  use super::*;

  const A: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
  const B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

  fn count(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
  }

  #[test]
  fn test_parse_recipients() {
    let csv = format!("{A},2\n{B}, 1 \n");
    let items = parse_recipients(csv.as_bytes()).unwrap();
    assert_eq!(items, vec![
      WorkItem::recipient(A, count(2)),
      WorkItem::recipient(B, count(1)),
    ]);
  }

  #[test]
  fn test_incomplete_recipient_rows_are_dropped() {
    let csv = format!("{A},2\n{B}\n,3\n\n{B},\n");
    let items = parse_recipients(csv.as_bytes()).unwrap();
    assert_eq!(items, vec![WorkItem::recipient(A, count(2))]);
  }

  #[test]
  fn test_all_bad_addresses_reported() {
    let csv = format!("0x123,1\n{A},1\nnot-an-address,2\n");
    let err = parse_recipients(csv.as_bytes()).unwrap_err().to_string();
    assert!(err.contains("0x123"));
    assert!(err.contains("not-an-address"));
    assert!(!err.contains(A));
  }

  #[test]
  fn test_address_rule_matches_config() {
    let candidates = [A, B, "0XAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", "0xAAAA", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"];
    for address in candidates {
      let csv = format!("{address},1\n");
      assert_eq!(
        parse_recipients(csv.as_bytes()).is_ok(),
        is_address(address),
        "{address}"
      );
    }
  }

  #[test]
  fn test_counts_must_be_positive() {
    for bad in ["0", "-1", "two", "1.5"] {
      let csv = format!("{A},{bad}\n");
      assert!(parse_recipients(csv.as_bytes()).is_err(), "{bad} accepted");
    }
  }

  #[test]
  fn test_parse_tokens() {
    let items = parse_tokens("101\n\n102,extra\n,103\n 104 \n".as_bytes()).unwrap();
    assert_eq!(items, vec![
      WorkItem::token("101"),
      WorkItem::token("102"),
      WorkItem::token("104"),
    ]);
  }

  #[test]
  fn test_read_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.csv");
    std::fs::write(&path, "1\n2\n").unwrap();

    assert_eq!(read_tokens(&path).unwrap().len(), 2);
    assert!(read_tokens(&dir.path().join("missing.csv")).is_err());
  }
}
