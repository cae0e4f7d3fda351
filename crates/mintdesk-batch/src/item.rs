//! Work items and their expansion into units.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// One row of batch input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkItem {
  /// Mint `count` tokens to `address`, one call per token.
  Recipient { address: String, count: NonZeroU32 },
  /// List a single token.
  Token { token_id: String },
}

impl WorkItem {
  pub fn recipient(address: impl Into<String>, count: NonZeroU32) -> Self {
    Self::Recipient {
      address: address.into(),
      count,
    }
  }

  pub fn token(token_id: impl Into<String>) -> Self {
    Self::Token {
      token_id: token_id.into(),
    }
  }

  /// The key recorded when one of this item's units fails.
  pub fn key(&self) -> &str {
    match self {
      WorkItem::Recipient { address, .. } => address,
      WorkItem::Token { token_id } => token_id,
    }
  }

  /// Number of units this item expands to.
  pub fn unit_count(&self) -> u32 {
    match self {
      WorkItem::Recipient { count, .. } => count.get(),
      WorkItem::Token { .. } => 1,
    }
  }
}

/// A single phase invocation's worth of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnit {
  /// Position in visitation order, starting at zero.
  pub ordinal: usize,
  /// Index of the source item.
  pub item_index: usize,
  /// Zero-based repetition within the item.
  pub repetition: u32,
  /// Total repetitions of the source item.
  pub repetitions: u32,
  /// Address or token id.
  pub key: String,
}

impl WorkUnit {
  /// Operator-facing description of the unit.
  pub fn label(&self) -> String {
    if self.repetitions > 1 {
      format!("{} ({}/{})", self.key, self.repetition + 1, self.repetitions)
    } else {
      self.key.clone()
    }
  }
}

/// Expand items into units: source order first, then repetition order.
pub fn expand_units(items: &[WorkItem]) -> Vec<WorkUnit> {
  let mut units = Vec::with_capacity(total_units(items));
  for (item_index, item) in items.iter().enumerate() {
    let repetitions = item.unit_count();
    for repetition in 0..repetitions {
      units.push(WorkUnit {
        ordinal: units.len(),
        item_index,
        repetition,
        repetitions,
        key: item.key().to_string(),
      });
    }
  }
  units
}

pub fn total_units(items: &[WorkItem]) -> usize {
  items.iter().map(|item| item.unit_count() as usize).sum()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn count(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
  }

  #[test]
  fn test_expand_recipients_in_order() {
    let items = vec![
      WorkItem::recipient("0xAAA", count(2)),
      WorkItem::recipient("0xBBB", count(1)),
    ];

    let units = expand_units(&items);
    let keys: Vec<_> = units.iter().map(|u| u.key.as_str()).collect();
    assert_eq!(keys, vec!["0xAAA", "0xAAA", "0xBBB"]);
    assert_eq!(units[1].repetition, 1);
    assert_eq!(units[2].item_index, 1);
    assert_eq!(units[2].ordinal, 2);
    assert_eq!(total_units(&items), 3);
  }

  #[test]
  fn test_expand_tokens() {
    let items = vec![WorkItem::token("7"), WorkItem::token("8")];

    let units = expand_units(&items);
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].label(), "7");
    assert_eq!(total_units(&items), 2);
  }

  #[test]
  fn test_label_shows_repetition() {
    let units = expand_units(&[WorkItem::recipient("0xAAA", count(3))]);
    assert_eq!(units[2].label(), "0xAAA (3/3)");
  }

  #[test]
  fn test_empty_source() {
    assert!(expand_units(&[]).is_empty());
    assert_eq!(total_units(&[]), 0);
  }

  #[test]
  fn test_serde_shape() {
    let item: WorkItem =
      serde_json::from_str(r#"{"kind":"recipient","address":"0xAAA","count":2}"#).unwrap();
    assert_eq!(item, WorkItem::recipient("0xAAA", count(2)));

    let zero = serde_json::from_str::<WorkItem>(r#"{"kind":"recipient","address":"0xAAA","count":0}"#);
    assert!(zero.is_err());
  }
}
