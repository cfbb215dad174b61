//! Keyword-based product categorization.
//!
//! A [`CategoryTable`] is an ordered list of rules. Classification upper-cases
//! the description and walks the rules in declaration order; the first rule
//! with any keyword occurring as a substring wins. Reordering the rules
//! changes the output, so the order is part of the table's contract.

use serde::{Deserialize, Serialize};

/// One category and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
  pub name:     String,
  /// Stored upper-cased; matched as substrings of the upper-cased description.
  pub keywords: Vec<String>,
}

impl CategoryRule {
  pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
    Self {
      name:     name.into(),
      keywords: keywords.iter().map(|k| k.to_uppercase()).collect(),
    }
  }

  fn matches(&self, upper_description: &str) -> bool {
    self
      .keywords
      .iter()
      .any(|k| upper_description.contains(k.as_str()))
  }
}

/// Ordered category rules plus the catch-all used when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
  rules:    Vec<CategoryRule>,
  fallback: String,
}

impl CategoryTable {
  pub fn new(rules: Vec<CategoryRule>, fallback: impl Into<String>) -> Self {
    Self { rules, fallback: fallback.into() }
  }

  /// The retail catalogue's categories. `HEART` appears under both Home Decor
  /// and Seasonal; Home Decor is declared first and therefore wins.
  pub fn standard() -> Self {
    Self::new(
      vec![
        CategoryRule::new("Home Decor", &[
          "DECOR", "DECORATION", "BAUBLE", "HEART", "GLASS", "METAL", "DOOR",
          "WALL", "FRAME", "MIRROR", "CUSHION", "CANDLE",
        ]),
        CategoryRule::new("Stationery", &[
          "PENCIL", "PEN", "NOTEBOOK", "PAPER", "TAPE", "CHAR", "ENVELOPE",
          "CARD", "STICKER", "LABEL", "BOOK", "DIARY",
        ]),
        CategoryRule::new("Toys", &[
          "TOY", "GAME", "PUZZLE", "DOLL", "BEAR", "BALL", "BLOCK", "TRAIN",
          "CAR", "ANIMAL", "PLUSH",
        ]),
        CategoryRule::new("Accessories", &[
          "BAG", "PURSE", "WALLET", "SCARF", "HAT", "GLOVE", "BELT", "JEWEL",
          "BRACELET", "NECKLACE", "RING", "WATCH",
        ]),
        CategoryRule::new("Seasonal", &[
          "CHRISTMAS", "EASTER", "HALLOWEEN", "VALENTINE", "SANTA", "EGG",
          "PUMPKIN", "HEART", "TREE", "STAR", "SNOW",
        ]),
      ],
      "Accessories",
    )
  }

  pub fn rules(&self) -> &[CategoryRule] { &self.rules }

  pub fn fallback(&self) -> &str { &self.fallback }

  /// Category name for a product description.
  pub fn classify(&self, description: &str) -> &str {
    let upper = description.to_uppercase();
    self
      .rules
      .iter()
      .find(|rule| rule.matches(&upper))
      .map(|rule| rule.name.as_str())
      .unwrap_or(&self.fallback)
  }
}

impl Default for CategoryTable {
  fn default() -> Self { Self::standard() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_category_match() {
    let table = CategoryTable::standard();
    assert_eq!(table.classify("WHITE METAL LANTERN"), "Home Decor");
    assert_eq!(table.classify("SPACEBOY NOTEBOOK"), "Stationery");
    assert_eq!(table.classify("JIGSAW PUZZLE"), "Toys");
    assert_eq!(table.classify("JUMBO SHOPPER BAG"), "Accessories");
    assert_eq!(table.classify("PAINTED EASTER EGG"), "Seasonal");
  }

  #[test]
  fn first_declared_category_wins() {
    let table = CategoryTable::standard();
    // HEART is a Home Decor and a Seasonal keyword.
    assert_eq!(table.classify("RED HEART DECOR"), "Home Decor");
    assert_eq!(table.classify("HEART OF WICKER"), "Home Decor");
    // CARD (Stationery) beats CAR (Toys).
    assert_eq!(table.classify("CHRISTMAS CARD"), "Stationery");
  }

  #[test]
  fn reordering_rules_changes_output() {
    let seasonal = CategoryRule::new("Seasonal", &["HEART"]);
    let decor = CategoryRule::new("Home Decor", &["HEART"]);
    let a = CategoryTable::new(vec![decor.clone(), seasonal.clone()], "Other");
    let b = CategoryTable::new(vec![seasonal, decor], "Other");
    assert_eq!(a.classify("heart"), "Home Decor");
    assert_eq!(b.classify("heart"), "Seasonal");
  }

  #[test]
  fn no_match_uses_fallback() {
    let table = CategoryTable::standard();
    assert_eq!(table.classify("POSTAGE"), "Accessories");
    assert_eq!(table.classify(""), "Accessories");

    let custom = CategoryTable::new(vec![], "Misc");
    assert_eq!(custom.classify("anything"), "Misc");
  }

  #[test]
  fn matching_is_case_insensitive() {
    let table = CategoryTable::standard();
    assert_eq!(table.classify("glass jar"), "Home Decor");
    let lower = CategoryTable::new(vec![CategoryRule::new("Toys", &["toy"])], "Other");
    assert_eq!(lower.classify("TOY SOLDIER"), "Toys");
  }
}
