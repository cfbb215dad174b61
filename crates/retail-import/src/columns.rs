//! Fuzzy column-name resolution.
//!
//! Source exports disagree on header spelling (`InvoiceNo` vs `Invoice`,
//! `UnitPrice` vs `Price`, stray whitespace, arbitrary case). The resolver maps
//! each [`LogicalColumn`] to the index of the first header that matches its
//! name or alias after trimming and case-folding.

use std::fmt;

use crate::{Error, Result};

const COLUMN_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalColumn {
  Country,
  CustomerId,
  StockCode,
  Description,
  InvoiceNo,
  InvoiceDate,
  Quantity,
  UnitPrice,
}

impl LogicalColumn {
  /// Every required column, in resolution order.
  pub const ALL: [LogicalColumn; COLUMN_COUNT] = [
    LogicalColumn::Country,
    LogicalColumn::CustomerId,
    LogicalColumn::StockCode,
    LogicalColumn::Description,
    LogicalColumn::InvoiceNo,
    LogicalColumn::InvoiceDate,
    LogicalColumn::Quantity,
    LogicalColumn::UnitPrice,
  ];

  pub fn name(self) -> &'static str {
    match self {
      LogicalColumn::Country => "Country",
      LogicalColumn::CustomerId => "CustomerID",
      LogicalColumn::StockCode => "StockCode",
      LogicalColumn::Description => "Description",
      LogicalColumn::InvoiceNo => "InvoiceNo",
      LogicalColumn::InvoiceDate => "InvoiceDate",
      LogicalColumn::Quantity => "Quantity",
      LogicalColumn::UnitPrice => "UnitPrice",
    }
  }

  pub fn alias(self) -> Option<&'static str> {
    match self {
      LogicalColumn::InvoiceNo => Some("Invoice"),
      LogicalColumn::UnitPrice => Some("Price"),
      _ => None,
    }
  }

  fn matches(self, header: &str) -> bool {
    let header = header.trim();
    header.eq_ignore_ascii_case(self.name())
      || self.alias().is_some_and(|a| header.eq_ignore_ascii_case(a))
  }

  fn slot(self) -> usize { self as usize }
}

impl fmt::Display for LogicalColumn {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Logical column → header index, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
  indices: [usize; COLUMN_COUNT],
}

impl ColumnMap {
  /// Resolve every logical column against `headers`, failing on the first
  /// one that has no match.
  pub fn resolve<H: AsRef<str>>(headers: &[H]) -> Result<Self> {
    let mut indices = [0; COLUMN_COUNT];
    for column in LogicalColumn::ALL {
      indices[column.slot()] = headers
        .iter()
        .position(|h| column.matches(h.as_ref()))
        .ok_or(Error::MissingColumn(column.name()))?;
    }
    Ok(Self { indices })
  }

  pub fn index(&self, column: LogicalColumn) -> usize { self.indices[column.slot()] }

  /// `(logical name, actual header)` pairs, for logging the mapping.
  pub fn describe<'h, H: AsRef<str>>(&self, headers: &'h [H]) -> Vec<(&'static str, &'h str)> {
    LogicalColumn::ALL
      .iter()
      .map(|&c| (c.name(), headers[self.index(c)].as_ref()))
      .collect()
  }

  /// A typed view over one source row.
  pub fn record<'r>(&'r self, row: &'r [Option<String>]) -> SourceRecord<'r> {
    SourceRecord { columns: self, row }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct SourceRecord<'r> {
  columns: &'r ColumnMap,
  row:     &'r [Option<String>],
}

impl<'r> SourceRecord<'r> {
  /// The cell for `column`, or `None` when null or past the end of a short
  /// row.
  pub fn get(&self, column: LogicalColumn) -> Option<&'r str> {
    self
      .row
      .get(self.columns.index(column))
      .and_then(|cell| cell.as_deref())
  }
}
