//! Import pipeline for the retail analytics store.
//!
//! Reads a flat sales table (a SQLite table or a CSV file), resolves its
//! columns, and writes the normalized entities through any
//! [`retail_core::store::RetailStore`].
//!
//! # Quick start
//!
//! ```rust,ignore
//! use retail_import::{ImportOptions, SourceTable, run_import};
//!
//! let source = SourceTable::from_csv_path("online_retail.csv")?;
//! let summary = run_import(&store, &source, &ImportOptions::default()).await?;
//! println!("{} invoice lines", summary.invoice_lines);
//! ```

pub mod columns;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod source;

pub use columns::{ColumnMap, LogicalColumn};
pub use error::{Error, Result};
pub use pipeline::{ImportOptions, ImportRun, ImportSummary, run_import};
pub use source::{DEFAULT_SOURCE_TABLE, SourceTable};
