//! # Medcat Types
//!
//! Types shared by the catalog core and its presentation layers. Currently that is [`Column`],
//! the closed set of catalog columns with their file header labels and display names.

mod column;

pub use column::{Column, ColumnError};
