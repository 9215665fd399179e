//! Loading and exporting tables.
//!
//! Tables are plain delimited text: comma-separated by default, tab-separated
//! for `.tsv` files. The first row is the header; columns are positional.
//! Fields that look like numbers become numeric cells, the rest stay text.
//!
//! ## Example
//!
//! ```rust,no_run
//! use name_recon::parsing::table::{read_table, write_table_file};
//! use std::path::Path;
//!
//! let dataset = read_table(Path::new("catalog.csv")).unwrap();
//! write_table_file(&dataset, Path::new("catalog.tsv")).unwrap();
//! ```

pub mod table;
