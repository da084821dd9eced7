//! I/O module
//!
//! Handles contact file parsing and output.
//!
//! # Components
//!
//! - `csv_format` - Format handling (tokenizing, materializing, serializing)
//! - `contact_reader` - Contact file reader with iterator interface

pub mod contact_reader;
pub mod csv_format;

pub use contact_reader::ContactReader;
pub use csv_format::{
    materialize_row, read_rows, serialize_row, tokenize_line, write_contacts_csv, RawRow,
};
