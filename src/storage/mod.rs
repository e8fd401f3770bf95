//!  Storage is organized through [activity_store::CsvActivityStore].
//!  The basic idea is:
//!   - One CSV file holds the whole activity table, header row first.
//!   - The table is loaded into memory in full when the store opens.
//!   - Every append rewrites the file in full. Personal logs stay small
//!     enough that simplicity wins over clever on-disk formats.

pub mod activity_store;
pub mod entities;
