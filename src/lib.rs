//! Simple to use cli for keeping a journal of fitness activities.
//! Sessions live in a plain CSV file you can open anywhere else, and the
//! same table feeds aggregate statistics, column filters and rendered charts.
//!

pub mod charts;
pub mod cli;
pub mod storage;
pub mod utils;
