//! Terminal presentation helpers.

pub mod output_format;
