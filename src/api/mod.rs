//! API Module - process boundary
//!
//! CLI parsing, batch decode/encode and the score command.

pub mod cli;
pub mod commands;
pub mod io;
