//! Configuration sources, in precedence order: global file, then environment.

pub mod environment;
pub mod global_file;
