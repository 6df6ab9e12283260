//! Library side of the `tbrecon` binary: logging setup and the end-to-end
//! pipeline, kept here so they can be tested without spawning a process.

pub mod logging;
pub mod pipeline;
pub mod types;
