//! Library components of the `fieldmap` command line tool.

pub mod logging;
pub mod pipeline;
