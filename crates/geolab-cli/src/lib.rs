//! Library components of the `geolab` command-line tool.

pub mod logging;
pub mod settings;
