//! A configuration module generated by `cgen` at build time.
//!
//! The schema in `schema/config.yaml` exercises every field type the
//! generator supports. Tests under `tests/` load documents through the
//! generated code.

/// The generated module.
#[allow(clippy::all, clippy::pedantic)]
pub mod config {
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}

/// Markdown reference of the configuration keys.
pub const REFERENCE: &str = include_str!(concat!(env!("OUT_DIR"), "/config.md"));

pub use config::{
    load_config, load_config_str, post_process_config, try_load_config, try_load_config_str,
    Config, ConfigLeaf, Level, Mode, Proto, Server, Sub, Test,
};
