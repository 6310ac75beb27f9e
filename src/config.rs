//! Configuration file parsing and validation

pub mod gate_toml;

pub use gate_toml::{
    ColorOption, CollaboratorsConfig, CommandConfig, Config, GateMeta, OutputConfig,
    OutputFormat, RuleDefinition, RuleEntry, RuleSetConfig,
};
