//! # Config Crate
//!
//! Centralized configuration for the meshdd pipeline.
//! Every tunable value used by the sampler, the classifier and the split
//! pipeline is defined here, and the settings structs are passed explicitly
//! into the components that need them. Nothing reads ambient global state.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::DEFAULT_THRESHOLD;
//! use config::settings::{MaskConfig, SamplerConfig, SamplingPolicy};
//!
//! let sampler = SamplerConfig::default();
//! assert_eq!(sampler.policy, SamplingPolicy::Nearest);
//!
//! let mask = MaskConfig::new(DEFAULT_THRESHOLD, false).unwrap();
//! assert!(mask.accepts(200.0));
//! assert!(!mask.accepts(10.0));
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Explicit**: Settings are values handed to each call, never globals
//! - **Validated**: Constructors reject non-finite or negative parameters

pub mod constants;
pub mod settings;

pub use settings::{
    ConfigError, FileSplitConfig, MaskConfig, SamplerConfig, SamplingPolicy, SplitConfig,
};

#[cfg(test)]
mod tests;
