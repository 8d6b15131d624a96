#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
//!
//! ## Feature flags
#![doc = document_features::document_features!(feature_label = r#"<span class="stab portability"><code>{feature}</code></span>"#)]

// This must go FIRST so that all the other modules see its macros.
mod fmt;

/// The register interface between an `embedded-hal` SPI device and a LoRa chip
pub mod interface;
/// Parameters and errors used across the crate
pub mod mod_params;
/// Traits implemented externally or internally to support control of LoRa chips
pub mod mod_traits;
/// Configuration sequences for Semtech SX1272 and SX1276/77/78/79 chips
pub mod sx127x;

pub use interface::SpiInterface;
pub use mod_params::{RadioError, RadioParameters};
pub use mod_traits::RegisterBus;
pub use sx127x::{Config, Configurator, Sx1272, Sx1276};
