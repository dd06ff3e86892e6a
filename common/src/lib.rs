//! # Assetscout Common
//!
//! Shared vocabulary of the asset discovery workspace.
//!
//! * **[`models`]**: scan and onboarding records exchanged with the presentation layer.
//! * **[`network`]**: scan targets, address ranges and local interface detection.
//! * **[`ports`]**: traits the engine depends on (probing, enrichment, inventory).
//! * **[`error`]**: the error taxonomy shared by every stage.
//! * **[`config`]**: policy constants for scans and onboarding batches.

pub mod config;
pub mod error;
pub mod log;
pub mod models;
pub mod network;
pub mod ports;
