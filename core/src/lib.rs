//! # Assetscout Core
//!
//! The discovery and onboarding engine.
//!
//! * [`discovery`]: the `scan_network` use case (expand, probe, enrich, classify).
//! * [`onboarding`]: the `bulk_create_equipment` use case.
//! * [`pool`]: the fixed-size worker pool both scan phases run on.
//! * Adapters of the common ports: [`network::tcp`], [`scanner::resolver`],
//!   [`scanner::neighbor`], [`vendors`], [`inventory`] and [`store`].

pub mod classifier;
pub mod discovery;
pub mod inventory;
pub mod network;
pub mod onboarding;
pub mod pool;
pub mod scanner;
pub mod store;
pub mod vendors;

pub use discovery::DiscoveryService;
pub use onboarding::OnboardingEngine;
