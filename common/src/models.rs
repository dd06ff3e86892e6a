//! # Domain Models
//!
//! Records produced by a scan pass and consumed by bulk onboarding.
//! None of them are persisted by the engine itself.

pub mod category;
pub mod credential;
pub mod device;
pub mod onboarding;
pub mod phase;

pub use category::{EquipmentCategory, EquipmentStatus};
pub use credential::DomainCredential;
pub use device::{ScanReport, ScannedDevice};
pub use onboarding::{
    CreatedRecord, DeviceSpecifications, EquipmentPayload, OnboardingDefaults, OnboardingDevice, OnboardingFailure,
    OnboardingRequest, OnboardingResult, RecordId,
};
pub use phase::ScanPhase;
