//! Adapters of the [`EquipmentStore`](assetscout_common::ports::EquipmentStore) port.

pub mod http;
pub mod memory;

pub use http::HttpEquipmentStore;
pub use memory::MemoryEquipmentStore;
