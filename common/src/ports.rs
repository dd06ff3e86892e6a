//! # Outbound Ports
//!
//! Contracts for everything the engine asks of the outside world: the
//! network, the local neighbor cache, remote hosts and the inventory store.
//!
//! ## Rules
//! 1. All items here must be `traits` (plus the plain records they exchange).
//! 2. No concrete implementations allowed. Those live in `assetscout-core`.
//! 3. Every port is `Send + Sync` so it can be shared across worker tasks.

pub mod equipment_store;
pub mod hostname_resolver;
pub mod liveness_probe;
pub mod neighbor_table;
pub mod remote_inventory;
pub mod vendor_repository;

pub use equipment_store::EquipmentStore;
pub use hostname_resolver::HostnameResolver;
pub use liveness_probe::LivenessProbe;
pub use neighbor_table::NeighborTable;
pub use remote_inventory::{HostInventory, RemoteInventory};
pub use vendor_repository::VendorRepository;

pub use pnet::datalink::MacAddr;
