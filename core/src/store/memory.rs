use std::sync::Mutex;

use assetscout_common::error::CreateError;
use assetscout_common::models::{EquipmentPayload, RecordId};
use assetscout_common::ports::EquipmentStore;

/// In-process store enforcing unique inventory numbers and IP addresses.
///
/// Backs `--dry-run` and tests.
#[derive(Default)]
pub struct MemoryEquipmentStore {
    records: Mutex<Vec<(RecordId, EquipmentPayload)>>,
}

impl MemoryEquipmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored record, in creation order.
    pub fn records(&self) -> Vec<(RecordId, EquipmentPayload)> {
        self.records.lock().map(|records| records.clone()).unwrap_or_default()
    }

    pub fn contains_ip(&self, ip: &str) -> bool {
        self.records().iter().any(|(_, payload)| payload.ip_address == ip)
    }
}

#[async_trait::async_trait]
impl EquipmentStore for MemoryEquipmentStore {
    async fn create_equipment(&self, payload: &EquipmentPayload) -> Result<RecordId, CreateError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| CreateError::Persistence("memory store lock poisoned".to_string()))?;

        if records
            .iter()
            .any(|(_, existing)| existing.inventory_number == payload.inventory_number)
        {
            return Err(CreateError::DuplicateInventoryKey(payload.inventory_number.clone()));
        }
        if records.iter().any(|(_, existing)| existing.ip_address == payload.ip_address) {
            return Err(CreateError::DuplicateInventoryKey(payload.ip_address.clone()));
        }

        let record_id = format!("mem-{}", records.len() + 1);
        records.push((record_id.clone(), payload.clone()));
        Ok(record_id)
    }
}
