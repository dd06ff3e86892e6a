use crate::error::CreateError;
use crate::models::{EquipmentPayload, RecordId};

/// The inventory system that receives onboarded devices.
#[async_trait::async_trait]
pub trait EquipmentStore: Send + Sync {
    /// Creates one equipment record and returns its identifier.
    async fn create_equipment(&self, payload: &EquipmentPayload) -> Result<RecordId, CreateError>;
}
