use serde::{Deserialize, Serialize};

use crate::models::{EquipmentCategory, EquipmentStatus};

/// Identifier handed back by the inventory store for a created record.
pub type RecordId = String;

/// One device selected for onboarding.
///
/// Fields are kept as received so that a malformed entry fails on its own
/// instead of rejecting the whole request at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingDevice {
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mac: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default, alias = "inventory_number")]
    pub inventory_number: Option<String>,
}

impl OnboardingDevice {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            ..Self::default()
        }
    }
}

/// Attributes applied to every device of a batch unless the device overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingDefaults {
    pub category: EquipmentCategory,
    #[serde(default)]
    pub status: EquipmentStatus,
    #[serde(skip_serializing_if = "Option::is_none", default, alias = "location_department")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default, alias = "location_room")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub manufacturer: Option<String>,
}

impl Default for OnboardingDefaults {
    fn default() -> Self {
        Self {
            category: EquipmentCategory::Computer,
            status: EquipmentStatus::InStock,
            department: None,
            room: None,
            manufacturer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub devices: Vec<OnboardingDevice>,
    #[serde(default)]
    pub defaults: OnboardingDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingFailure {
    pub ip: String,
    #[serde(rename = "error")]
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRecord {
    pub ip: String,
    pub record_id: RecordId,
}

/// Summary of a bulk onboarding batch.
///
/// `created + errors` always equals the number of devices in the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResult {
    pub created: usize,
    pub errors: usize,
    pub error_details: Vec<OnboardingFailure>,
    #[serde(rename = "data")]
    pub created_records: Vec<CreatedRecord>,
}

impl OnboardingResult {
    pub fn record_success(mut self, ip: String, record_id: RecordId) -> Self {
        self.created += 1;
        self.created_records.push(CreatedRecord { ip, record_id });
        self
    }

    pub fn record_failure(mut self, ip: String, error_message: String) -> Self {
        self.errors += 1;
        self.error_details.push(OnboardingFailure { ip, error_message });
        self
    }

    pub fn total(&self) -> usize {
        self.created + self.errors
    }
}

/// Payload of one `create equipment` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentPayload {
    pub name: String,
    pub inventory_number: String,
    pub category: EquipmentCategory,
    pub status: EquipmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    pub ip_address: String,
    pub specifications: DeviceSpecifications,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpecifications {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_snake_case_aliases() {
        let json = r#"{
            "devices": [{ "ip": "10.0.0.5", "hostname": "pc-01", "mac": "AA:BB:CC:DD:EE:FF" }],
            "defaults": { "category": "printer", "status": "in_use", "location_department": "IT" }
        }"#;
        let request: OnboardingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.devices[0].hostname.as_deref(), Some("pc-01"));
        assert_eq!(request.defaults.category, EquipmentCategory::Printer);
        assert_eq!(request.defaults.status, EquipmentStatus::InUse);
        assert_eq!(request.defaults.department.as_deref(), Some("IT"));
    }

    #[test]
    fn malformed_device_fields_still_deserialize() {
        let json = r#"{ "devices": [{ "ip": "not-an-ip", "category": "toaster" }] }"#;
        let request: OnboardingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.devices[0].category.as_deref(), Some("toaster"));
        assert_eq!(request.defaults, OnboardingDefaults::default());
    }

    #[test]
    fn result_accumulates() {
        let result = OnboardingResult::default()
            .record_success("10.0.0.1".into(), "r1".into())
            .record_failure("10.0.0.2".into(), "boom".into());
        assert_eq!(result.created, 1);
        assert_eq!(result.errors, 1);
        assert_eq!(result.total(), 2);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["errorDetails"][0]["error"], "boom");
    }
}
