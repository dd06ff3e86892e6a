use std::time::Duration;

use assetscout_common::error::CreateError;
use assetscout_common::models::{EquipmentPayload, RecordId};
use assetscout_common::ports::EquipmentStore;
use reqwest::StatusCode;
use serde_json::Value;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Inventory service reached over HTTP (`POST {base}/equipment`).
pub struct HttpEquipmentStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpEquipmentStore {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn equipment_url(&self) -> String {
        format!("{}/equipment", self.base_url)
    }
}

#[async_trait::async_trait]
impl EquipmentStore for HttpEquipmentStore {
    async fn create_equipment(&self, payload: &EquipmentPayload) -> Result<RecordId, CreateError> {
        let mut request = self.client.post(self.equipment_url()).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CreateError::Persistence(e.without_url().to_string()))?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return record_id(&body)
                .ok_or_else(|| CreateError::Persistence("response carried no record id".to_string()));
        }
        Err(classify_failure(status, &body))
    }
}

/// `{"data": {"id": ..}}` or `{"id": ..}`, numeric or string.
fn record_id(body: &Value) -> Option<RecordId> {
    let id = body.pointer("/data/id").or_else(|| body.get("id"))?;
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn classify_failure(status: StatusCode, body: &Value) -> CreateError {
    let message = body
        .get("error")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("inventory service answered HTTP {status}"));

    match status {
        StatusCode::CONFLICT => CreateError::DuplicateInventoryKey(message),
        StatusCode::BAD_REQUEST if message.to_lowercase().contains("already exists") => {
            CreateError::DuplicateInventoryKey(message)
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => CreateError::Validation(message),
        _ => CreateError::Persistence(message),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
