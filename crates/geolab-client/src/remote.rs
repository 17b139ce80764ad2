//! The remote sync contract and its wire types.

use std::future::Future;

use geolab_model::FormKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Server acknowledgement of a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub id: u64,
    #[serde(rename = "numero_ensayo", default)]
    pub report_number: String,
    #[serde(rename = "numero_ot", default)]
    pub work_order: String,
    #[serde(rename = "estado", default)]
    pub status: String,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub object_key: Option<String>,
    #[serde(rename = "fecha_creacion", default)]
    pub created_at: Option<String>,
    #[serde(rename = "fecha_actualizacion", default)]
    pub updated_at: Option<String>,
    /// Form-specific summary values computed by the server.
    #[serde(flatten)]
    pub computed: Map<String, Value>,
}

/// One row of a report listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: u64,
    #[serde(rename = "numero_ensayo", default)]
    pub report_number: String,
    #[serde(rename = "numero_ot", default)]
    pub work_order: String,
    #[serde(rename = "cliente", default)]
    pub client: Option<String>,
    #[serde(rename = "muestra", default)]
    pub sample_code: Option<String>,
    #[serde(rename = "fecha_documento", default)]
    pub document_date: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: String,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub object_key: Option<String>,
    #[serde(rename = "fecha_creacion", default)]
    pub created_at: Option<String>,
    #[serde(rename = "fecha_actualizacion", default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub computed: Map<String, Value>,
}

/// A stored report: its summary plus the submitted record, if kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub summary: ReportSummary,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// A generated spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    /// Id of the saved report, when the server reported it.
    pub report_id: Option<u64>,
}

/// Save, export and fetch of reports on the remote service.
///
/// Payloads are the wire JSON of a report. `report_id` `None` creates a new
/// report; `Some` updates that one.
pub trait RemoteSync: Send + Sync + 'static {
    fn save(
        &self,
        kind: FormKind,
        payload: Value,
        report_id: Option<u64>,
    ) -> impl Future<Output = Result<SaveReceipt>> + Send;

    fn save_and_export(
        &self,
        kind: FormKind,
        payload: Value,
        report_id: Option<u64>,
    ) -> impl Future<Output = Result<ExportArtifact>> + Send;

    fn fetch_by_id(
        &self,
        kind: FormKind,
        report_id: u64,
    ) -> impl Future<Output = Result<ReportDetail>> + Send;

    fn list(
        &self,
        kind: FormKind,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ReportSummary>>> + Send;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn detail_keeps_payload_out_of_computed() {
        let detail: ReportDetail = serde_json::from_value(json!({
            "id": 5,
            "numero_ensayo": "EA-0005",
            "numero_ot": "120-26",
            "estado": "GUARDADO",
            "equivalente_arena_promedio_pct": 96.0,
            "payload": {"muestra": "1-SU-26"},
        }))
        .unwrap();
        assert_eq!(detail.summary.id, 5);
        assert_eq!(detail.payload, Some(json!({"muestra": "1-SU-26"})));
        assert_eq!(
            detail.summary.computed.get("equivalente_arena_promedio_pct"),
            Some(&json!(96.0))
        );
        assert!(!detail.summary.computed.contains_key("payload"));
    }

    #[test]
    fn null_payload_is_none() {
        let detail: ReportDetail =
            serde_json::from_value(json!({"id": 1, "payload": null})).unwrap();
        assert_eq!(detail.payload, None);
    }
}
