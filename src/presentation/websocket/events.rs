//! Server Event Types
//!
//! The fixed set of events the gateway pushes to clients, serialized as
//! `{"event": <name>, "data": <payload>}` with camelCase payload fields
//! to match what the SPA consumes.

use serde::{Deserialize, Serialize};

/// Severity of a system-wide alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

/// Events delivered over the gateway.
///
/// `UserJoinedDiagnosis` and `UserLeftDiagnosis` are emitted by the room
/// manager itself; external producers are not allowed to send them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    DiagnosisStatusUpdate(DiagnosisStatusPayload),
    AgentStatusUpdate(AgentStatusPayload),
    DebateUpdate(DebatePayload),
    AnalysisProgress(AnalysisProgressPayload),
    DiagnosisComplete(DiagnosisCompletePayload),
    UploadProgress(UploadProgressPayload),
    UploadComplete(UploadCompletePayload),
    Notification(NotificationPayload),
    SystemAlert(SystemAlertPayload),
    UserJoinedDiagnosis(RoomPresencePayload),
    UserLeftDiagnosis(RoomPresencePayload),
}

impl ServerEvent {
    /// Get the event name as it appears on the wire.
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerEvent::DiagnosisStatusUpdate(_) => "diagnosis_status_update",
            ServerEvent::AgentStatusUpdate(_) => "agent_status_update",
            ServerEvent::DebateUpdate(_) => "debate_update",
            ServerEvent::AnalysisProgress(_) => "analysis_progress",
            ServerEvent::DiagnosisComplete(_) => "diagnosis_complete",
            ServerEvent::UploadProgress(_) => "upload_progress",
            ServerEvent::UploadComplete(_) => "upload_complete",
            ServerEvent::Notification(_) => "notification",
            ServerEvent::SystemAlert(_) => "system_alert",
            ServerEvent::UserJoinedDiagnosis(_) => "user_joined_diagnosis",
            ServerEvent::UserLeftDiagnosis(_) => "user_left_diagnosis",
        }
    }

    /// Presence notices are room-manager-internal and rejected from
    /// producer endpoints.
    pub fn is_presence(&self) -> bool {
        matches!(
            self,
            ServerEvent::UserJoinedDiagnosis(_) | ServerEvent::UserLeftDiagnosis(_)
        )
    }
}

/// Overall diagnosis workflow status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisStatusPayload {
    pub session_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A single analysis agent changing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatusPayload {
    pub session_id: String,
    pub agent_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

/// One utterance in the debate phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebatePayload {
    pub session_id: String,
    pub round: u32,
    pub speaker: String,
    pub content: String,
}

/// Per-modality analysis progress (fNIRS, EEG, audio, video, text).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisProgressPayload {
    pub session_id: String,
    pub modality: String,
    pub progress: u8,
}

/// Final report assembled; shape of the report is owned by the producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisCompletePayload {
    pub session_id: String,
    pub report: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgressPayload {
    pub session_id: String,
    pub file_id: String,
    pub progress: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCompletePayload {
    pub session_id: String,
    pub file_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// User-facing notification, delivered to one user's connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub title: String,
    pub message: String,
}

/// System-wide alert, broadcast to every live connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemAlertPayload {
    pub level: AlertLevel,
    pub message: String,
}

/// Emitted to a room when an observer joins or leaves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPresencePayload {
    pub session_id: String,
    pub connection_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}
