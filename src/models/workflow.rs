use serde::{Deserialize, Serialize};
use tracing::warn;

/// A call that opens an event stream on the workflow endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WorkflowRequest {
    Run {
        workflow_id: String,
        parameters: serde_json::Value,
    },
    Resume {
        workflow_id: String,
        event_id: String,
        resume_data: String,
        interrupt_type: i64,
    },
}

/// One decoded `event:`/`data:` block of a server-sent event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseFrame {
    pub id: Option<String>,
    pub event: Option<String>,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub node_title: Option<String>,
    #[serde(default)]
    pub node_is_finish: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorEvent {
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterruptEvent {
    pub event_id: String,
    pub interrupt_type: i64,
    pub node_title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InterruptEnvelope {
    interrupt_data: InterruptData,
    #[serde(default)]
    node_title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InterruptData {
    event_id: String,
    #[serde(rename = "type")]
    interrupt_type: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    Message(MessageEvent),
    Error(ErrorEvent),
    Interrupt(InterruptEvent),
    Done,
    Ping,
    Unknown(String),
}

impl WorkflowEvent {
    /// Malformed frames become `Unknown` so one bad frame does not end the stream.
    pub fn from_frame(frame: &SseFrame) -> Self {
        let name = frame.event.as_deref().unwrap_or("");
        let parsed = match name {
            "Message" => serde_json::from_str(&frame.data).map(WorkflowEvent::Message),
            "Error" => serde_json::from_str(&frame.data).map(WorkflowEvent::Error),
            "Interrupt" => serde_json::from_str::<InterruptEnvelope>(&frame.data).map(|envelope| {
                WorkflowEvent::Interrupt(InterruptEvent {
                    event_id: envelope.interrupt_data.event_id,
                    interrupt_type: envelope.interrupt_data.interrupt_type,
                    node_title: envelope.node_title,
                })
            }),
            "Done" => Ok(WorkflowEvent::Done),
            "PING" => Ok(WorkflowEvent::Ping),
            other => Ok(WorkflowEvent::Unknown(other.to_string())),
        };

        parsed.unwrap_or_else(|e| {
            warn!(
                event = name,
                error = %e,
                data = %frame.data,
                "Malformed workflow event"
            );
            WorkflowEvent::Unknown(name.to_string())
        })
    }
}

/// What the publisher saw while driving the workflow streams.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishReport {
    pub streams_opened: usize,
    pub messages: Vec<String>,
    pub errors: Vec<String>,
    pub interrupts: usize,
    pub resumes_skipped: usize,
    pub completed: bool,
}
