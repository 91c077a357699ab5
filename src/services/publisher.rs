use std::collections::VecDeque;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::clients::{CozeClient, HttpClient};
use crate::config::{CozeConfig, Credentials, Settings};
use crate::error::Result;
use crate::models::{PublishPayload, PublishReport, WorkflowEvent, WorkflowRequest};

/// An open workflow event stream.
#[async_trait]
pub trait EventStream: Send {
    async fn next_event(&mut self) -> Result<Option<WorkflowEvent>>;
}

/// Starts or resumes workflow runs.
#[async_trait]
pub trait WorkflowTransport: Send + Sync {
    async fn open(&self, request: &WorkflowRequest) -> Result<Box<dyn EventStream>>;
}

/// Sends the digest to the publishing workflow and drives it through interrupts.
pub struct Publisher {
    transport: Arc<dyn WorkflowTransport>,
    workflow_id: String,
    resume_data: String,
    max_resumes: usize,
}

impl Publisher {
    pub fn new(transport: Arc<dyn WorkflowTransport>, workflow_id: &str, config: &CozeConfig) -> Self {
        Self {
            transport,
            workflow_id: workflow_id.to_string(),
            resume_data: config.resume_data.clone(),
            max_resumes: config.max_resumes,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let token = Credentials::require(&settings.credentials.coze_api_token, "coze_api_token")?;
        let workflow_id = Credentials::require(&settings.credentials.workflow_id, "workflow_id")?;
        let client = CozeClient::new(HttpClient::plain()?, &settings.coze.base_url, token);
        Ok(Self::new(Arc::new(client), workflow_id, &settings.coze))
    }

    /// Streams are handled one after another; each interrupt queues a resume
    /// of the same run, up to `max_resumes` in total.
    pub async fn publish(&self, payload: &PublishPayload) -> Result<PublishReport> {
        let mut report = PublishReport::default();
        let mut pending = VecDeque::from([WorkflowRequest::Run {
            workflow_id: self.workflow_id.clone(),
            parameters: payload.to_parameters()?,
        }]);
        let mut resumes = 0;

        info!(
            workflow_id = %self.workflow_id,
            products = payload.products.len(),
            "Publishing digest"
        );

        while let Some(request) = pending.pop_front() {
            let mut stream = self.transport.open(&request).await?;
            report.streams_opened += 1;

            while let Some(event) = stream.next_event().await? {
                match event {
                    WorkflowEvent::Message(message) => {
                        info!(
                            node = message.node_title.as_deref().unwrap_or(""),
                            content = message.content.as_deref().unwrap_or(""),
                            "Workflow message"
                        );
                        report.messages.push(message.content.unwrap_or_default());
                    }
                    WorkflowEvent::Error(err) => {
                        let text = format!(
                            "{}: {}",
                            err.error_code.unwrap_or_default(),
                            err.error_message.unwrap_or_default()
                        );
                        warn!(error = %text, "Workflow reported an error");
                        report.errors.push(text);
                    }
                    WorkflowEvent::Interrupt(interrupt) => {
                        report.interrupts += 1;
                        if resumes >= self.max_resumes {
                            warn!(
                                event_id = %interrupt.event_id,
                                max_resumes = self.max_resumes,
                                "Resume limit reached, leaving workflow interrupted"
                            );
                            report.resumes_skipped += 1;
                            continue;
                        }

                        info!(
                            event_id = %interrupt.event_id,
                            interrupt_type = interrupt.interrupt_type,
                            "Workflow interrupted, queueing resume"
                        );
                        resumes += 1;
                        pending.push_back(WorkflowRequest::Resume {
                            workflow_id: self.workflow_id.clone(),
                            event_id: interrupt.event_id,
                            resume_data: self.resume_data.clone(),
                            interrupt_type: interrupt.interrupt_type,
                        });
                    }
                    WorkflowEvent::Done => {
                        debug!("Workflow stream done");
                        report.completed = true;
                    }
                    WorkflowEvent::Ping => {}
                    WorkflowEvent::Unknown(name) => debug!(event = %name, "Ignoring workflow event"),
                }
            }
        }

        info!(
            streams = report.streams_opened,
            messages = report.messages.len(),
            errors = report.errors.len(),
            interrupts = report.interrupts,
            "Digest handed to workflow"
        );
        Ok(report)
    }
}
