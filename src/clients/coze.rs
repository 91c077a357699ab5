use async_trait::async_trait;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use rquest::Response;
use serde::Deserialize;
use tracing::{debug, error};

use crate::clients::http::HttpClient;
use crate::clients::sse::SseDecoder;
use crate::error::{Error, Result};
use crate::models::{WorkflowEvent, WorkflowRequest};
use crate::services::publisher::{EventStream, WorkflowTransport};

const STREAM_RUN_PATH: &str = "/v1/workflow/stream_run";
const STREAM_RESUME_PATH: &str = "/v1/workflow/stream_resume";

/// Streams workflow runs from the Coze open API.
pub struct CozeClient {
    http: HttpClient,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
}

impl CozeClient {
    pub fn new(http: HttpClient, base_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn endpoint(&self, request: &WorkflowRequest) -> String {
        let path = match request {
            WorkflowRequest::Run { .. } => STREAM_RUN_PATH,
            WorkflowRequest::Resume { .. } => STREAM_RESUME_PATH,
        };
        format!("{}{}", self.base_url, path)
    }
}

/// A JSON reply where an event stream was expected is always a rejection.
fn reply_error(body: &[u8]) -> Error {
    match serde_json::from_slice::<ApiReply>(body) {
        Ok(reply) if reply.code != 0 => Error::Workflow(format!("{}: {}", reply.code, reply.msg)),
        _ => Error::UnexpectedPayload(format!(
            "expected an event stream, got: {}",
            String::from_utf8_lossy(body)
        )),
    }
}

#[async_trait]
impl WorkflowTransport for CozeClient {
    async fn open(&self, request: &WorkflowRequest) -> Result<Box<dyn EventStream>> {
        let url = self.endpoint(request);
        debug!(url = %url, "Opening workflow stream");

        let builder = self.http.post_json(&url, request)?
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "text/event-stream");
        let response = self.http.send(builder).await?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let body = response.bytes().await?;
            let err = reply_error(&body);
            error!(error = %err, "Workflow call rejected");
            return Err(err);
        }

        Ok(Box::new(SseEventStream {
            response,
            decoder: SseDecoder::new(),
            finished: false,
        }))
    }
}

struct SseEventStream {
    response: Response,
    decoder: SseDecoder,
    finished: bool,
}

#[async_trait]
impl EventStream for SseEventStream {
    async fn next_event(&mut self) -> Result<Option<WorkflowEvent>> {
        loop {
            if let Some(frame) = self.decoder.next_frame() {
                return Ok(Some(WorkflowEvent::from_frame(&frame)));
            }
            if self.finished {
                return Ok(self.decoder.finish().map(|frame| WorkflowEvent::from_frame(&frame)));
            }
            match self.response.chunk().await? {
                Some(chunk) => self.decoder.push(&chunk),
                None => self.finished = true,
            }
        }
    }
}
