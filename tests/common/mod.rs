#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use producthunt_daily::config::{CozeConfig, DisplayConfig, LlmConfig};
use producthunt_daily::models::{Media, PageInfo, PostsPage, RawListing, WorkflowEvent, WorkflowRequest};
use producthunt_daily::services::producthunt::DateWindow;
use producthunt_daily::services::{
    ChatModel, EventStream, ImageResolver, PageFetcher, PostsPageSource, ProductBuilder, Publisher, Translator,
    WorkflowTransport,
};
use producthunt_daily::{Error, Result};

pub fn listing(id: &str, name: &str, votes: i64) -> RawListing {
    RawListing {
        id: id.to_string(),
        name: name.to_string(),
        tagline: format!("{name} tagline"),
        description: Some(format!("{name} description")),
        votes_count: votes,
        created_at: "2025-03-07T16:01:00Z".to_string(),
        featured_at: None,
        website: format!("https://{id}.example.test"),
        url: format!("https://www.producthunt.com/posts/{id}"),
        media: Some(vec![Media {
            url: Some(format!("https://ph-files.imgix.net/{id}.png")),
            media_type: Some("image".to_string()),
            video_url: None,
        }]),
    }
}

pub fn page(nodes: Vec<RawListing>, has_next_page: bool, end_cursor: Option<&str>) -> PostsPage {
    PostsPage {
        nodes,
        page_info: PageInfo {
            has_next_page,
            end_cursor: end_cursor.map(str::to_string),
        },
    }
}

/// Chat model that answers every prompt with a fixed reply, or fails.
pub struct FakeChat {
    reply: Option<String>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<(String, u32)>>,
}

impl FakeChat {
    pub fn answering(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, _system: &str, user: &str, max_tokens: u32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push((user.to_string(), max_tokens));
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(Error::Status {
                status: 500,
                url: "https://llm.example.test/chat/completions".to_string(),
                body: "boom".to_string(),
            }),
        }
    }
}

/// Page fetcher that serves one HTML document (or an error) and counts calls.
pub struct FakePages {
    html: Option<String>,
    pub calls: AtomicUsize,
}

impl FakePages {
    pub fn serving(html: &str) -> Arc<Self> {
        Arc::new(Self {
            html: Some(html.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            html: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FakePages {
    async fn fetch_page(&self, _url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.html
            .clone()
            .ok_or_else(|| Error::UnexpectedPayload("connection refused".to_string()))
    }
}

/// Serves pre-built pages in order and records the cursors it was asked for.
pub struct FakePosts {
    pages: Mutex<VecDeque<Result<PostsPage>>>,
    pub cursors: Mutex<Vec<Option<String>>>,
}

impl FakePosts {
    pub fn new(pages: Vec<Result<PostsPage>>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            cursors: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> usize {
        self.cursors.lock().unwrap().len()
    }
}

#[async_trait]
impl PostsPageSource for FakePosts {
    async fn fetch_page(&self, _window: &DateWindow, cursor: Option<&str>) -> Result<PostsPage> {
        self.cursors.lock().unwrap().push(cursor.map(str::to_string));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::UnexpectedPayload("no more pages".to_string())))
    }
}

struct ScriptedStream {
    events: VecDeque<WorkflowEvent>,
}

#[async_trait]
impl EventStream for ScriptedStream {
    async fn next_event(&mut self) -> Result<Option<WorkflowEvent>> {
        Ok(self.events.pop_front())
    }
}

/// Workflow endpoint that replays one scripted event list per opened stream.
pub struct ScriptedWorkflow {
    scripts: Mutex<VecDeque<Vec<WorkflowEvent>>>,
    pub requests: Mutex<Vec<WorkflowRequest>>,
}

impl ScriptedWorkflow {
    pub fn new(scripts: Vec<Vec<WorkflowEvent>>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn recorded(&self) -> Vec<WorkflowRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowTransport for ScriptedWorkflow {
    async fn open(&self, request: &WorkflowRequest) -> Result<Box<dyn EventStream>> {
        self.requests.lock().unwrap().push(request.clone());
        let events = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        Ok(Box::new(ScriptedStream {
            events: events.into(),
        }))
    }
}

pub fn offline_translator() -> Translator {
    Translator::new(None, LlmConfig::default())
}

pub fn builder_with(translator: Translator, pages: Arc<FakePages>) -> ProductBuilder {
    let images = ImageResolver::new(pages).unwrap();
    ProductBuilder::new(translator, images, &DisplayConfig::default()).unwrap()
}

pub fn publisher_with(workflow: Arc<ScriptedWorkflow>) -> Publisher {
    Publisher::new(workflow, "7428110001122334455", &CozeConfig::default())
}
