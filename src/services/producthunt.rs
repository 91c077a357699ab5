use async_trait::async_trait;
use chrono::NaiveDate;
use http::header::AUTHORIZATION;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::clients::HttpClient;
use crate::config::{Credentials, ProductHuntConfig};
use crate::error::{Error, Result};
use crate::models::{GraphqlResponse, PostsData, PostsPage, RawListing, TokenResponse};
use crate::utils::retry_with_backoff;

const POSTS_QUERY: &str = r#"
query DailyPosts($postedAfter: DateTime, $postedBefore: DateTime, $after: String) {
  posts(order: VOTES, postedAfter: $postedAfter, postedBefore: $postedBefore, after: $after) {
    nodes {
      id
      name
      tagline
      description
      votesCount
      createdAt
      featuredAt
      website
      url
      media {
        url
        type
        videoUrl
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

/// How the API is authorised for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductHuntAuth {
    Developer(String),
    ClientCredentials { client_id: String, client_secret: String },
}

impl ProductHuntAuth {
    /// A developer token wins; otherwise both client id and secret are required.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        if let Some(token) = &credentials.producthunt_developer_token {
            return Ok(ProductHuntAuth::Developer(token.clone()));
        }

        match (&credentials.producthunt_client_id, &credentials.producthunt_client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(ProductHuntAuth::ClientCredentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            (None, _) => Err(Error::MissingCredential("PRODUCTHUNT_CLIENT_ID")),
            (_, None) => Err(Error::MissingCredential("PRODUCTHUNT_CLIENT_SECRET")),
        }
    }
}

/// The 24-hour UTC window a day's posts were created in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    pub posted_after: String,
    pub posted_before: String,
}

impl DateWindow {
    pub fn for_day(date: NaiveDate) -> Self {
        let day = date.format("%Y-%m-%d");
        Self {
            posted_after: format!("{day}T00:00:00Z"),
            posted_before: format!("{day}T23:59:59Z"),
        }
    }
}

/// One page of posts, ordered by votes, continuing after `cursor`.
#[async_trait]
pub trait PostsPageSource: Send + Sync {
    async fn fetch_page(&self, window: &DateWindow, cursor: Option<&str>) -> Result<PostsPage>;
}

/// Pages through the day's posts until `top_count` are collected or pages run out,
/// then returns at most `top_count` listings, most votes first.
pub async fn fetch_top_listings(
    source: &dyn PostsPageSource,
    date: NaiveDate,
    top_count: usize,
) -> Result<Vec<RawListing>> {
    let window = DateWindow::for_day(date);
    let mut listings: Vec<RawListing> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_number = 0;

    loop {
        page_number += 1;
        let page = source.fetch_page(&window, cursor.as_deref()).await?;
        debug!(
            page = page_number,
            nodes = page.nodes.len(),
            has_next_page = page.page_info.has_next_page,
            "Fetched posts page"
        );
        listings.extend(page.nodes);

        if listings.len() >= top_count || !page.page_info.has_next_page {
            break;
        }
        match page.page_info.end_cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    listings.sort_by(|a, b| b.votes_count.cmp(&a.votes_count));
    listings.truncate(top_count);

    info!(
        date = %date,
        pages = page_number,
        listings = listings.len(),
        "Collected top listings"
    );
    Ok(listings)
}

fn access_token(response: TokenResponse) -> Result<String> {
    response
        .access_token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| Error::UnexpectedPayload("token response without access_token".to_string()))
}

/// GraphQL errors win over any partial data.
fn posts_page(response: GraphqlResponse<PostsData>) -> Result<PostsPage> {
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        error!(errors = ?messages, "GraphQL query returned errors");
        return Err(Error::UnexpectedPayload(messages.join("; ")));
    }

    response
        .data
        .and_then(|data| data.posts)
        .map(PostsPage::from)
        .ok_or_else(|| Error::UnexpectedPayload("response without data.posts".to_string()))
}

/// Product Hunt v2 API handle; the access token is obtained once per handle.
pub struct ProductHuntApi {
    http: HttpClient,
    config: ProductHuntConfig,
    auth: ProductHuntAuth,
    token: OnceCell<String>,
}

impl ProductHuntApi {
    pub fn new(config: &ProductHuntConfig, auth: ProductHuntAuth) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(&config.headers)?,
            config: config.clone(),
            auth,
            token: OnceCell::new(),
        })
    }

    pub async fn access_token(&self) -> Result<&str> {
        let token = self.token.get_or_try_init(|| self.resolve_token()).await?;
        Ok(token.as_str())
    }

    async fn resolve_token(&self) -> Result<String> {
        let (client_id, client_secret) = match &self.auth {
            ProductHuntAuth::Developer(token) => {
                info!("Using PRODUCTHUNT_DEVELOPER_TOKEN");
                return Ok(token.clone());
            }
            ProductHuntAuth::ClientCredentials { client_id, client_secret } => (client_id, client_secret),
        };

        let body = json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "grant_type": "client_credentials",
        });

        let response: TokenResponse = retry_with_backoff(
            self.config.retry.max_attempts,
            self.config.retry.base_delay_ms,
            || async {
                let request = self.http.post_json(&self.config.token_url, &body)?;
                self.http.send_json(request).await
            },
        )
        .await
        .inspect_err(|e| error!(error = %e, "Failed to obtain Product Hunt access token"))?;

        let token = access_token(response)?;

        info!("Exchanged client credentials for an access token");
        Ok(token)
    }
}

#[async_trait]
impl PostsPageSource for ProductHuntApi {
    async fn fetch_page(&self, window: &DateWindow, cursor: Option<&str>) -> Result<PostsPage> {
        let token = self.access_token().await?;
        let body = json!({
            "query": POSTS_QUERY,
            "variables": {
                "postedAfter": window.posted_after,
                "postedBefore": window.posted_before,
                "after": cursor,
            },
        });

        let response: GraphqlResponse<PostsData> = retry_with_backoff(
            self.config.retry.max_attempts,
            self.config.retry.base_delay_ms,
            || async {
                let request = self.http.post_json(&self.config.graphql_url, &body)?
                    .header(AUTHORIZATION, format!("Bearer {token}"));
                self.http.send_json(request).await
            },
        )
        .await?;

        posts_page(response)
    }
}
