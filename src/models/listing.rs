use serde::{Deserialize, Serialize};

/// A post as returned by the Product Hunt GraphQL API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawListing {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "votesCount")]
    pub votes_count: i64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "featuredAt", default)]
    pub featured_at: Option<String>,
    #[serde(default)]
    pub website: String,
    pub url: String,
    #[serde(default)]
    pub media: Option<Vec<Media>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Media {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(rename = "videoUrl", default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PostsData {
    #[serde(default)]
    pub posts: Option<PostsConnection>,
}

#[derive(Debug, Deserialize)]
pub struct PostsConnection {
    pub nodes: Vec<RawListing>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "endCursor", default)]
    pub end_cursor: Option<String>,
}

/// One page of posts plus where to continue from.
#[derive(Debug, Clone)]
pub struct PostsPage {
    pub nodes: Vec<RawListing>,
    pub page_info: PageInfo,
}

impl From<PostsConnection> for PostsPage {
    fn from(connection: PostsConnection) -> Self {
        Self {
            nodes: connection.nodes,
            page_info: connection.page_info,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_posts_envelope() {
        let body = r#"{
            "data": {"posts": {
                "nodes": [{
                    "id": "1", "name": "Venice", "tagline": "Private AI",
                    "description": null, "votesCount": 566,
                    "createdAt": "2025-03-07T16:01:00Z", "featuredAt": null,
                    "website": "https://example.test", "url": "https://www.producthunt.com/posts/venice-3",
                    "media": [{"url": "https://ph-files.imgix.net/a.jpeg", "type": "image", "videoUrl": null}]
                }],
                "pageInfo": {"hasNextPage": true, "endCursor": "MQ=="}
            }}
        }"#;

        let response: GraphqlResponse<PostsData> = serde_json::from_str(body).unwrap();
        let posts = response.data.unwrap().posts.unwrap();
        assert_eq!(posts.nodes.len(), 1);
        assert_eq!(posts.nodes[0].votes_count, 566);
        assert!(posts.nodes[0].featured_at.is_none());
        assert_eq!(posts.page_info.end_cursor.as_deref(), Some("MQ=="));
        assert!(response.errors.is_empty());
    }

    #[test]
    fn decodes_graphql_errors_without_data() {
        let body = r#"{"data": null, "errors": [{"message": "invalid_oauth_token"}]}"#;
        let response: GraphqlResponse<PostsData> = serde_json::from_str(body).unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors[0].message, "invalid_oauth_token");
    }
}
