use std::collections::HashMap;
use rquest::{Client, RequestBuilder, Response};
use rquest_util::Emulation;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::{Error, Result};

/// An rquest client plus headers applied to every request it builds.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
}

impl HttpClient {
    pub fn new(default_headers: &HashMap<String, String>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        for (key, value) in default_headers.iter() {
            if let (Ok(header_name), Ok(header_value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value)
            ) {
                headers.insert(header_name, header_value);
                debug!(
                    header_key = key,
                    header_value = value,
                    "Adding header"
                );
            } else {
                error!(
                    header_key = key,
                    header_value = value,
                    "Invalid header value"
                );
            }
        }

        let client = Client::builder()
            .emulation(Emulation::Chrome133)
            .build()?;

        Ok(Self {
            client,
            headers,
        })
    }

    pub fn plain() -> Result<Self> {
        Self::new(&HashMap::new())
    }

    fn with_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        for (key, value) in self.headers.iter() {
            request = request.header(key, value);
        }
        request
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        debug!(url = url, "Creating GET request");
        self.with_headers(self.client.get(url))
    }

    pub fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<RequestBuilder> {
        let payload = serde_json::to_vec(body)?;
        debug!(url = url, bytes = payload.len(), "Creating POST request");

        let request = self.with_headers(self.client.post(url))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        Ok(request)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        debug!(url = url, "Creating POST request");
        self.with_headers(self.client.post(url))
    }

    /// Sends the request; 429 becomes `RateLimit`, any other non-2xx status becomes `Status`.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        debug!(
            status = status.as_u16(),
            url = %response.url(),
            "Response received"
        );

        if status == StatusCode::TOO_MANY_REQUESTS {
            debug!(url = %response.url(), "Rate limit exceeded");
            return Err(Error::RateLimit);
        }

        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            error!(
                status = status.as_u16(),
                url = %url,
                body = %body,
                "Unexpected status code"
            );
            return Err(Error::Status {
                status: status.as_u16(),
                url,
                body,
            });
        }

        Ok(response)
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| {
            let body_str = String::from_utf8_lossy(&body);
            error!(
                error = %e,
                body = %body_str,
                "Failed to parse JSON response"
            );
            Error::from(e)
        })
    }
}
