use std::path::Path;
use rquest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{error, info};

use crate::clients::HttpClient;
use crate::config::WechatConfig;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct UploadReply {
    #[serde(default)]
    media_id: Option<String>,
    #[serde(default)]
    errcode: Option<i64>,
    #[serde(default)]
    errmsg: Option<String>,
}

/// Extracts `media_id` from an upload reply; WeChat reports failures in the body.
pub fn parse_upload_response(body: &[u8]) -> Result<String> {
    let reply: UploadReply = serde_json::from_slice(body)?;
    match reply.media_id {
        Some(media_id) if !media_id.is_empty() => Ok(media_id),
        _ => Err(Error::Upload(format!(
            "{}: {}",
            reply.errcode.unwrap_or_default(),
            reply.errmsg.unwrap_or_else(|| "no media_id in reply".to_string())
        ))),
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// Temporary-media uploads to the WeChat official account API.
pub struct WechatMedia {
    http: HttpClient,
    config: WechatConfig,
}

impl WechatMedia {
    pub fn new(http: HttpClient, config: WechatConfig) -> Self {
        Self { http, config }
    }

    pub async fn upload_temp_image(&self, image_path: &Path, access_token: &str) -> Result<String> {
        let bytes = tokio::fs::read(image_path).await?;
        let file_name = image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.png".to_string());

        info!(path = %image_path.display(), bytes = bytes.len(), "Uploading image to WeChat");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(image_path))?;
        let form = Form::new().part("media", part);

        let url = format!("{}?access_token={}&type=image", self.config.upload_url, access_token);
        let request = self.http.post(&url).multipart(form);
        let response = self.http.send(request).await?;
        let body = response.bytes().await?;

        parse_upload_response(&body).inspect_err(|e| error!(error = %e, "WeChat upload failed"))
    }

    /// URL that serves the uploaded media back.
    pub fn media_url(&self, media_id: &str, access_token: &str) -> String {
        format!(
            "{}?access_token={}&media_id={}",
            self.config.media_url, access_token, media_id
        )
    }
}
