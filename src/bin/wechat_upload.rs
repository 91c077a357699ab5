use std::path::PathBuf;
use anyhow::{Context, Result};
use tracing::info;

use producthunt_daily::clients::HttpClient;
use producthunt_daily::config::{Credentials, Settings};
use producthunt_daily::services::WechatMedia;
use producthunt_daily::utils::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing("producthunt_daily=info,wechat_upload=info")?;

    let image_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: wechat_upload <image-path>")?;

    let settings = Settings::new()?;
    let access_token = Credentials::require(&settings.credentials.wechat_access_token, "WECHAT_ACCESS_TOKEN")?;

    let wechat = WechatMedia::new(HttpClient::plain()?, settings.wechat.clone());
    let media_id = wechat.upload_temp_image(&image_path, access_token).await?;
    let url = wechat.media_url(&media_id, access_token);

    info!(media_id = %media_id, "Image uploaded");
    println!("{url}");

    Ok(())
}
