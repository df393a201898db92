//! HTTP 社媒客户端
//!
//! 基于 reqwest 的私有 API 客户端：Bearer 令牌认证，401/403 一律映射为
//! SessionInvalid，其余失败映射为 Transient。端点与超时来自 [social] 配置。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::SocialSection;
use crate::core::EngageError;
use crate::social::{
    Credentials, DeviceIdentity, MediaDetail, MediaItem, SessionState, SocialClient, SocialError,
    TagPage,
};

/// reqwest 实现；客户端自身无会话状态
pub struct HttpSocialClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSocialClient {
    pub fn new(cfg: &SocialSection) -> Result<Self, EngageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .user_agent(concat!("sprout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EngageError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// 401/403 视为会话失效，其余非 2xx 为瞬时失败
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SocialError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SocialError::SessionInvalid);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SocialError::Transient(format!(
                "unexpected status {status}: {body}"
            )));
        }
        Ok(response)
    }
}

fn transient(e: reqwest::Error) -> SocialError {
    SocialError::Transient(e.to_string())
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    device_id: &'a str,
    phone_id: &'a str,
    advertising_id: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user_id: String,
}

#[derive(Deserialize)]
struct TagFeedResponse {
    #[serde(default)]
    items: Vec<WireMedia>,
    next_max_id: Option<String>,
}

#[derive(Deserialize)]
struct WireMedia {
    id: String,
    pk: String,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    comment_count: u64,
    caption: Option<String>,
}

impl From<WireMedia> for MediaItem {
    fn from(w: WireMedia) -> Self {
        MediaItem {
            id: w.id,
            pk: w.pk,
            like_count: w.like_count,
            comment_count: w.comment_count,
            caption: w.caption,
        }
    }
}

#[derive(Deserialize)]
struct MediaInfoResponse {
    caption_text: Option<String>,
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
}

#[async_trait::async_trait]
impl SocialClient for HttpSocialClient {
    async fn login(
        &self,
        credentials: &Credentials,
        device: &DeviceIdentity,
    ) -> Result<SessionState, SocialError> {
        let response = self
            .http
            .post(self.url("/accounts/login"))
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
                device_id: &device.device_id,
                phone_id: &device.phone_id,
                advertising_id: &device.advertising_id,
            })
            .send()
            .await
            .map_err(transient)?;
        // 登录自身的 401 表示凭证被拒，向上作为瞬时失败，由 SessionManager 定性为 Auth
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SocialError::Transient("credentials rejected".to_string()));
        }
        let response = Self::check(response).await?;
        let body: LoginResponse = response.json().await.map_err(transient)?;
        Ok(SessionState {
            token: body.token,
            user_id: body.user_id,
            device: device.clone(),
        })
    }

    async fn resume(&self, session: &SessionState) -> Result<(), SocialError> {
        let response = self
            .http
            .get(self.url("/feed/timeline"))
            .bearer_auth(&session.token)
            .query(&[("count", "1")])
            .send()
            .await
            .map_err(transient)?;
        Self::check(response).await.map(|_| ())
    }

    async fn tag_page(
        &self,
        session: &SessionState,
        tag: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<TagPage, SocialError> {
        let mut request = self
            .http
            .get(self.url(&format!("/feed/tag/{tag}")))
            .bearer_auth(&session.token)
            .query(&[("count", page_size.to_string())]);
        if let Some(cursor) = cursor {
            request = request.query(&[("max_id", cursor)]);
        }
        let response = request.send().await.map_err(transient)?;
        let response = Self::check(response).await?;
        let body: TagFeedResponse = response.json().await.map_err(transient)?;
        Ok(TagPage {
            items: body.items.into_iter().map(MediaItem::from).collect(),
            next_cursor: body.next_max_id,
        })
    }

    async fn media_detail(
        &self,
        session: &SessionState,
        pk: &str,
    ) -> Result<MediaDetail, SocialError> {
        let response = self
            .http
            .get(self.url(&format!("/media/{pk}/info")))
            .bearer_auth(&session.token)
            .send()
            .await
            .map_err(transient)?;
        let response = Self::check(response).await?;
        let body: MediaInfoResponse = response.json().await.map_err(transient)?;
        Ok(MediaDetail {
            caption_text: body.caption_text,
        })
    }

    async fn endorse(&self, session: &SessionState, media_id: &str) -> Result<(), SocialError> {
        let response = self
            .http
            .post(self.url(&format!("/media/{media_id}/like")))
            .bearer_auth(&session.token)
            .send()
            .await
            .map_err(transient)?;
        Self::check(response).await.map(|_| ())
    }

    async fn annotate(
        &self,
        session: &SessionState,
        media_id: &str,
        text: &str,
    ) -> Result<(), SocialError> {
        let response = self
            .http
            .post(self.url(&format!("/media/{media_id}/comment")))
            .bearer_auth(&session.token)
            .json(&AnnotateRequest { text })
            .send()
            .await
            .map_err(transient)?;
        Self::check(response).await.map(|_| ())
    }
}
