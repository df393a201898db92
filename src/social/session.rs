//! 会话管理：建立、校验、持久化与重新认证
//!
//! 优先恢复持久化会话（廉价探测校验）；探测报会话失效时保留设备指纹、
//! 清空易失状态后重新登录，使远端看到一致的设备特征。恢复与重登均失败
//! 才报 Auth 错误——这是系统内唯一不重试的致命运行期错误。

use std::path::{Path, PathBuf};

use crate::core::EngageError;
use crate::social::{Credentials, DeviceIdentity, SessionState, SocialClient, SocialError};

/// 会话管理器：session.json 的唯一读写方
pub struct SessionManager {
    path: PathBuf,
    credentials: Credentials,
    state: Option<SessionState>,
}

impl SessionManager {
    pub fn new(path: impl AsRef<Path>, credentials: Credentials) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            credentials,
            state: None,
        }
    }

    /// 当前活动会话（ensure_session 成功后必为 Some）
    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    /// 确保存在有效会话：恢复持久化会话或重新登录
    ///
    /// 恢复路径成功时不重写 session.json；新登录路径写入。
    pub async fn ensure_session(&mut self, client: &dyn SocialClient) -> Result<(), EngageError> {
        if let Some(session) = self.load_file() {
            match client.resume(&session).await {
                Ok(()) => {
                    tracing::info!("Logged in via stored session");
                    self.state = Some(session);
                    return Ok(());
                }
                Err(SocialError::SessionInvalid) => {
                    tracing::warn!("Stored session is invalid, falling back to fresh login");
                    let device = session.device.clone();
                    return self.fresh_login(client, Some(device)).await;
                }
                Err(SocialError::Transient(e)) => {
                    tracing::warn!("Could not resume stored session: {e}");
                    let device = session.device.clone();
                    return self.fresh_login(client, Some(device)).await;
                }
            }
        }
        self.fresh_login(client, None).await
    }

    /// 运行中探测到会话失效时调用：保留设备指纹，重新登录并落盘
    pub async fn reauthenticate(&mut self, client: &dyn SocialClient) -> Result<(), EngageError> {
        let device = self.state.take().map(|s| s.device);
        self.fresh_login(client, device).await
    }

    async fn fresh_login(
        &mut self,
        client: &dyn SocialClient,
        device: Option<DeviceIdentity>,
    ) -> Result<(), EngageError> {
        let device = device.unwrap_or_else(DeviceIdentity::generate);
        tracing::info!("Attempting fresh login for {}", self.credentials.username);
        match client.login(&self.credentials, &device).await {
            Ok(session) => {
                self.persist(&session);
                self.state = Some(session);
                Ok(())
            }
            Err(e) => Err(EngageError::Auth(format!(
                "could not establish session for {}: {e}",
                self.credentials.username
            ))),
        }
    }

    /// 读取持久化会话；文件缺失或无法解析时返回 None（走新登录路径）
    fn load_file(&self) -> Option<SessionState> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Session file {} unreadable: {e}", self.path.display());
                None
            }
        }
    }

    /// 写入会话文件；失败不致命（内存会话仍可用，下次运行重新登录）
    fn persist(&self, session: &SessionState) {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let data = serde_json::to_string_pretty(session)?;
            std::fs::write(&self.path, data)
        };
        if let Err(e) = write() {
            tracing::error!("Failed to persist session to {}: {e}", self.path.display());
        }
    }
}
