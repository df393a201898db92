//! Mock 社媒客户端（用于测试，无需远端）
//!
//! 按标签预置分页脚本，可注入会话失效与动作失败；记录所有登录设备
//! 与已下发的动作，供断言使用。

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::social::{
    Credentials, DeviceIdentity, MediaDetail, SessionState, SocialClient, SocialError, TagPage,
};

/// 脚本化 Mock 客户端
#[derive(Default)]
pub struct MockSocialClient {
    pages: Mutex<HashMap<String, VecDeque<TagPage>>>,
    details: Mutex<HashMap<String, MediaDetail>>,
    /// 远端视角下会话是否有效
    session_valid: Mutex<bool>,
    /// 第 N 次数据调用时作废会话（一次性触发器）
    invalidate_at_call: Mutex<Option<usize>>,
    data_calls: Mutex<usize>,
    refuse_logins: Mutex<bool>,
    fail_dispatch: Mutex<HashSet<String>>,

    logins: Mutex<Vec<DeviceIdentity>>,
    endorsed: Mutex<Vec<String>>,
    annotated: Mutex<Vec<(String, String)>>,
    seen_cursors: Mutex<Vec<(String, Option<String>)>>,
}

impl MockSocialClient {
    pub fn new() -> Self {
        Self {
            session_valid: Mutex::new(true),
            ..Self::default()
        }
    }

    /// 为标签追加一页脚本（按调用顺序弹出）
    pub fn push_page(&self, tag: &str, page: TagPage) {
        self.pages
            .lock()
            .unwrap()
            .entry(tag.to_string())
            .or_default()
            .push_back(page);
    }

    pub fn set_detail(&self, pk: &str, caption: Option<&str>) {
        self.details.lock().unwrap().insert(
            pk.to_string(),
            MediaDetail {
                caption_text: caption.map(String::from),
            },
        );
    }

    /// 立即作废会话（下一次探测 / 数据调用报 SessionInvalid）
    pub fn invalidate_session(&self) {
        *self.session_valid.lock().unwrap() = false;
    }

    /// 在第 n 次数据调用（1 起）时作废会话
    pub fn invalidate_at_data_call(&self, n: usize) {
        *self.invalidate_at_call.lock().unwrap() = Some(n);
    }

    pub fn refuse_logins(&self) {
        *self.refuse_logins.lock().unwrap() = true;
    }

    /// 令针对该帖子的动作下发失败（瞬时错误）
    pub fn fail_dispatch_on(&self, media_id: &str) {
        self.fail_dispatch.lock().unwrap().insert(media_id.to_string());
    }

    pub fn login_devices(&self) -> Vec<DeviceIdentity> {
        self.logins.lock().unwrap().clone()
    }

    pub fn endorsed(&self) -> Vec<String> {
        self.endorsed.lock().unwrap().clone()
    }

    pub fn annotated(&self) -> Vec<(String, String)> {
        self.annotated.lock().unwrap().clone()
    }

    /// tag_page 收到的 (tag, cursor) 序列
    pub fn seen_cursors(&self) -> Vec<(String, Option<String>)> {
        self.seen_cursors.lock().unwrap().clone()
    }

    /// 数据调用的公共门卫：推进计数器、触发脚本化失效、校验会话
    fn check_session(&self) -> Result<(), SocialError> {
        let mut calls = self.data_calls.lock().unwrap();
        *calls += 1;
        let fire = {
            let mut at = self.invalidate_at_call.lock().unwrap();
            if *at == Some(*calls) {
                *at = None;
                true
            } else {
                false
            }
        };
        if fire {
            *self.session_valid.lock().unwrap() = false;
        }
        if !*self.session_valid.lock().unwrap() {
            return Err(SocialError::SessionInvalid);
        }
        Ok(())
    }
}

#[async_trait]
impl SocialClient for MockSocialClient {
    async fn login(
        &self,
        _credentials: &Credentials,
        device: &DeviceIdentity,
    ) -> Result<SessionState, SocialError> {
        if *self.refuse_logins.lock().unwrap() {
            return Err(SocialError::Transient("login refused".to_string()));
        }
        self.logins.lock().unwrap().push(device.clone());
        *self.session_valid.lock().unwrap() = true;
        Ok(SessionState {
            token: format!("tok-{}", self.logins.lock().unwrap().len()),
            user_id: "u-1".to_string(),
            device: device.clone(),
        })
    }

    async fn resume(&self, _session: &SessionState) -> Result<(), SocialError> {
        if *self.session_valid.lock().unwrap() {
            Ok(())
        } else {
            Err(SocialError::SessionInvalid)
        }
    }

    async fn tag_page(
        &self,
        _session: &SessionState,
        tag: &str,
        cursor: Option<&str>,
        _page_size: usize,
    ) -> Result<TagPage, SocialError> {
        self.check_session()?;
        self.seen_cursors
            .lock()
            .unwrap()
            .push((tag.to_string(), cursor.map(String::from)));
        let page = self
            .pages
            .lock()
            .unwrap()
            .get_mut(tag)
            .and_then(VecDeque::pop_front)
            .unwrap_or(TagPage {
                items: Vec::new(),
                next_cursor: None,
            });
        Ok(page)
    }

    async fn media_detail(
        &self,
        _session: &SessionState,
        pk: &str,
    ) -> Result<MediaDetail, SocialError> {
        self.check_session()?;
        Ok(self
            .details
            .lock()
            .unwrap()
            .get(pk)
            .cloned()
            .unwrap_or_default())
    }

    async fn endorse(&self, _session: &SessionState, media_id: &str) -> Result<(), SocialError> {
        self.check_session()?;
        if self.fail_dispatch.lock().unwrap().contains(media_id) {
            return Err(SocialError::Transient("endorse rejected".to_string()));
        }
        self.endorsed.lock().unwrap().push(media_id.to_string());
        Ok(())
    }

    async fn annotate(
        &self,
        _session: &SessionState,
        media_id: &str,
        text: &str,
    ) -> Result<(), SocialError> {
        self.check_session()?;
        if self.fail_dispatch.lock().unwrap().contains(media_id) {
            return Err(SocialError::Transient("annotate rejected".to_string()));
        }
        self.annotated
            .lock()
            .unwrap()
            .push((media_id.to_string(), text.to_string()));
        Ok(())
    }
}
