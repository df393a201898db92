//! 社媒层：领域类型、客户端抽象与实现、会话管理

pub mod http;
pub mod mock;
pub mod session;
pub mod traits;
pub mod types;

pub use http::HttpSocialClient;
pub use mock::MockSocialClient;
pub use session::SessionManager;
pub use traits::{SocialClient, SocialError};
pub use types::{
    ActionKind, Credentials, DeviceIdentity, MediaDetail, MediaItem, SessionState, TagClass,
    TagPage,
};
