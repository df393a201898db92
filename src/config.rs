//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `SPROUT__*` 覆盖（双下划线表示嵌套，
//! 如 `SPROUT__ENGAGE__PAGE_SIZE=50`）。数值项均有默认值；
//! [prompts.*] 段没有默认值，缺失在启动前报 Config 错误（见 compose::PromptBook）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub engage: EngageSection,
    #[serde(default)]
    pub rate: RateSection,
    #[serde(default)]
    pub social: SocialSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub corpus: CorpusSection,
    #[serde(default)]
    pub prompts: PromptsSection,
}

/// [engage] 段：动作预算、筛选阈值、分页与采样
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngageSection {
    /// 每次运行的动作上限区间（上限在区间内随机抽取一次）
    pub max_actions_min: u32,
    pub max_actions_max: u32,
    /// 入选条件：点赞数须严格大于该阈值
    pub like_threshold: u64,
    /// 入选条件：评论数须严格大于该阈值
    pub comment_threshold: u64,
    /// caption 低于该长度时回落到静态评论池
    pub min_caption_length: usize,
    /// 单页最多拉取的帖子数
    pub page_size: usize,
    /// 每页随机抽样的帖子数上限
    pub sample_size: usize,
}

impl Default for EngageSection {
    fn default() -> Self {
        Self {
            max_actions_min: 35,
            max_actions_max: 50,
            like_threshold: 100,
            comment_threshold: 5,
            min_caption_length: 200,
            page_size: 100,
            sample_size: 10,
        }
    }
}

/// [rate] 段：各场景的延迟区间（秒）
///
/// 评论冷却长于点赞冷却，对应远端风控对两类动作的不同敏感度。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateSection {
    /// 运行初始与常规步进之间
    pub baseline: [u64; 2],
    /// 紧随认证 / 详情拉取之后
    pub follow_up: [u64; 2],
    /// 点赞成功后的冷却
    pub endorse_cooldown: [u64; 2],
    /// 评论成功后的冷却
    pub annotate_cooldown: [u64; 2],
}

impl Default for RateSection {
    fn default() -> Self {
        Self {
            baseline: [1, 3],
            follow_up: [3, 5],
            endorse_cooldown: [240, 360],
            annotate_cooldown: [500, 1000],
        }
    }
}

/// [social] 段：远端入口与本地状态文件路径
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocialSection {
    pub base_url: String,
    /// 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    pub session_path: PathBuf,
    pub cursors_path: PathBuf,
    pub ledger_path: PathBuf,
}

impl Default for SocialSection {
    fn default() -> Self {
        Self {
            base_url: "https://api.social.example".to_string(),
            request_timeout_secs: 30,
            session_path: PathBuf::from("session.json"),
            cursors_path: PathBuf::from("cursors.json"),
            ledger_path: PathBuf::from("actions.db"),
        }
    }
}

/// [llm] 段：评论生成后端（OpenAI 兼容端点）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub model: String,
    pub base_url: Option<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            base_url: None,
        }
    }
}

/// [corpus] 段：行式语料文件路径（回落评论、两类标签）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorpusSection {
    pub comments_path: PathBuf,
    pub expert_tags_path: PathBuf,
    pub general_tags_path: PathBuf,
}

impl Default for CorpusSection {
    fn default() -> Self {
        Self {
            comments_path: PathBuf::from("config/comments.txt"),
            expert_tags_path: PathBuf::from("config/expert_tags.txt"),
            general_tags_path: PathBuf::from("config/general_tags.txt"),
        }
    }
}

/// [prompts] 段：两套人设（expert / general），缺失由 PromptBook 校验后报错
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PromptsSection {
    pub expert: Option<PersonaSection>,
    pub general: Option<PersonaSection>,
}

/// [prompts.*] 段：系统指令与用户指令模板（caption 追加在模板之后）
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PersonaSection {
    pub system: Option<String>,
    pub user_template: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engage: EngageSection::default(),
            rate: RateSection::default(),
            social: SocialSection::default(),
            llm: LlmSection::default(),
            corpus: CorpusSection::default(),
            prompts: PromptsSection::default(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 SPROUT__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 SPROUT__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SPROUT")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
