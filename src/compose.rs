//! 评论合成：LLM 生成 + 静态池回落 + 表情符号剥离
//!
//! 策略：caption 缺失或短于 min_caption_length 时，从回落池均匀随机取一条，
//! 不触碰生成器；否则按标签分类选择人设 Prompt 调用生成器，并剥离
//! 表情 / 图形符号码位区间。生成器失败按本轮失败处理，不做静默回落。

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use regex::Regex;

use crate::config::{AppConfig, PersonaSection};
use crate::core::EngageError;
use crate::llm::TextGenerator;
use crate::social::TagClass;

/// 单套人设：系统指令 + 用户指令模板（caption 直接追加在模板末尾）
#[derive(Clone, Debug)]
pub struct PersonaPrompt {
    pub system: String,
    pub user_template: String,
}

/// 两套人设的集合，按标签分类取用
#[derive(Clone, Debug)]
pub struct PromptBook {
    expert: PersonaPrompt,
    general: PersonaPrompt,
}

impl PromptBook {
    /// 从配置构建；[prompts.expert] / [prompts.general] 的段或键缺失在启动前报错
    pub fn from_config(cfg: &AppConfig) -> Result<Self, EngageError> {
        Ok(Self {
            expert: persona(cfg.prompts.expert.as_ref(), "expert")?,
            general: persona(cfg.prompts.general.as_ref(), "general")?,
        })
    }

    pub fn from_parts(expert: PersonaPrompt, general: PersonaPrompt) -> Self {
        Self { expert, general }
    }

    fn for_class(&self, class: TagClass) -> &PersonaPrompt {
        match class {
            TagClass::Expert => &self.expert,
            TagClass::General => &self.general,
        }
    }
}

fn persona(section: Option<&PersonaSection>, name: &str) -> Result<PersonaPrompt, EngageError> {
    let section = section.ok_or_else(|| {
        EngageError::Config(format!("Missing [prompts.{name}] section"))
    })?;
    let system = section
        .system
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| EngageError::Config(format!("Missing prompts.{name}.system")))?;
    let user_template = section
        .user_template
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| EngageError::Config(format!("Missing prompts.{name}.user_template")))?;
    Ok(PersonaPrompt {
        system: system.to_string(),
        user_template: user_template.to_string(),
    })
}

/// 合成结果：文本与来源（生成 / 回落池）
#[derive(Clone, Debug)]
pub struct Composed {
    pub text: String,
    pub generated: bool,
}

/// 评论合成器：持有人设、回落池、长度阈值与预编译的表情符号正则
pub struct Composer {
    prompts: PromptBook,
    fallback: Vec<String>,
    min_caption_length: usize,
    emoji: Regex,
}

impl Composer {
    pub fn new(prompts: PromptBook, fallback: Vec<String>, min_caption_length: usize) -> Self {
        // 表情、符号与图形、交通与地图、旗帜、杂项符号区间
        let emoji = Regex::new(concat!(
            "[",
            "\u{1F600}-\u{1F64F}",
            "\u{1F300}-\u{1F5FF}",
            "\u{1F680}-\u{1F6FF}",
            "\u{1F1E0}-\u{1F1FF}",
            "\u{2702}-\u{27B0}",
            "\u{24C2}-\u{1F251}",
            "]+",
        ))
        .expect("emoji pattern is valid");
        Self {
            prompts,
            fallback,
            min_caption_length,
            emoji,
        }
    }

    /// 为选中的帖子产出评论文本
    ///
    /// caption 足够长时调用生成器；生成器的错误原样向上返回，由编排器
    /// 放弃本轮（不消耗预算、不写台账）。
    pub async fn compose(
        &self,
        caption: Option<&str>,
        class: TagClass,
        generator: &dyn TextGenerator,
        rng: &mut StdRng,
    ) -> Result<Composed, String> {
        let caption = caption.map(str::trim).filter(|c| !c.is_empty());

        match caption {
            Some(text) if text.chars().count() >= self.min_caption_length => {
                let persona = self.prompts.for_class(class);
                let user = format!("{}{}", persona.user_template, text);
                let raw = generator.complete(&persona.system, &user).await?;
                let cleaned = self.strip_emoji(&raw).trim().to_string();
                if cleaned.is_empty() {
                    return Err("generator returned empty text".to_string());
                }
                Ok(Composed {
                    text: cleaned,
                    generated: true,
                })
            }
            _ => {
                let pick = self
                    .fallback
                    .choose(rng)
                    .ok_or_else(|| "fallback comment pool is empty".to_string())?;
                Ok(Composed {
                    text: pick.clone(),
                    generated: false,
                })
            }
        }
    }

    /// 剥离表情符号码位区间
    pub fn strip_emoji(&self, text: &str) -> String {
        self.emoji.replace_all(text, "").into_owned()
    }
}
