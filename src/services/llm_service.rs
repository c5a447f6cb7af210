//! 答题求解服务
//!
//! 只负责"把提示词发给大模型、把回来的文本变成答案记录"
//! 这一件事，不关心页面和流程。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（DeepSeek、Doubao 等）
//!
//! 模型的输出在边界上立即校验成 `Vec<AnswerRecord>`，
//! 下游不再接触松散的 JSON。

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageDetail, ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::models::question::AnswerRecord;

/// 答题求解协作方
///
/// 抽成 trait 是为了让编排层可以在测试里换成脚本化实现，
/// 不需要真实 API。
#[async_trait]
pub trait AnswerResolver: Send + Sync {
    /// 发送完整提示词，返回模型的原始文本输出
    ///
    /// `imgs` 为题干中出现的图片地址，支持视觉模型时一并附上
    async fn resolve(&self, prompt: &str, imgs: &[String]) -> Result<String>;
}

/// 大模型求解服务
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }
}

#[async_trait]
impl AnswerResolver for LlmService {
    async fn resolve(&self, prompt: &str, imgs: &[String]) -> Result<String> {
        debug!("调用答题模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        // 题干里有图片时走 Vision 消息格式
        let user_msg = if imgs.is_empty() {
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
        } else {
            debug!("附带 {} 张图片", imgs.len());
            let mut parts: Vec<ChatCompletionRequestUserMessageContentPart> = Vec::new();
            parts.push(ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: prompt.to_string(),
                },
            ));
            for url in imgs {
                parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                    ChatCompletionRequestMessageContentPartImage {
                        image_url: ImageUrl {
                            url: url.clone(),
                            detail: Some(ImageDetail::Auto),
                        },
                    },
                ));
            }
            ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Array(parts))
                .build()?
        };

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(0.3)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("答题模型调用失败: {}", e);
            anyhow::anyhow!("答题模型调用失败: {}", e)
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(AppError::EmptyResponse)?;

        debug!("答题模型调用成功");

        Ok(content)
    }
}

/// 把模型的原始输出解析为答案序列
///
/// 输出先整体修剪；若不是裸的 JSON 数组/对象，再扫描第一段
/// 配平的 `[...]` / `{...}` 子串（模型经常裹一层 Markdown
/// 代码栅栏或解释文字）。这里是整条流水线唯一把格式错误当
/// 致命错误的地方——解析不出来就没有任何可注入的内容。
pub fn parse_answer_payload(raw: &str) -> Result<Vec<AnswerRecord>, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyResponse);
    }

    let candidate = if is_bare_json(trimmed) {
        trimmed
    } else {
        extract_balanced(trimmed).ok_or_else(|| AppError::AnswerFormat(preview(trimmed)))?
    };

    let answers = match serde_json::from_str::<Vec<AnswerRecord>>(candidate) {
        Ok(answers) => answers,
        // 单个对象也接受，视作单元素序列
        Err(_) => serde_json::from_str::<AnswerRecord>(candidate)
            .map(|a| vec![a])
            .map_err(|e| AppError::AnswerFormat(e.to_string()))?,
    };

    if answers.is_empty() {
        return Err(AppError::AnswerFormat("答案列表为空".to_string()));
    }

    Ok(answers)
}

fn is_bare_json(s: &str) -> bool {
    (s.starts_with('[') && s.ends_with(']')) || (s.starts_with('{') && s.ends_with('}'))
}

/// 找到第一段括号配平的 JSON 子串，正确跳过字符串与转义
fn extract_balanced(s: &str) -> Option<&str> {
    let open_at = s.find(['[', '{'])?;
    let mut depth: i32 = 0;
    let mut in_str = false;
    let mut escaped = false;

    for (i, c) in s[open_at..].char_indices() {
        if in_str {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_str = false;
            }
            continue;
        }
        match c {
            '"' => in_str = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[open_at..open_at + i + c.len_utf8()]);
                }
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    None
}

fn preview(text: &str) -> String {
    if text.chars().count() > 120 {
        text.chars().take(120).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
