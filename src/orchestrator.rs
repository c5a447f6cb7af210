//! 流水线编排
//!
//! 抽取 → 求解 → 注入，串成一次完整运行。注意注入面对的是
//! *当前*页面而不是抽取时的快照——两步之间时间已经过去，
//! 页面可能变化，这是设计使然，由注入器按活动容器类别兜住。
//! 编排层自身不做整体重试。

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::dom::QuizDom;
use crate::error::AppError;
use crate::extractor::parse_questions;
use crate::injector::{InjectReport, Injector, Pacing};
use crate::models::question::QuestionRecord;
use crate::prompt::{build_prompt, simple_question};
use crate::services::{parse_answer_payload, AnswerResolver};

/// 一次完整运行的汇总
#[derive(Debug, Clone, Copy)]
pub struct PipelineReport {
    /// 抽取到的题目数
    pub questions: usize,
    /// 模型返回的答案数
    pub answers: usize,
    /// 注入结果
    pub inject: InjectReport,
}

/// 运行完整流水线
pub async fn run_pipeline<D: QuizDom + ?Sized>(
    dom: &D,
    resolver: &dyn AnswerResolver,
    config: &Config,
    cancel: CancellationToken,
) -> Result<PipelineReport> {
    // 1. 抽取（对冻结的 HTML 快照，同步完成）
    info!("📖 正在抽取页面题目...");
    let html = dom.snapshot_html().await?;
    let questions = parse_questions(&html);
    if questions.is_empty() {
        return Err(AppError::NoQuestions.into());
    }
    info!("✓ 抽取到 {} 道题目", questions.len());

    if config.verbose_logging {
        for q in &questions {
            info!("  {}", simple_question(q).trim_end());
        }
    }

    // 2. 求解
    let prompt = build_prompt(&questions);
    let imgs: Vec<String> = questions
        .iter()
        .flat_map(|q| q.imgs.iter().cloned())
        .collect();

    info!("🤖 正在请求答题模型...");
    let raw = resolver.resolve(&prompt, &imgs).await?;

    // 响应格式错误是整次运行唯一的致命格式错误
    let answers = parse_answer_payload(&raw)?;
    info!("✓ 解析到 {} 条答案", answers.len());

    if answers.len() != questions.len() {
        warn!(
            "⚠️ 答案数 ({}) 与题目数 ({}) 不一致，按答案逐条注入",
            answers.len(),
            questions.len()
        );
    }

    // 3. 注入（对当前活动页面）
    info!("✍️ 开始注入答案...");
    let injector = Injector::new(dom, Pacing::from_config(config), cancel);
    let inject = injector.inject(&answers).await?;

    Ok(PipelineReport {
        questions: questions.len(),
        answers: answers.len(),
        inject,
    })
}

/// 诊断入口：只跑抽取，返回规范化的题目列表
pub async fn fetch_questions<D: QuizDom + ?Sized>(dom: &D) -> Result<Vec<QuestionRecord>> {
    let html = dom.snapshot_html().await?;
    Ok(parse_questions(&html))
}
