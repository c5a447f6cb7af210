//! 答案注入器
//!
//! 把答案序列按顺序写回活动页面。宿主页面绑定了自己的
//! 点击处理器（计分等内部状态依赖它们触发），单纯改选中
//! 标志不够，所以先派发完整的合成点击序列，直接置位只作
//! 兜底。所有失败（容器缺失、选项缺失、重试耗尽）都是
//! 非致命的：记日志、跳过、继续下一个。
//!
//! 整个注入严格串行：题目按输入顺序处理，题内选项按顺序
//! 处理，靠这一点（加上各处的停顿）避免与宿主页面自己的
//! 异步处理器竞争。

use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::dom::{ContainerClass, ControlEvent, QuizDom};
use crate::error::{is_cancelled, AppError};
use crate::models::question::AnswerRecord;

/// 注入节奏参数
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// 每道题之间的基础停顿
    pub base_delay: Duration,
    /// 同一道题内选项之间的停顿
    pub inter_option_delay: Duration,
    /// 选中状态重试上限
    pub max_attempts: u32,
    /// 合成按下/抬起之间的停顿
    pub press_delay: Duration,
    /// click 之后留给页面脚本响应的时间
    pub settle_delay: Duration,
    /// 强制置位后的停顿
    pub force_delay: Duration,
    /// 单个选项出错后的冷却时间
    pub error_cooldown: Duration,
    /// 每道题之后随机抖动的上限
    pub answer_jitter: Duration,
}

impl Pacing {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_delay: Duration::from_millis(config.base_delay_ms),
            inter_option_delay: Duration::from_millis(config.inter_option_delay_ms),
            max_attempts: config.max_attempts,
            press_delay: Duration::from_millis(config.press_delay_ms),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            force_delay: Duration::from_millis(config.force_delay_ms),
            error_cooldown: Duration::from_millis(config.error_cooldown_ms),
            answer_jitter: Duration::from_millis(config.answer_jitter_ms),
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 一次注入的汇总结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InjectReport {
    /// 答案总数
    pub total: usize,
    /// 成功确认选中的选项数
    pub applied_options: usize,
    /// 成功写入的填空题数
    pub filled_blanks: usize,
    /// 容器或输入框缺失而整题跳过的数量
    pub skipped_questions: usize,
    /// 选项缺失或出错而跳过的选项数
    pub skipped_options: usize,
    /// 重试耗尽仍未选中的选项数
    pub unchecked_options: usize,
}

impl InjectReport {
    /// 是否有任何单元没有完整落地
    pub fn is_partial(&self) -> bool {
        self.skipped_questions + self.skipped_options + self.unchecked_options > 0
    }
}

/// 单个选项的处理结果
enum OptionOutcome {
    Applied,
    NotFound,
    Unchecked,
}

/// 注入器
///
/// 持有活动文档句柄和节奏参数，每个答案内部临时定位控件，
/// 不在答案之间保留任何元素引用。
pub struct Injector<'a, D: QuizDom + ?Sized> {
    dom: &'a D,
    pacing: Pacing,
    cancel: CancellationToken,
}

impl<'a, D: QuizDom + ?Sized> Injector<'a, D> {
    pub fn new(dom: &'a D, pacing: Pacing, cancel: CancellationToken) -> Self {
        Self {
            dom,
            pacing,
            cancel,
        }
    }

    /// 按顺序注入全部答案
    ///
    /// 只有空答案批次会在入口处被拒绝；之后的一切失败都
    /// 收敛进 `InjectReport`，不会中断批次。
    pub async fn inject(&self, answers: &[AnswerRecord]) -> Result<InjectReport> {
        if answers.is_empty() {
            return Err(AppError::EmptyAnswerBatch.into());
        }

        let mut report = InjectReport {
            total: answers.len(),
            ..Default::default()
        };

        for answer in answers {
            let question_id = answer.id.to_string();

            // 注入阶段只认活动页面此刻的容器类别
            match self.dom.locate_container(&question_id).await? {
                None => {
                    // 容器缺失不是瞬态故障，不重试
                    warn!("未找到题目 {} 的容器", question_id);
                    report.skipped_questions += 1;
                    self.pause(self.pacing.base_delay).await?;
                    continue;
                }
                Some(ContainerClass::Choice) => {
                    self.apply_choice(&question_id, answer, &mut report).await?;
                }
                Some(ContainerClass::FillBlank) => {
                    self.apply_fill_blank(&question_id, answer, &mut report)
                        .await?;
                }
            }

            self.pause_between_answers().await?;
        }

        info!(
            "注入完成: 选项 {} / 填空 {} / 跳过题目 {} / 跳过选项 {} / 未选中 {}",
            report.applied_options,
            report.filled_blanks,
            report.skipped_questions,
            report.skipped_options,
            report.unchecked_options
        );

        Ok(report)
    }

    /// 处理一道选择题的全部选项，严格按答案给出的顺序
    async fn apply_choice(
        &self,
        question_id: &str,
        answer: &AnswerRecord,
        report: &mut InjectReport,
    ) -> Result<()> {
        for selected in &answer.answer {
            let outcome = match self.apply_option(question_id, selected).await {
                Ok(outcome) => outcome,
                Err(e) if is_cancelled(&e) => return Err(e),
                Err(e) => {
                    // 单个选项的异常不中断剩余选项，冷却后继续
                    error!("选择选项 {} 时出错: {}", selected, e);
                    report.skipped_options += 1;
                    self.pause(self.pacing.error_cooldown).await?;
                    continue;
                }
            };
            match outcome {
                OptionOutcome::Applied => report.applied_options += 1,
                OptionOutcome::NotFound => report.skipped_options += 1,
                OptionOutcome::Unchecked => report.unchecked_options += 1,
            }
        }
        Ok(())
    }

    /// 处理一个选项：定位控件、高亮、点击重试
    async fn apply_option(&self, question_id: &str, selected: &str) -> Result<OptionOutcome> {
        // 模型给的是不带句点的位置标签，页面上的带句点
        let pos_label = format!("{}.", selected.trim_end_matches('.'));

        let Some(input_id) = self
            .dom
            .resolve_choice_input(question_id, &pos_label)
            .await?
        else {
            warn!("未找到题目 {} 的选项 {}", question_id, pos_label);
            return Ok(OptionOutcome::NotFound);
        };

        self.pause(self.pacing.inter_option_delay).await?;

        self.dom
            .set_highlight(question_id, &pos_label, true)
            .await?;

        let checked = self.click_until_checked(&input_id).await;

        // 无论选中与否都清除高亮
        self.dom
            .set_highlight(question_id, &pos_label, false)
            .await?;

        if checked? {
            debug!("题目 {} 选项 {} 已选中", question_id, pos_label);
            Ok(OptionOutcome::Applied)
        } else {
            Ok(OptionOutcome::Unchecked)
        }
    }

    /// 选中状态重试环
    ///
    /// 每轮：mousedown → mouseup → click，给页面脚本留响应
    /// 时间后复查选中标志；仍未选中则强制置位 + change 兜底。
    /// 一旦读到已选中立刻退出；控件本来就选中时一个事件都
    /// 不会派发。
    async fn click_until_checked(&self, input_id: &str) -> Result<bool> {
        let mut attempts = 0;

        while !self.dom.is_checked(input_id).await? && attempts < self.pacing.max_attempts {
            self.dom
                .dispatch_event(input_id, ControlEvent::MouseDown)
                .await?;
            self.pause(self.pacing.press_delay).await?;
            self.dom
                .dispatch_event(input_id, ControlEvent::MouseUp)
                .await?;
            self.pause(self.pacing.press_delay).await?;
            self.dom
                .dispatch_event(input_id, ControlEvent::Click)
                .await?;
            self.pause(self.pacing.settle_delay).await?;

            if !self.dom.is_checked(input_id).await? {
                self.dom.force_checked(input_id).await?;
                self.pause(self.pacing.force_delay).await?;
            }

            attempts += 1;
        }

        let checked = self.dom.is_checked(input_id).await?;
        if !checked {
            warn!("选项 {} 多次尝试后仍未选中", input_id);
        }
        Ok(checked)
    }

    /// 填空题：逐空文本用全角逗号拼接后一次写入
    async fn apply_fill_blank(
        &self,
        question_id: &str,
        answer: &AnswerRecord,
        report: &mut InjectReport,
    ) -> Result<()> {
        let text = answer.answer.join("，");

        if self.dom.fill_blank(question_id, &text).await? {
            debug!("题目 {} 已写入填空内容", question_id);
            report.filled_blanks += 1;
        } else {
            warn!("未找到题目 {} 的填空输入框", question_id);
            report.skipped_questions += 1;
        }
        Ok(())
    }

    /// 题间停顿：基础延迟 + 随机抖动
    async fn pause_between_answers(&self) -> Result<()> {
        let jitter = if self.pacing.answer_jitter.is_zero() {
            Duration::ZERO
        } else {
            let upper = self.pacing.answer_jitter.as_millis() as u64;
            Duration::from_millis(rand::thread_rng().gen_range(0..upper))
        };
        self.pause(self.pacing.base_delay + jitter).await
    }

    /// 可取消的停顿；所有挂起点都经过这里
    async fn pause(&self, delay: Duration) -> Result<()> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::Cancelled.into()),
            _ = sleep(delay) => Ok(()),
        }
    }
}
