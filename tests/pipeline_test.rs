//! 全流程测试：抽取 → 求解（脚本化） → 注入（内存 mock）

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use mooc_auto_answer::orchestrator::run_pipeline;
use mooc_auto_answer::prompt::ANSWER_FORMAT_SUFFIX;
use mooc_auto_answer::{AnswerResolver, Config, ContainerClass, ControlEvent, QuizDom};

/// 页面固定快照：一道单选（题号 1）+ 一道填空（题号 2）
const PAGE_HTML: &str = r#"
<html><body>
<div class="m-choiceQuestion u-questionItem">
    <div class="position">1</div>
    <div class="qaCate"><span>单选</span>(2分)</div>
    <div class="j-richTxt">1+1 等于几？</div>
    <ul class="choices">
        <li><label class="u-tbl" for="q1-a"><span class="optionPos">A.</span><span class="optionCnt">1</span></label></li>
        <li><label class="u-tbl" for="q1-b"><span class="optionPos">B.</span><span class="optionCnt">2</span></label></li>
    </ul>
</div>
<div class="m-FillBlank u-questionItem">
    <div class="position">2</div>
    <div class="qaCate"><span>填空</span>(4分)</div>
    <div class="j-richTxt">水的化学式是__。</div>
    <textarea class="j-textarea inputtxt"></textarea>
</div>
</body></html>"#;

/// 内存活动文档：HTML 快照固定，控件状态可变
struct FakePage {
    html: String,
    /// input_id -> 选中标志；click 一次即置位（页面脚本配合）
    checked: Mutex<HashMap<String, bool>>,
    blank_value: Mutex<Option<String>>,
}

impl FakePage {
    fn new(html: &str) -> Self {
        let mut checked = HashMap::new();
        checked.insert("q1-a".to_string(), false);
        checked.insert("q1-b".to_string(), false);
        Self {
            html: html.to_string(),
            checked: Mutex::new(checked),
            blank_value: Mutex::new(None),
        }
    }
}

#[async_trait]
impl QuizDom for FakePage {
    async fn snapshot_html(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    async fn locate_container(&self, question_id: &str) -> Result<Option<ContainerClass>> {
        Ok(match question_id {
            "1" => Some(ContainerClass::Choice),
            "2" => Some(ContainerClass::FillBlank),
            _ => None,
        })
    }

    async fn resolve_choice_input(
        &self,
        question_id: &str,
        option_pos: &str,
    ) -> Result<Option<String>> {
        Ok(match (question_id, option_pos) {
            ("1", "A.") => Some("q1-a".to_string()),
            ("1", "B.") => Some("q1-b".to_string()),
            _ => None,
        })
    }

    async fn is_checked(&self, input_id: &str) -> Result<bool> {
        Ok(*self.checked.lock().unwrap().get(input_id).unwrap_or(&false))
    }

    async fn dispatch_event(&self, input_id: &str, event: ControlEvent) -> Result<()> {
        if event == ControlEvent::Click {
            if let Some(flag) = self.checked.lock().unwrap().get_mut(input_id) {
                *flag = true;
            }
        }
        Ok(())
    }

    async fn force_checked(&self, input_id: &str) -> Result<()> {
        if let Some(flag) = self.checked.lock().unwrap().get_mut(input_id) {
            *flag = true;
        }
        Ok(())
    }

    async fn set_highlight(&self, _question_id: &str, _option_pos: &str, _on: bool) -> Result<()> {
        Ok(())
    }

    async fn fill_blank(&self, question_id: &str, text: &str) -> Result<bool> {
        if question_id != "2" {
            return Ok(false);
        }
        *self.blank_value.lock().unwrap() = Some(text.to_string());
        Ok(true)
    }
}

/// 脚本化求解方：记录收到的提示词，返回预置文本
struct ScriptedResolver {
    reply: String,
    seen_prompt: Mutex<Option<String>>,
}

impl ScriptedResolver {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen_prompt: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AnswerResolver for ScriptedResolver {
    async fn resolve(&self, prompt: &str, _imgs: &[String]) -> Result<String> {
        *self.seen_prompt.lock().unwrap() = Some(prompt.to_string());
        Ok(self.reply.clone())
    }
}

#[tokio::test(start_paused = true)]
async fn full_pipeline_extracts_resolves_and_injects() {
    let page = FakePage::new(PAGE_HTML);
    let resolver = ScriptedResolver::new(
        "```json\n[{\"id\": 1, \"answer\": [\"B\"]}, {\"id\": 2, \"answer\": [\"H2O\"]}]\n```",
    );
    let config = Config::default();

    let report = run_pipeline(&page, &resolver, &config, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.questions, 2);
    assert_eq!(report.answers, 2);
    assert_eq!(report.inject.applied_options, 1);
    assert_eq!(report.inject.filled_blanks, 1);
    assert!(!report.inject.is_partial());

    // 注入结果落在"活动页面"上
    assert!(*page.checked.lock().unwrap().get("q1-b").unwrap());
    assert!(!*page.checked.lock().unwrap().get("q1-a").unwrap());
    assert_eq!(page.blank_value.lock().unwrap().as_deref(), Some("H2O"));

    // 发出的提示词：逐题规范文本 + 固定指令后缀
    let prompt = page_prompt(&resolver);
    assert!(prompt.contains("1. 单选 1+1 等于几？\nA.1\nB.2\n"));
    assert!(prompt.contains("2. 填空 水的化学式是__。\n填空数: 1\n"));
    assert!(prompt.ends_with(ANSWER_FORMAT_SUFFIX));
}

fn page_prompt(resolver: &ScriptedResolver) -> String {
    resolver.seen_prompt.lock().unwrap().clone().unwrap()
}

#[tokio::test(start_paused = true)]
async fn malformed_resolver_output_fails_the_whole_run() {
    let page = FakePage::new(PAGE_HTML);
    let resolver = ScriptedResolver::new("抱歉，这些题我不会。");
    let config = Config::default();

    let result = run_pipeline(&page, &resolver, &config, CancellationToken::new()).await;
    assert!(result.is_err());

    // 没有任何注入发生
    assert!(!*page.checked.lock().unwrap().get("q1-b").unwrap());
    assert!(page.blank_value.lock().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn page_without_questions_fails_before_resolving() {
    let page = FakePage::new("<html><body><p>没有测验</p></body></html>");
    let resolver = ScriptedResolver::new("[]");
    let config = Config::default();

    let result = run_pipeline(&page, &resolver, &config, CancellationToken::new()).await;
    assert!(result.is_err());
    // 求解方根本没被调用
    assert!(resolver.seen_prompt.lock().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn stale_answer_ids_do_not_block_the_rest() {
    let page = FakePage::new(PAGE_HTML);
    // 99 号题在页面上不存在，1 号题照常处理
    let resolver = ScriptedResolver::new(
        "[{\"id\": 99, \"answer\": [\"A\"]}, {\"id\": 1, \"answer\": [\"B\"]}]",
    );
    let config = Config::default();

    let report = run_pipeline(&page, &resolver, &config, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.inject.skipped_questions, 1);
    assert_eq!(report.inject.applied_options, 1);
    assert!(*page.checked.lock().unwrap().get("q1-b").unwrap());
}
