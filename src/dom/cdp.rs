//! CDP 实现
//!
//! 持有唯一的 Page 资源，把 `QuizDom` 的每个能力翻译成一段
//! 在页面上下文里求值的 JS。所有定位都即时重新查询，不缓存
//! 元素引用——页面随时可能被宿主脚本重建。

use anyhow::{bail, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;

use super::{ContainerClass, ControlEvent, QuizDom};

/// 基于 Chrome DevTools Protocol 的活动文档实现
pub struct CdpDom {
    page: Page,
}

impl CdpDom {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于导航等其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并反序列化为指定类型
    async fn eval_as<T: DeserializeOwned>(&self, js_code: String) -> Result<T> {
        let result = self.page.evaluate(js_code).await?;
        let typed_value = result.into_value()?;
        Ok(typed_value)
    }
}

/// 按题号查找容器的 JS 片段，返回 `[node, class]` 或 null
const FIND_CONTAINER_JS: &str = r#"
    const findContainer = (qid) => {
        const sets = [
            ['.m-choiceQuestion.u-questionItem', 'choice'],
            ['.m-FillBlank.u-questionItem', 'fillblank'],
        ];
        for (const [sel, cls] of sets) {
            for (const node of document.querySelectorAll(sel)) {
                const pos = node.querySelector('.position');
                if (pos && pos.textContent.trim() === qid) return [node, cls];
            }
        }
        return null;
    };
"#;

/// 字符串转 JS 字面量（JSON 转义）
fn js_str(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

#[async_trait]
impl QuizDom for CdpDom {
    async fn snapshot_html(&self) -> Result<String> {
        self.eval_as("document.documentElement.outerHTML".to_string())
            .await
    }

    async fn locate_container(&self, question_id: &str) -> Result<Option<ContainerClass>> {
        let js_code = format!(
            r#"(() => {{
                {FIND_CONTAINER_JS}
                const hit = findContainer({qid});
                return hit ? hit[1] : null;
            }})()"#,
            qid = js_str(question_id),
        );
        let class: Option<String> = self.eval_as(js_code).await?;
        match class.as_deref() {
            None => Ok(None),
            Some("choice") => Ok(Some(ContainerClass::Choice)),
            Some("fillblank") => Ok(Some(ContainerClass::FillBlank)),
            Some(other) => bail!("未知的容器类别: {}", other),
        }
    }

    async fn resolve_choice_input(
        &self,
        question_id: &str,
        option_pos: &str,
    ) -> Result<Option<String>> {
        let js_code = format!(
            r#"(() => {{
                {FIND_CONTAINER_JS}
                const hit = findContainer({qid});
                if (!hit) return null;
                for (const label of hit[0].querySelectorAll('label.u-tbl')) {{
                    const pos = label.querySelector('.optionPos');
                    if (pos && pos.textContent.trim() === {pos}) {{
                        return label.getAttribute('for');
                    }}
                }}
                return null;
            }})()"#,
            qid = js_str(question_id),
            pos = js_str(option_pos),
        );
        self.eval_as(js_code).await
    }

    async fn is_checked(&self, input_id: &str) -> Result<bool> {
        let js_code = format!(
            r#"(() => {{
                const el = document.getElementById({id});
                return !!(el && el.checked);
            }})()"#,
            id = js_str(input_id),
        );
        self.eval_as(js_code).await
    }

    async fn dispatch_event(&self, input_id: &str, event: ControlEvent) -> Result<()> {
        let ctor = if event.is_mouse() {
            format!(
                "new MouseEvent({}, {{ bubbles: true, cancelable: true, view: window }})",
                js_str(event.name())
            )
        } else {
            format!("new Event({}, {{ bubbles: true }})", js_str(event.name()))
        };
        let js_code = format!(
            r#"(() => {{
                const el = document.getElementById({id});
                if (!el) return false;
                el.dispatchEvent({ctor});
                return true;
            }})()"#,
            id = js_str(input_id),
        );
        let found: bool = self.eval_as(js_code).await?;
        if !found {
            bail!("控件 {} 已不在页面上", input_id);
        }
        Ok(())
    }

    async fn force_checked(&self, input_id: &str) -> Result<()> {
        let js_code = format!(
            r#"(() => {{
                const el = document.getElementById({id});
                if (!el) return false;
                el.checked = true;
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            id = js_str(input_id),
        );
        let found: bool = self.eval_as(js_code).await?;
        if !found {
            bail!("控件 {} 已不在页面上", input_id);
        }
        Ok(())
    }

    async fn set_highlight(&self, question_id: &str, option_pos: &str, on: bool) -> Result<()> {
        let color = if on { "#f0f8ff" } else { "" };
        let js_code = format!(
            r#"(() => {{
                {FIND_CONTAINER_JS}
                const hit = findContainer({qid});
                if (!hit) return false;
                for (const label of hit[0].querySelectorAll('label.u-tbl')) {{
                    const pos = label.querySelector('.optionPos');
                    if (pos && pos.textContent.trim() === {pos}) {{
                        label.style.transition = 'background-color 0.3s';
                        label.style.backgroundColor = {color};
                        return true;
                    }}
                }}
                return false;
            }})()"#,
            qid = js_str(question_id),
            pos = js_str(option_pos),
            color = js_str(color),
        );
        // 高亮只是视觉反馈，找不到目标也不算错误
        let _: bool = self.eval_as(js_code).await?;
        Ok(())
    }

    async fn fill_blank(&self, question_id: &str, text: &str) -> Result<bool> {
        let js_code = format!(
            r#"(() => {{
                {FIND_CONTAINER_JS}
                const hit = findContainer({qid});
                if (!hit || hit[1] !== 'fillblank') return false;
                const area = hit[0].querySelector('textarea.j-textarea.inputtxt');
                if (!area) return false;
                area.value = {text};
                area.dispatchEvent(new Event('input', {{ bubbles: true }}));
                area.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            qid = js_str(question_id),
            text = js_str(text),
        );
        self.eval_as(js_code).await
    }
}
