//! 活动文档抽象
//!
//! 注入器不直接接触浏览器：所有对活动页面的观察和变更都
//! 走 `QuizDom`，显式作为参数传入，没有任何环境全局量。
//! 生产实现见 `cdp`（CDP 驱动真实页面），测试里用内存 mock。

mod cdp;

pub use cdp::CdpDom;

use anyhow::Result;
use async_trait::async_trait;

/// 容器的结构类别
///
/// 注入阶段只认活动页面此刻的容器类别，不使用抽取时
/// 记下的题型——两者之间页面可能已经变化。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerClass {
    /// 选择题容器（单选/多选/判断共用）
    Choice,
    /// 填空题容器
    FillBlank,
}

/// 合成事件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    MouseDown,
    MouseUp,
    Click,
    Input,
    Change,
}

impl ControlEvent {
    /// DOM 事件名
    pub fn name(self) -> &'static str {
        match self {
            ControlEvent::MouseDown => "mousedown",
            ControlEvent::MouseUp => "mouseup",
            ControlEvent::Click => "click",
            ControlEvent::Input => "input",
            ControlEvent::Change => "change",
        }
    }

    /// 是否需要按 MouseEvent 构造（带 view / cancelable）
    pub fn is_mouse(self) -> bool {
        matches!(
            self,
            ControlEvent::MouseDown | ControlEvent::MouseUp | ControlEvent::Click
        )
    }
}

/// 活动测验页面能力集
///
/// 选择题控件以元素 id（选项 label 的 for 属性）定位；
/// 题目容器以页面印出的题号文本定位。
#[async_trait]
pub trait QuizDom: Send + Sync {
    /// 当前页面完整 HTML 快照（抽取器的输入）
    async fn snapshot_html(&self) -> Result<String>;

    /// 按题号定位容器，返回其当前结构类别；找不到为 None
    async fn locate_container(&self, question_id: &str) -> Result<Option<ContainerClass>>;

    /// 在选择题容器内按位置标签（如 "B."）解析选项控件 id
    async fn resolve_choice_input(
        &self,
        question_id: &str,
        option_pos: &str,
    ) -> Result<Option<String>>;

    /// 读取控件的选中标志
    async fn is_checked(&self, input_id: &str) -> Result<bool>;

    /// 向控件派发一个合成事件
    async fn dispatch_event(&self, input_id: &str, event: ControlEvent) -> Result<()>;

    /// 强制置位选中标志并派发 change（合成点击均未生效时的兜底）
    async fn force_checked(&self, input_id: &str) -> Result<()>;

    /// 选项 label 的临时高亮开关，纯视觉反馈
    async fn set_highlight(&self, question_id: &str, option_pos: &str, on: bool) -> Result<()>;

    /// 向填空题输入框写入文本并依次派发 input、change
    ///
    /// 返回是否找到了输入框；填空注入没有可观察的后置条件，
    /// 不做重试
    async fn fill_blank(&self, question_id: &str, text: &str) -> Result<bool>;
}
