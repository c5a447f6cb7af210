//! # MOOC Auto Answer
//!
//! 针对中国大学 MOOC（icourse163）测验页面的自动答题流水线
//!
//! ## 架构设计
//!
//! 整条流水线分为两段核心 + 一层编排：
//!
//! ### ① 抽取（Extractor）
//! - `extractor` - 纯函数：页面 HTML → 规范化的 `QuestionRecord` 序列
//! - 不做任何 I/O，对残缺标记降级处理，绝不 panic
//!
//! ### ② 注入（Injector）
//! - `injector` - 带重试状态机的执行器，按顺序驱动页面原生控件
//! - `dom` - 活动文档抽象（`QuizDom`），CDP 实现 + 测试用 mock
//!
//! ### ③ 编排（Orchestrator）
//! - `orchestrator` - 抽取 → 大模型求解 → 注入，统一上报结果
//! - `services` - 大模型求解能力（async-openai）与答案 JSON 边界校验
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod config;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod injector;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod services;

// 重新导出常用类型
pub use app::App;
pub use browser::connect_to_browser_and_page;
pub use config::Config;
pub use dom::{ContainerClass, ControlEvent, QuizDom};
pub use error::AppError;
pub use extractor::parse_questions;
pub use injector::{InjectReport, Injector, Pacing};
pub use models::question::{AnswerRecord, OptionRecord, QuestionKind, QuestionRecord};
pub use services::{AnswerResolver, LlmService};
