//! 应用入口层
//!
//! 持有浏览器连接、活动文档句柄和求解服务，向外只暴露
//! "现在跑一次完整流水线"和"只看抽取结果"两个入口。

use anyhow::Result;
use chromiumoxide::Browser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::dom::CdpDom;
use crate::orchestrator::{self, PipelineReport};
use crate::prompt::simple_question;
use crate::services::LlmService;

/// 应用主结构
pub struct App {
    config: Config,
    // 连接必须活到进程结束，否则 CDP 会话随之关闭
    _browser: Browser,
    dom: CdpDom,
    resolver: LlmService,
    cancel: CancellationToken,
}

impl App {
    /// 初始化应用：连接浏览器、定位测验页面、准备求解服务
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let (browser, page) =
            browser::connect_to_browser_and_page(config.browser_debug_port, Some(&config.target_url))
                .await?;

        let resolver = LlmService::new(&config);
        let cancel = CancellationToken::new();

        // Ctrl-C 触发协作式取消，注入器在下一个挂起点停下
        let cancel_on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("收到中断信号，正在取消本次运行...");
                cancel_on_signal.cancel();
            }
        });

        Ok(Self {
            config,
            _browser: browser,
            dom: CdpDom::new(page),
            resolver,
            cancel,
        })
    }

    /// 运行完整流水线并打印最终状态
    pub async fn run(&self) -> Result<()> {
        let status = self.run_once().await;
        info!("本次运行状态: {}", status);
        Ok(())
    }

    /// 跑一次流水线，返回粗粒度状态："ok" 或错误信息
    ///
    /// 单题/单选项级别的失败只体现在日志和汇总数字里，
    /// 不影响整体状态。
    pub async fn run_once(&self) -> String {
        match orchestrator::run_pipeline(
            &self.dom,
            &self.resolver,
            &self.config,
            self.cancel.clone(),
        )
        .await
        {
            Ok(report) => {
                log_report(&report);
                "ok".to_string()
            }
            Err(e) => {
                error!("❌ 流水线失败: {:#}", e);
                format!("{:#}", e)
            }
        }
    }

    /// 诊断入口：只抽取并打印题目，不求解不注入
    pub async fn dump_questions(&self) -> Result<()> {
        let questions = orchestrator::fetch_questions(&self.dom).await?;
        info!("抽取到 {} 道题目", questions.len());
        for q in &questions {
            println!("{}", simple_question(q));
        }
        Ok(())
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 自动答题流水线启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 目标站点: {}", config.target_url);
    info!("🧠 答题模型: {}", config.llm_model_name);
    info!("{}", "=".repeat(60));
}

fn log_report(report: &PipelineReport) {
    info!("{}", "─".repeat(60));
    info!(
        "📊 本次运行: 题目 {} / 答案 {} / 选中 {} / 填空 {}",
        report.questions,
        report.answers,
        report.inject.applied_options,
        report.inject.filled_blanks
    );
    if report.inject.is_partial() {
        warn!(
            "⚠️ 部分未落地: 跳过题目 {} / 跳过选项 {} / 未选中 {}",
            report.inject.skipped_questions,
            report.inject.skipped_options,
            report.inject.unchecked_options
        );
    }
    info!("{}", "─".repeat(60));
}
