use anyhow::Result;
use mooc_auto_answer::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    mooc_auto_answer::logger::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化应用（连接浏览器、定位测验页面）
    let app = App::initialize(config).await?;

    // `--dump-questions`：只输出抽取结果，便于人工检查
    if std::env::args().any(|arg| arg == "--dump-questions") {
        app.dump_questions().await?;
        return Ok(());
    }

    app.run().await?;

    Ok(())
}
