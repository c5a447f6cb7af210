use thiserror::Error;

/// 应用程序错误类型
///
/// 流水线内部的单题/单选项失败只记日志不抛错，这里只收敛
/// 真正致命或需要上层分支处理的错误类别。
#[derive(Debug, Error)]
pub enum AppError {
    /// 页面中未匹配到任何题目容器
    #[error("页面中未找到任何题目")]
    NoQuestions,

    /// 大模型返回内容为空
    #[error("模型返回内容为空")]
    EmptyResponse,

    /// 大模型响应无法解析为答案 JSON（整次运行的唯一致命格式错误）
    #[error("模型响应缺少有效的答案 JSON: {0}")]
    AnswerFormat(String),

    /// 答题数据为空，注入器在入口处直接拒绝
    #[error("答题数据为空")]
    EmptyAnswerBatch,

    /// 运行被操作者取消
    #[error("本次运行已被取消")]
    Cancelled,
}

/// 判断 anyhow 错误链中是否为取消信号
///
/// 注入器把取消当错误向上传，调用方用它区分"取消"和"真失败"
pub fn is_cancelled(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<AppError>(), Some(AppError::Cancelled))
}
