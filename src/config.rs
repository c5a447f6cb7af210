/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 目标URL（测验页面所在站点）
    pub target_url: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 注入节奏配置 ---
    /// 每道题之间的基础停顿（毫秒）
    pub base_delay_ms: u64,
    /// 同一道题内选项之间的停顿（毫秒）
    pub inter_option_delay_ms: u64,
    /// 选中状态重试上限
    pub max_attempts: u32,
    /// 合成按下/抬起事件之间的停顿（毫秒）
    pub press_delay_ms: u64,
    /// click 之后留给页面脚本响应的时间（毫秒）
    pub settle_delay_ms: u64,
    /// 强制置位后的停顿（毫秒）
    pub force_delay_ms: u64,
    /// 单个选项出错后的冷却时间（毫秒）
    pub error_cooldown_ms: u64,
    /// 每道题之后随机抖动的上限（毫秒）
    pub answer_jitter_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            target_url: "https://www.icourse163.org/".to_string(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.deepseek.com/v1".to_string(),
            llm_model_name: "deepseek-chat".to_string(),
            base_delay_ms: 1200,
            inter_option_delay_ms: 500,
            max_attempts: 3,
            press_delay_ms: 50,
            settle_delay_ms: 150,
            force_delay_ms: 100,
            error_cooldown_ms: 800,
            answer_jitter_ms: 800,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            target_url: std::env::var("TARGET_URL").unwrap_or(default.target_url),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            base_delay_ms: std::env::var("BASE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.base_delay_ms),
            inter_option_delay_ms: std::env::var("INTER_OPTION_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.inter_option_delay_ms),
            max_attempts: std::env::var("MAX_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_attempts),
            press_delay_ms: std::env::var("PRESS_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.press_delay_ms),
            settle_delay_ms: std::env::var("SETTLE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_delay_ms),
            force_delay_ms: std::env::var("FORCE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.force_delay_ms),
            error_cooldown_ms: std::env::var("ERROR_COOLDOWN_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.error_cooldown_ms),
            answer_jitter_ms: std::env::var("ANSWER_JITTER_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.answer_jitter_ms),
        }
    }
}
