//! 日志初始化，供宿主界面程序在启动时调用

use tracing_subscriber::fmt::SubscriberBuilder;

/// 安装全局 fmt 订阅者；已安装过时返回 false
pub fn init_logging(level: tracing::Level) -> bool {
    SubscriberBuilder::default()
        .with_max_level(level)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let _ = init_logging(tracing::Level::INFO);
        assert!(!init_logging(tracing::Level::DEBUG), "重复初始化应返回 false 而不是 panic");
    }
}
