//! 日志宏
//!
//! 自动捕获调用点，消息按 `format!` 语法书写，只有在某个 destination 需要时才会格式化
//!
//! # 示例
//!
//! ```
//! use logcast::{debug, error, info, Dispatcher};
//!
//! let dispatcher = Dispatcher::new();
//! let user = "alice";
//!
//! info!(dispatcher, "user {} logged in", user);
//! debug!(dispatcher, "cache size: {}", 42);
//! error!(dispatcher, target: "console", "disk full");
//! ```

/// 按指定级别记录日志，返回接收该事件的 destination 数量
///
/// ```
/// use logcast::{log, Dispatcher, LogLevel};
///
/// let dispatcher = Dispatcher::new();
/// log!(dispatcher, LogLevel::Warning, "retry {}", 3);
/// log!(dispatcher, LogLevel::Error, target: "file", "giving up");
/// ```
#[macro_export]
macro_rules! log {
    ($dispatcher:expr, $level:expr, target: $target:expr, $($arg:tt)+) => {
        $dispatcher.custom(
            $level,
            ::core::option::Option::Some($target),
            || ::std::format!($($arg)+),
            $crate::call_site!(),
            ::core::option::Option::None,
        )
    };
    ($dispatcher:expr, $level:expr, $($arg:tt)+) => {
        $dispatcher.custom(
            $level,
            ::core::option::Option::None,
            || ::std::format!($($arg)+),
            $crate::call_site!(),
            ::core::option::Option::None,
        )
    };
}

/// 记录 VERBOSE 级别日志
#[macro_export]
macro_rules! verbose {
    ($dispatcher:expr, target: $target:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::LogLevel::Verbose, target: $target, $($arg)+)
    };
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::LogLevel::Verbose, $($arg)+)
    };
}

/// 记录 DEBUG 级别日志
#[macro_export]
macro_rules! debug {
    ($dispatcher:expr, target: $target:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::LogLevel::Debug, target: $target, $($arg)+)
    };
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// 记录 INFO 级别日志
#[macro_export]
macro_rules! info {
    ($dispatcher:expr, target: $target:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::LogLevel::Info, target: $target, $($arg)+)
    };
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::LogLevel::Info, $($arg)+)
    };
}

/// 记录 WARNING 级别日志
#[macro_export]
macro_rules! warning {
    ($dispatcher:expr, target: $target:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::LogLevel::Warning, target: $target, $($arg)+)
    };
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// 记录 ERROR 级别日志
#[macro_export]
macro_rules! error {
    ($dispatcher:expr, target: $target:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::LogLevel::Error, target: $target, $($arg)+)
    };
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::LogLevel::Error, $($arg)+)
    };
}
