//! 调用线程名称解析
//!
//! 分发器在构造日志事件时调用 [`ThreadNamer`] 获取当前线程的可读名称。
//! 不提供可靠线程命名能力的平台返回空字符串，这是合法结果而不是错误。

use std::sync::Arc;

/// 线程名称解析策略
pub trait ThreadNamer: Send + Sync {
    /// 返回当前调用线程的名称
    fn current_thread_name(&self) -> String;
}

/// 基于标准库线程信息的解析策略
///
/// - 名称为 `main` 的线程返回空字符串。标准库按名称标记主线程，
///   因此被用户命名为 `main` 的线程同样返回空字符串
/// - 其他具名线程返回其名称
/// - 匿名线程返回 `ThreadId` 的调试表示
#[derive(Debug, Default, Clone, Copy)]
pub struct StdThreadNamer;

impl ThreadNamer for StdThreadNamer {
    fn current_thread_name(&self) -> String {
        let thread = std::thread::current();
        match thread.name() {
            Some("main") => String::new(),
            Some(name) => name.to_string(),
            None => format!("{:?}", thread.id()),
        }
    }
}

/// 总是返回空字符串的解析策略
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyThreadNamer;

impl ThreadNamer for EmptyThreadNamer {
    fn current_thread_name(&self) -> String {
        String::new()
    }
}

/// 当前平台的默认解析策略
#[cfg(target_arch = "wasm32")]
pub fn default_thread_namer() -> Arc<dyn ThreadNamer> {
    Arc::new(EmptyThreadNamer)
}

/// 当前平台的默认解析策略
#[cfg(not(target_arch = "wasm32"))]
pub fn default_thread_namer() -> Arc<dyn ThreadNamer> {
    Arc::new(StdThreadNamer)
}
