use crate::level::LogLevel;
use crate::queue::ExecutionContext;
use crate::record::LogRecord;
use std::sync::Arc;

/// 日志目的地 trait
///
/// 分发器只通过该 trait 与具体 destination 交互：
/// 先用 `is_match` 检查目标名称，再用 `should_log` 做级别与过滤判定，
/// 最后在 `execution_context` 上同步或异步调用 `send`
pub trait Destination: Send + Sync {
    /// 可选的唯一名称
    fn label(&self) -> Option<&str>;

    /// 最低日志级别
    fn min_level(&self) -> LogLevel;

    /// 事件没有指定目标，或目标与本 destination 的 label 相同
    fn is_match(&self, target: Option<&str>) -> bool {
        match target {
            None => true,
            Some(target) => self.label() == Some(target),
        }
    }

    /// 准入判定是否依赖已求值的消息
    fn has_message_filters(&self) -> bool {
        false
    }

    /// 准入判定
    ///
    /// 不需要消息过滤时 `message` 可能为 `None`，默认实现只比较级别
    fn should_log(
        &self,
        level: LogLevel,
        _path: &str,
        _function: &str,
        _message: Option<&str>,
    ) -> bool {
        level >= self.min_level()
    }

    /// 输出日志，返回值可以忽略
    fn send(&self, record: &LogRecord) -> Option<String>;

    /// 执行上下文，`None` 表示该 destination 不接收任何日志
    fn execution_context(&self) -> Option<&dyn ExecutionContext>;

    /// 是否异步发送
    fn is_asynchronous(&self) -> bool;

    /// 刷新缓冲区（默认实现为空操作），在执行上下文上被调用
    fn flush(&self) {}
}

/// destination 的身份标识
///
/// 由共享分配的地址得到：同一个 `Arc` 的所有克隆拥有相同的标识，
/// 两个内容相同但分别创建的 destination 标识不同
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestinationId(usize);

impl DestinationId {
    pub fn of(destination: &Arc<dyn Destination>) -> Self {
        DestinationId(Arc::as_ptr(destination) as *const () as usize)
    }
}
