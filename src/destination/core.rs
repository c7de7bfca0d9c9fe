use crate::destination::filter::{Filter, FilterKind, FilterOptions, FilterTarget};
use crate::error::Result;
use crate::level::LogLevel;
use crate::queue::{ExecutionContext, QueueOptions};
use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// destination 的通用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SmartDefault, Validate)]
#[serde(default)]
pub struct DestinationOptions {
    /// 可选的唯一名称，用于定向投递
    #[garde(length(min = 1))]
    pub label: Option<String>,

    /// 最低日志级别
    #[garde(skip)]
    pub min_level: LogLevel,

    /// 是否异步发送
    #[default = true]
    #[garde(skip)]
    pub asynchronous: bool,

    /// 执行队列配置
    #[garde(dive)]
    pub queue: QueueOptions,

    /// 过滤器配置
    #[garde(dive)]
    pub filters: Vec<FilterOptions>,
}

static QUEUE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// destination 共享的状态与准入逻辑
///
/// 具体的 destination 持有一个 `DestinationCore`，并把
/// [`Destination`](super::Destination) 的大部分方法委托给它
pub struct DestinationCore {
    label: Option<String>,
    min_level: LogLevel,
    asynchronous: bool,
    filters: Vec<Filter>,
    queue: Option<Arc<dyn ExecutionContext>>,
}

impl DestinationCore {
    /// 按配置创建，`kind` 用于生成执行队列（及其工作线程）的名称
    pub fn new(kind: &str, options: DestinationOptions) -> Result<Self> {
        options.validate()?;

        let queue_name = match &options.label {
            Some(label) => format!("logcast.{}", label),
            None => format!(
                "logcast.{}.{}",
                kind,
                QUEUE_SEQUENCE.fetch_add(1, Ordering::Relaxed)
            ),
        };
        let queue = options.queue.build(&queue_name)?;

        let filters = options
            .filters
            .into_iter()
            .map(Filter::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            label: options.label,
            min_level: options.min_level,
            asynchronous: options.asynchronous,
            filters,
            queue,
        })
    }

    /// 使用指定的执行队列创建，`queue` 为 `None` 时 destination 不接收日志
    pub fn with_queue(
        label: Option<String>,
        min_level: LogLevel,
        asynchronous: bool,
        queue: Option<Arc<dyn ExecutionContext>>,
    ) -> Self {
        Self {
            label: label.filter(|l| !l.is_empty()),
            min_level,
            asynchronous,
            filters: Vec::new(),
            queue,
        }
    }

    /// 追加一个已编译的过滤器
    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn is_asynchronous(&self) -> bool {
        self.asynchronous
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn execution_context(&self) -> Option<&dyn ExecutionContext> {
        self.queue.as_deref()
    }

    pub fn has_message_filters(&self) -> bool {
        self.filters
            .iter()
            .any(|f| f.target() == FilterTarget::Message)
    }

    /// 准入判定
    ///
    /// 1. 级别低于 `min_level` 时拒绝
    /// 2. 任一生效的排除过滤器匹配时拒绝
    /// 3. 所有生效的必选过滤器都必须匹配
    /// 4. 存在生效的可选过滤器时，至少匹配其中一个
    pub fn should_log(
        &self,
        level: LogLevel,
        path: &str,
        function: &str,
        message: Option<&str>,
    ) -> bool {
        if level < self.min_level {
            return false;
        }

        let mut optional_seen = false;
        let mut optional_matched = false;
        for filter in self.filters.iter().filter(|f| f.applies_to(level)) {
            let matched = filter.matches(path, function, message);
            match filter.kind() {
                FilterKind::Excluded if matched => return false,
                FilterKind::Excluded => {}
                FilterKind::Required if !matched => return false,
                FilterKind::Required => {}
                FilterKind::Optional => {
                    optional_seen = true;
                    optional_matched |= matched;
                }
            }
        }

        !optional_seen || optional_matched
    }
}

impl std::fmt::Debug for DestinationCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestinationCore")
            .field("label", &self.label)
            .field("min_level", &self.min_level)
            .field("asynchronous", &self.asynchronous)
            .field("filters", &self.filters)
            .field("queue", &self.queue.as_ref().map(|q| q.name().to_string()))
            .finish()
    }
}
