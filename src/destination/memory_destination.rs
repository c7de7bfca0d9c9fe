use crate::destination::{Destination, DestinationCore, DestinationOptions};
use crate::error::Result;
use crate::level::LogLevel;
use crate::queue::ExecutionContext;
use crate::record::LogRecord;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// MemoryDestination 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct MemoryDestinationConfig {
    /// 最多保留的记录条数，超出后丢弃最旧的记录
    #[default = 10000]
    pub capacity: usize,

    #[serde(flatten)]
    pub destination: DestinationOptions,
}

/// 内存输出
///
/// 在内存中保留最近的日志记录，用于捕获和检查日志
pub struct MemoryDestination {
    capacity: usize,
    records: Mutex<VecDeque<LogRecord>>,
    core: DestinationCore,
}

impl MemoryDestination {
    pub fn new(config: MemoryDestinationConfig) -> Result<Self> {
        Ok(Self::with_core(
            config.capacity,
            DestinationCore::new("memory", config.destination)?,
        ))
    }

    /// 使用已构建的 `DestinationCore` 创建
    pub fn with_core(capacity: usize, core: DestinationCore) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Mutex::new(VecDeque::new()),
            core,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 已保留的记录（按接收顺序）
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().iter().cloned().collect()
    }

    /// 已保留的消息（按接收顺序）
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Destination for MemoryDestination {
    fn label(&self) -> Option<&str> {
        self.core.label()
    }

    fn min_level(&self) -> LogLevel {
        self.core.min_level()
    }

    fn has_message_filters(&self) -> bool {
        self.core.has_message_filters()
    }

    fn should_log(&self, level: LogLevel, path: &str, function: &str, message: Option<&str>) -> bool {
        self.core.should_log(level, path, function, message)
    }

    fn send(&self, record: &LogRecord) -> Option<String> {
        let mut records = self.lock();
        if records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record.clone());
        None
    }

    fn execution_context(&self) -> Option<&dyn ExecutionContext> {
        self.core.execution_context()
    }

    fn is_asynchronous(&self) -> bool {
        self.core.is_asynchronous()
    }
}

impl TryFrom<MemoryDestinationConfig> for MemoryDestination {
    type Error = crate::Error;

    fn try_from(config: MemoryDestinationConfig) -> Result<Self> {
        Self::new(config)
    }
}
