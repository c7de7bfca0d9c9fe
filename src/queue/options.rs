use crate::error::Result;
use crate::queue::{ConcurrentQueue, ExecutionContext, SerialQueue};
use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::sync::Arc;

/// 执行队列类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    /// 单线程，按提交顺序执行
    #[default]
    Serial,
    /// 线程池，并行执行
    Concurrent,
    /// 不创建队列，destination 处于静默状态
    None,
}

/// 执行队列配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SmartDefault, Validate)]
#[serde(default)]
pub struct QueueOptions {
    #[garde(skip)]
    pub kind: QueueKind,

    /// 并发队列的线程数
    #[default(num_cpus::get())]
    #[garde(range(min = 1, max = 256))]
    pub threads: usize,
}

impl QueueOptions {
    /// 按配置创建执行队列，`QueueKind::None` 返回 `None`
    pub fn build(&self, name: &str) -> Result<Option<Arc<dyn ExecutionContext>>> {
        self.validate()?;

        let queue: Arc<dyn ExecutionContext> = match self.kind {
            QueueKind::Serial => Arc::new(SerialQueue::new(name)?),
            QueueKind::Concurrent => Arc::new(ConcurrentQueue::new(name, self.threads)?),
            QueueKind::None => return Ok(None),
        };
        Ok(Some(queue))
    }
}
