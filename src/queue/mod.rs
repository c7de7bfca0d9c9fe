//! 执行队列
//!
//! 每个 destination 拥有自己的执行上下文：串行队列（单工作线程、FIFO）
//! 或并发队列（Rayon 线程池）。分发器按 destination 的发送模式同步或异步提交任务。

mod concurrent_queue;
mod core;
mod options;
mod serial_queue;

pub use concurrent_queue::ConcurrentQueue;
pub use core::{ExecutionContext, Job};
pub use options::{QueueKind, QueueOptions};
pub use serial_queue::SerialQueue;
