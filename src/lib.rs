//! logcast - 多目的地日志分发
//!
//! 一次日志调用被分发到所有已注册的 destination，每个 destination 自己决定是否接收，
//! 并在自己的执行队列上同步或异步输出。
//!
//! ## 模块
//!
//! - **dispatcher**: 分发引擎与 [`Dispatcher`]
//! - **registry**: destination 注册表（身份与 label 双重唯一）
//! - **destination**: destination trait、过滤规则、内置的终端与内存输出
//! - **queue**: 串行队列与并发队列
//! - **config**: 配置解析（JSON5 / YAML / TOML）
//! - **global**: 进程级分发器
//!
//! ## 示例
//!
//! ```
//! use logcast::{info, Dispatcher, MemoryDestination, MemoryDestinationConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let dispatcher = Dispatcher::new();
//! let memory = Arc::new(MemoryDestination::new(MemoryDestinationConfig::default()).unwrap());
//! dispatcher.add_destination(memory.clone());
//!
//! info!(dispatcher, "hello {}", "world");
//! assert!(dispatcher.flush(Duration::from_secs(1)));
//! assert_eq!(memory.messages(), vec!["hello world"]);
//! ```

mod call_site;
pub mod config;
pub mod destination;
pub mod dispatcher;
mod error;
pub mod global;
mod level;
mod macros;
pub mod queue;
mod record;
pub mod registry;
pub mod thread_name;

pub use call_site::{strip_parameters, CallSite};
pub use config::{DispatcherConfig, ThreadNaming, TypeOptions};
pub use destination::{
    create_destination, register_destination, register_destinations, ConsoleDestination,
    ConsoleDestinationConfig, ConsoleTarget, Destination, DestinationCore, DestinationId,
    DestinationOptions, Filter, FilterOptions, MemoryDestination, MemoryDestinationConfig,
};
pub use dispatcher::{dispatch, Dispatcher};
pub use error::{Error, Result};
pub use level::LogLevel;
pub use queue::{ConcurrentQueue, ExecutionContext, QueueKind, QueueOptions, SerialQueue};
pub use record::{LogEvent, LogRecord, MetadataValue};
pub use registry::DestinationRegistry;
pub use thread_name::{default_thread_namer, EmptyThreadNamer, StdThreadNamer, ThreadNamer};
