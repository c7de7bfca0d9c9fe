//! 日志分发
//!
//! [`dispatch`] 是分发的核心：对快照中的每个 destination 依次检查目标名称、
//! 执行上下文和准入判定，消息在整个分发过程中最多求值一次，
//! 然后按 destination 的发送模式同步或异步提交到它自己的执行队列。

use crate::call_site::{strip_parameters, CallSite};
use crate::config::{DispatcherConfig, ThreadNaming};
use crate::destination::{create_destination, register_destinations, Destination};
use crate::error::{Error, Result};
use crate::level::LogLevel;
use crate::record::{LogEvent, LogRecord, MetadataValue};
use crate::registry::DestinationRegistry;
use crate::thread_name::{default_thread_namer, EmptyThreadNamer, ThreadNamer};
use crossbeam::channel;
use std::fmt::Display;
use std::sync::{Arc, Once};
use std::time::{Duration, Instant, SystemTime};

/// 注册内置 destination 类型（只执行一次）
static REGISTER_ONCE: Once = Once::new();

/// 将一次日志事件分发给快照中的 destination
///
/// 返回接收该事件的 destination 数量
pub fn dispatch<F, M>(event: LogEvent<'_, F>, destinations: &[Arc<dyn Destination>]) -> usize
where
    F: FnOnce() -> M,
    M: Display,
{
    let LogEvent {
        level,
        message,
        target,
        site,
        thread,
        mut context,
    } = event;

    let mut producer = Some(message);
    let mut resolved: Option<String> = None;
    let mut record: Option<Arc<LogRecord>> = None;
    let mut delivered = 0;

    for destination in destinations {
        if !destination.is_match(target) {
            continue;
        }

        let Some(queue) = destination.execution_context() else {
            continue;
        };

        if resolved.is_none() && destination.has_message_filters() {
            resolved = Some(resolve(&mut producer));
        }

        if !destination.should_log(level, site.file, site.function, resolved.as_deref()) {
            continue;
        }

        let record = Arc::clone(record.get_or_insert_with(|| {
            let message = resolved
                .get_or_insert_with(|| resolve(&mut producer))
                .clone();
            Arc::new(LogRecord {
                level,
                message,
                thread: thread.clone(),
                file: site.file.to_string(),
                function: strip_parameters(site.function),
                line: site.line,
                context: context.take(),
                timestamp: SystemTime::now(),
            })
        }));

        let sink = Arc::clone(destination);
        let job = Box::new(move || {
            let _ = sink.send(&record);
        });
        if destination.is_asynchronous() {
            queue.execute_async(job);
        } else {
            queue.execute_sync(job);
        }
        delivered += 1;
    }

    delivered
}

fn resolve<F, M>(producer: &mut Option<F>) -> String
where
    F: FnOnce() -> M,
    M: Display,
{
    producer
        .take()
        .map(|produce| produce().to_string())
        .unwrap_or_default()
}

/// 日志分发器
///
/// 持有 destination 注册表和线程名称解析策略，日志调用通过它分发到所有匹配的 destination
///
/// # 示例
///
/// ```no_run
/// use logcast::{call_site, ConsoleDestination, ConsoleDestinationConfig, Dispatcher, LogLevel};
/// use std::sync::Arc;
///
/// let dispatcher = Dispatcher::new();
/// let console = ConsoleDestination::new(ConsoleDestinationConfig::default()).unwrap();
/// dispatcher.add_destination(Arc::new(console));
///
/// dispatcher.info(|| "application started", call_site!());
/// dispatcher.custom(LogLevel::Error, Some("console"), || "disk full", call_site!(), None);
/// ```
pub struct Dispatcher {
    registry: DestinationRegistry,
    thread_namer: Arc<dyn ThreadNamer>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// 使用当前平台默认的线程名称解析策略创建
    pub fn new() -> Self {
        Self::with_thread_namer(default_thread_namer())
    }

    pub fn with_thread_namer(thread_namer: Arc<dyn ThreadNamer>) -> Self {
        Self {
            registry: DestinationRegistry::new(),
            thread_namer,
        }
    }

    /// 从配置创建分发器
    ///
    /// 内置 destination 类型会自动注册；label 冲突时返回 `Error::DuplicateDestination`
    pub fn from_config(config: DispatcherConfig) -> Result<Self> {
        let thread_namer: Arc<dyn ThreadNamer> = match config.thread_names {
            ThreadNaming::Auto => default_thread_namer(),
            ThreadNaming::None => Arc::new(EmptyThreadNamer),
        };

        let dispatcher = Self::with_thread_namer(thread_namer);
        dispatcher.add_destinations_from_config(&config)?;
        Ok(dispatcher)
    }

    /// 按配置创建 destination 并注册到当前分发器
    ///
    /// 全部创建成功后才开始注册；注册失败时已注册的部分会被移除，注册表保持调用前的状态
    pub fn add_destinations_from_config(&self, config: &DispatcherConfig) -> Result<()> {
        REGISTER_ONCE.call_once(|| {
            if let Err(e) = register_destinations() {
                tracing::error!(error = %e, "failed to register built-in destinations");
            }
        });

        let destinations = config
            .destinations
            .iter()
            .map(create_destination)
            .collect::<Result<Vec<_>>>()?;

        // 任一注册失败时撤销本次已注册的 destination
        let mut added: Vec<Arc<dyn Destination>> = Vec::with_capacity(destinations.len());
        for destination in destinations {
            if !self.add_destination(Arc::clone(&destination)) {
                for registered in &added {
                    self.remove_destination(registered);
                }
                return Err(Error::DuplicateDestination {
                    label: destination.label().map(str::to_string),
                });
            }
            added.push(destination);
        }
        Ok(())
    }

    pub fn registry(&self) -> &DestinationRegistry {
        &self.registry
    }

    pub fn add_destination(&self, destination: Arc<dyn Destination>) -> bool {
        self.registry.add(destination)
    }

    pub fn remove_destination(&self, destination: &Arc<dyn Destination>) -> bool {
        self.registry.remove(destination)
    }

    pub fn remove_all_destinations(&self) {
        self.registry.remove_all()
    }

    pub fn count_destinations(&self) -> usize {
        self.registry.count()
    }

    /// 当前调用线程的名称
    pub fn thread_name(&self) -> String {
        self.thread_namer.current_thread_name()
    }

    /// 在注册表的一致快照上分发事件
    pub fn dispatch<F, M>(&self, event: LogEvent<'_, F>) -> usize
    where
        F: FnOnce() -> M,
        M: Display,
    {
        let snapshot = self.registry.snapshot();
        dispatch(event, &snapshot)
    }

    /// 构造事件并分发，`target` 为目标 destination 的 label
    pub fn custom<F, M>(
        &self,
        level: LogLevel,
        target: Option<&str>,
        message: F,
        site: CallSite<'_>,
        context: Option<MetadataValue>,
    ) -> usize
    where
        F: FnOnce() -> M,
        M: Display,
    {
        let event = LogEvent {
            level,
            message,
            target,
            site,
            thread: self.thread_name(),
            context,
        };
        self.dispatch(event)
    }

    /// 记录 VERBOSE 级别日志
    pub fn verbose<F, M>(&self, message: F, site: CallSite<'_>) -> usize
    where
        F: FnOnce() -> M,
        M: Display,
    {
        self.custom(LogLevel::Verbose, None, message, site, None)
    }

    /// 记录 DEBUG 级别日志
    pub fn debug<F, M>(&self, message: F, site: CallSite<'_>) -> usize
    where
        F: FnOnce() -> M,
        M: Display,
    {
        self.custom(LogLevel::Debug, None, message, site, None)
    }

    /// 记录 INFO 级别日志
    pub fn info<F, M>(&self, message: F, site: CallSite<'_>) -> usize
    where
        F: FnOnce() -> M,
        M: Display,
    {
        self.custom(LogLevel::Info, None, message, site, None)
    }

    /// 记录 WARNING 级别日志
    pub fn warning<F, M>(&self, message: F, site: CallSite<'_>) -> usize
    where
        F: FnOnce() -> M,
        M: Display,
    {
        self.custom(LogLevel::Warning, None, message, site, None)
    }

    /// 记录 ERROR 级别日志
    pub fn error<F, M>(&self, message: F, site: CallSite<'_>) -> usize
    where
        F: FnOnce() -> M,
        M: Display,
    {
        self.custom(LogLevel::Error, None, message, site, None)
    }

    /// 等待所有 destination 处理完已提交的日志
    ///
    /// 在每个有执行上下文的 destination 上提交一个屏障任务，屏障任务调用
    /// `Destination::flush` 后发出信号。全部信号在 `timeout` 内到达时返回 `true`，
    /// 超时返回 `false`。超时不会取消任何已提交的任务，`Duration::MAX` 表示一直等待
    pub fn flush(&self, timeout: Duration) -> bool {
        // 超出 Instant 表示范围的超时视为无限等待
        let deadline = Instant::now().checked_add(timeout);
        let (done_tx, done_rx) = channel::unbounded::<()>();

        let mut pending = 0;
        for destination in self.registry.snapshot() {
            let Some(queue) = destination.execution_context() else {
                continue;
            };

            let sink = Arc::clone(&destination);
            let done_tx = done_tx.clone();
            queue.execute_barrier(Box::new(move || {
                sink.flush();
                let _ = done_tx.send(());
            }));
            pending += 1;
        }
        drop(done_tx);

        for _ in 0..pending {
            let received = match deadline {
                Some(deadline) => done_rx.recv_deadline(deadline).is_ok(),
                None => done_rx.recv().is_ok(),
            };
            if !received {
                tracing::warn!(?timeout, "flush timed out before all destinations finished");
                return false;
            }
        }
        true
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
