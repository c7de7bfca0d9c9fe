use crate::error::Result;
use crate::queue::core::{run_guarded, ExecutionContext, Job};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;

/// 正在执行或等待执行的任务计数
#[derive(Default)]
struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

impl InFlight {
    fn enter(&self) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn leave(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        while *count > 0 {
            count = self
                .idle
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// 并发执行队列
///
/// 基于 Rayon 线程池，异步任务可以并行执行，不保证顺序
pub struct ConcurrentQueue {
    name: String,
    pool: rayon::ThreadPool,
    in_flight: Arc<InFlight>,
}

impl ConcurrentQueue {
    /// 创建并发队列，`threads` 为线程池大小
    pub fn new(name: impl Into<String>, threads: usize) -> Result<Self> {
        let name = name.into();
        let thread_prefix = name.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(move |index| format!("{}-{}", thread_prefix, index))
            .build()?;

        Ok(Self {
            name,
            pool,
            in_flight: Arc::new(InFlight::default()),
        })
    }

    /// 线程池大小
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl ExecutionContext for ConcurrentQueue {
    fn execute_async(&self, job: Job) {
        self.in_flight.enter();
        let in_flight = Arc::clone(&self.in_flight);
        let name = self.name.clone();
        self.pool.spawn(move || {
            run_guarded(&name, job);
            in_flight.leave();
        });
    }

    fn execute_sync(&self, job: Job) {
        self.in_flight.enter();
        self.pool.install(|| run_guarded(&self.name, job));
        self.in_flight.leave();
    }

    fn execute_barrier(&self, job: Job) {
        // 等待在独立线程上进行，避免占住线程池中的工作线程
        let in_flight = Arc::clone(&self.in_flight);
        let name = self.name.clone();
        let spawned = thread::Builder::new()
            .name(format!("{}-barrier", self.name))
            .spawn(move || {
                in_flight.wait_idle();
                run_guarded(&name, job);
            });

        if let Err(e) = spawned {
            tracing::warn!(queue = %self.name, error = %e, "failed to start barrier thread");
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for ConcurrentQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentQueue")
            .field("name", &self.name)
            .field("threads", &self.threads())
            .finish()
    }
}
