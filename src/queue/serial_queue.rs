use crate::error::{Error, Result};
use crate::queue::core::{run_guarded, ExecutionContext, Job};
use crossbeam::channel::{self, Sender};
use std::thread::{self, ThreadId};

/// 串行执行队列
///
/// 单个工作线程从无界 crossbeam 通道中依次取出任务执行，任务按提交顺序完成。
/// 队列被丢弃后通道关闭，工作线程执行完剩余任务后退出。
pub struct SerialQueue {
    name: String,
    sender: Sender<Job>,
    worker: ThreadId,
}

impl SerialQueue {
    /// 创建串行队列，工作线程以队列名称命名
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (sender, receiver) = channel::unbounded::<Job>();

        let queue_name = name.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                for job in receiver.iter() {
                    run_guarded(&queue_name, job);
                }
            })
            .map_err(|e| Error::QueueBuild(e.to_string()))?;

        Ok(Self {
            name,
            sender,
            worker: handle.thread().id(),
        })
    }

    fn on_worker(&self) -> bool {
        thread::current().id() == self.worker
    }
}

impl ExecutionContext for SerialQueue {
    fn execute_async(&self, job: Job) {
        if self.sender.send(job).is_err() {
            tracing::warn!(queue = %self.name, "serial queue worker is gone, job dropped");
        }
    }

    fn execute_sync(&self, job: Job) {
        // 在工作线程上同步提交会等待自己，直接执行
        if self.on_worker() {
            run_guarded(&self.name, job);
            return;
        }

        let (done_tx, done_rx) = channel::bounded::<()>(1);
        let wrapped: Job = Box::new(move || {
            job();
            let _ = done_tx.send(());
        });

        if self.sender.send(wrapped).is_err() {
            tracing::warn!(queue = %self.name, "serial queue worker is gone, job dropped");
            return;
        }
        // 任务 panic 时 done_tx 被丢弃，recv 返回错误而不是永久阻塞
        let _ = done_rx.recv();
    }

    fn execute_barrier(&self, job: Job) {
        self.execute_async(job);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialQueue")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_serial_queue_preserves_order() {
        let queue = SerialQueue::new("test-order").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..100 {
            let seen = Arc::clone(&seen);
            queue.execute_async(Box::new(move || seen.lock().unwrap().push(i)));
        }

        let (tx, rx) = channel::bounded(1);
        queue.execute_barrier(Box::new(move || tx.send(()).unwrap()));
        rx.recv_timeout(Duration::from_secs(5)).unwrap();

        assert_eq!(*seen.lock().unwrap(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_serial_queue_sync_blocks_until_done() {
        let queue = SerialQueue::new("test-sync").unwrap();
        let done = Arc::new(Mutex::new(false));

        let flag = Arc::clone(&done);
        queue.execute_sync(Box::new(move || {
            thread::sleep(Duration::from_millis(20));
            *flag.lock().unwrap() = true;
        }));

        assert!(*done.lock().unwrap());
    }

    #[test]
    fn test_serial_queue_runs_on_named_worker() {
        let queue = SerialQueue::new("named-worker").unwrap();
        let name = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&name);
        queue.execute_sync(Box::new(move || {
            *slot.lock().unwrap() = thread::current().name().map(str::to_string);
        }));

        assert_eq!(name.lock().unwrap().as_deref(), Some("named-worker"));
        assert_eq!(queue.name(), "named-worker");
    }

    #[test]
    fn test_serial_queue_sync_from_worker_does_not_deadlock() {
        let queue = Arc::new(SerialQueue::new("test-reentrant").unwrap());
        let counter = Arc::new(Mutex::new(0));

        let inner_queue = Arc::clone(&queue);
        let inner_counter = Arc::clone(&counter);
        queue.execute_sync(Box::new(move || {
            let c = Arc::clone(&inner_counter);
            inner_queue.execute_sync(Box::new(move || *c.lock().unwrap() += 1));
            *inner_counter.lock().unwrap() += 1;
        }));

        assert_eq!(*counter.lock().unwrap(), 2);
    }

    #[test]
    fn test_serial_queue_survives_panicking_job() {
        let queue = SerialQueue::new("test-panic").unwrap();
        queue.execute_sync(Box::new(|| panic!("boom")));

        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        queue.execute_sync(Box::new(move || *flag.lock().unwrap() = true));

        assert!(*ran.lock().unwrap());
    }
}
