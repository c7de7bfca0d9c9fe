/// 提交到执行队列的任务
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// destination 自有的执行上下文
///
/// 串行队列保证同一队列上的任务按提交顺序（FIFO）执行，并发队列不保证顺序
pub trait ExecutionContext: Send + Sync {
    /// 提交任务后立即返回，不等待执行
    fn execute_async(&self, job: Job);

    /// 提交任务并阻塞，直到该任务执行完毕
    fn execute_sync(&self, job: Job);

    /// 在此前已提交的所有任务完成之后执行
    fn execute_barrier(&self, job: Job);

    /// 队列名称
    fn name(&self) -> &str;
}

/// 执行任务，捕获 panic 避免工作线程退出
pub(crate) fn run_guarded(queue: &str, job: Job) {
    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)).is_err() {
        tracing::error!(queue, "job panicked on execution queue");
    }
}
