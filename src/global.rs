//! 进程级分发器
//!
//! 第一次使用时按默认配置创建；需要定制线程名称策略时应在第一次记录日志之前调用 [`init`]

use crate::config::DispatcherConfig;
use crate::destination::Destination;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;

static GLOBAL_DISPATCHER: OnceCell<Dispatcher> = OnceCell::new();

/// 获取全局分发器
pub fn dispatcher() -> &'static Dispatcher {
    GLOBAL_DISPATCHER.get_or_init(Dispatcher::new)
}

/// 初始化全局分发器
///
/// 全局分发器尚未创建时按配置创建；已经创建时只把配置中的 destination 追加进去，
/// `thread_names` 不再生效。失败时全局注册表保持调用前的状态
///
/// # 示例
///
/// ```
/// use logcast::{global, DispatcherConfig};
///
/// let config = DispatcherConfig::from_json(r#"{
///     destinations: [{ type: "MemoryDestination", options: { label: "init-doc" } }]
/// }"#).unwrap();
///
/// global::init(config).unwrap();
/// assert!(global::dispatcher().registry().get("init-doc").is_some());
/// ```
pub fn init(config: DispatcherConfig) -> Result<()> {
    if let Some(existing) = GLOBAL_DISPATCHER.get() {
        tracing::debug!("global dispatcher already created, appending destinations");
        return existing.add_destinations_from_config(&config);
    }

    let created = Dispatcher::from_config(config.clone())?;
    if let Err(created) = GLOBAL_DISPATCHER.set(created) {
        // 并发初始化时另一方先完成，丢弃本次创建的实例
        drop(created);
        return dispatcher().add_destinations_from_config(&config);
    }
    Ok(())
}

pub fn add_destination(destination: Arc<dyn Destination>) -> bool {
    dispatcher().add_destination(destination)
}

pub fn remove_destination(destination: &Arc<dyn Destination>) -> bool {
    dispatcher().remove_destination(destination)
}

pub fn remove_all_destinations() {
    dispatcher().remove_all_destinations()
}

pub fn count_destinations() -> usize {
    dispatcher().count_destinations()
}

/// 等待全局分发器的所有 destination 处理完已提交的日志
pub fn flush(timeout: Duration) -> bool {
    dispatcher().flush(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{MemoryDestination, MemoryDestinationConfig};
    use crate::level::LogLevel;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_global_registry_operations() {
        remove_all_destinations();

        let memory = Arc::new(MemoryDestination::new(MemoryDestinationConfig::default()).unwrap());
        let as_dest: Arc<dyn Destination> = memory.clone();

        assert!(add_destination(Arc::clone(&as_dest)));
        assert!(!add_destination(Arc::clone(&as_dest)));
        assert_eq!(count_destinations(), 1);

        dispatcher().custom(LogLevel::Info, None, || "global", crate::call_site!(), None);
        assert!(flush(Duration::from_secs(5)));
        assert_eq!(memory.messages(), vec!["global"]);

        assert!(remove_destination(&as_dest));
        assert_eq!(count_destinations(), 0);
    }

    #[test]
    #[serial]
    fn test_global_init_appends_destinations() {
        remove_all_destinations();

        let config = DispatcherConfig::from_json(
            r#"{ destinations: [{ type: "MemoryDestination", options: { label: "global-memory" } }] }"#,
        )
        .unwrap();

        init(config.clone()).unwrap();
        assert!(dispatcher().registry().get("global-memory").is_some());

        // 重复的 label 被拒绝
        assert!(init(config).is_err());
        assert_eq!(count_destinations(), 1);

        remove_all_destinations();
    }

    #[test]
    #[serial]
    fn test_global_init_failure_rolls_back() {
        remove_all_destinations();

        let taken: Arc<dyn Destination> = Arc::new(
            MemoryDestination::new(json5::from_str(r#"{ label: "taken" }"#).unwrap()).unwrap(),
        );
        assert!(add_destination(taken));

        let config = DispatcherConfig::from_json(
            r#"{
                destinations: [
                    { type: "MemoryDestination", options: { label: "fresh" } },
                    { type: "MemoryDestination", options: { label: "taken" } },
                ]
            }"#,
        )
        .unwrap();

        assert!(init(config).is_err());
        assert_eq!(count_destinations(), 1);
        assert!(dispatcher().registry().get("fresh").is_none());
        assert!(dispatcher().registry().get("taken").is_some());

        remove_all_destinations();
    }
}
