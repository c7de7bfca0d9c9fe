use crate::destination::{Destination, DestinationId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct RegistryState {
    destinations: HashMap<DestinationId, Arc<dyn Destination>>,
    labels: HashMap<String, DestinationId>,
}

/// 已注册 destination 的集合
///
/// 同一个 destination（按身份）只能注册一次，非空 label 在集合内唯一。
/// 所有修改与快照都在同一把读写锁下完成，任何操作都不会 panic，失败通过 `false` 返回。
/// 集合不维护顺序
#[derive(Default)]
pub struct DestinationRegistry {
    state: RwLock<RegistryState>,
}

fn label_of(destination: &dyn Destination) -> Option<&str> {
    destination.label().filter(|label| !label.is_empty())
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// 注册 destination
    ///
    /// 已注册过同一个实例，或已有 destination 使用相同的非空 label 时返回 `false`，集合不变
    pub fn add(&self, destination: Arc<dyn Destination>) -> bool {
        let id = DestinationId::of(&destination);
        let mut state = self.write();

        if state.destinations.contains_key(&id) {
            tracing::debug!(?id, "destination already registered");
            return false;
        }

        if let Some(label) = label_of(destination.as_ref()) {
            if state.labels.contains_key(label) {
                tracing::debug!(label, "destination label already registered");
                return false;
            }
            state.labels.insert(label.to_string(), id);
        }

        state.destinations.insert(id, destination);
        true
    }

    /// 移除 destination，未注册时返回 `false`
    pub fn remove(&self, destination: &Arc<dyn Destination>) -> bool {
        let id = DestinationId::of(destination);
        let mut state = self.write();

        let Some(removed) = state.destinations.remove(&id) else {
            return false;
        };
        if let Some(label) = label_of(removed.as_ref()) {
            state.labels.remove(label);
        }
        true
    }

    /// 清空所有 destination
    pub fn remove_all(&self) {
        let mut state = self.write();
        state.destinations.clear();
        state.labels.clear();
    }

    /// 已注册的 destination 数量
    pub fn count(&self) -> usize {
        self.read().destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn contains(&self, destination: &Arc<dyn Destination>) -> bool {
        self.read()
            .destinations
            .contains_key(&DestinationId::of(destination))
    }

    /// 根据 label 查找 destination
    pub fn get(&self, label: &str) -> Option<Arc<dyn Destination>> {
        let state = self.read();
        state
            .labels
            .get(label)
            .and_then(|id| state.destinations.get(id))
            .cloned()
    }

    /// 所有已注册的 label
    pub fn labels(&self) -> Vec<String> {
        self.read().labels.keys().cloned().collect()
    }

    /// 当前成员的一致快照，用于一次完整的分发
    pub fn snapshot(&self) -> Vec<Arc<dyn Destination>> {
        self.read().destinations.values().cloned().collect()
    }
}

impl std::fmt::Debug for DestinationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("DestinationRegistry")
            .field("count", &state.destinations.len())
            .field("labels", &state.labels.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogLevel;
    use crate::queue::ExecutionContext;
    use crate::record::LogRecord;

    struct Named(Option<&'static str>);

    impl Destination for Named {
        fn label(&self) -> Option<&str> {
            self.0
        }

        fn min_level(&self) -> LogLevel {
            LogLevel::Verbose
        }

        fn send(&self, _record: &LogRecord) -> Option<String> {
            None
        }

        fn execution_context(&self) -> Option<&dyn ExecutionContext> {
            None
        }

        fn is_asynchronous(&self) -> bool {
            false
        }
    }

    fn named(label: Option<&'static str>) -> Arc<dyn Destination> {
        Arc::new(Named(label))
    }

    #[test]
    fn test_add_same_destination_twice() {
        let registry = DestinationRegistry::new();
        let dest = named(Some("console"));

        assert!(registry.add(Arc::clone(&dest)));
        assert!(!registry.add(Arc::clone(&dest)));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_add_duplicate_label() {
        let registry = DestinationRegistry::new();

        assert!(registry.add(named(Some("file"))));
        assert!(!registry.add(named(Some("file"))));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_add_unlabelled_and_empty_labels() {
        let registry = DestinationRegistry::new();

        assert!(registry.add(named(None)));
        assert!(registry.add(named(None)));
        assert!(registry.add(named(Some(""))));
        assert!(registry.add(named(Some(""))));
        assert_eq!(registry.count(), 4);
        assert!(registry.labels().is_empty());
    }

    #[test]
    fn test_remove() {
        let registry = DestinationRegistry::new();
        let dest = named(Some("console"));
        let other = named(Some("file"));

        registry.add(Arc::clone(&dest));
        assert!(!registry.remove(&other));
        assert_eq!(registry.count(), 1);

        assert!(registry.remove(&dest));
        assert_eq!(registry.count(), 0);
        assert!(!registry.remove(&dest));
    }

    #[test]
    fn test_remove_releases_label() {
        let registry = DestinationRegistry::new();
        let first = named(Some("console"));

        registry.add(Arc::clone(&first));
        registry.remove(&first);

        assert!(registry.add(named(Some("console"))));
        assert!(registry.get("console").is_some());
    }

    #[test]
    fn test_remove_all() {
        let registry = DestinationRegistry::new();
        registry.add(named(Some("a")));
        registry.add(named(Some("b")));
        registry.add(named(None));

        registry.remove_all();
        assert_eq!(registry.count(), 0);
        assert!(registry.is_empty());
        assert!(registry.get("a").is_none());
        assert!(registry.add(named(Some("a"))));
    }

    #[test]
    fn test_get_contains_and_snapshot() {
        let registry = DestinationRegistry::new();
        let console = named(Some("console"));
        registry.add(Arc::clone(&console));
        registry.add(named(None));

        assert!(registry.contains(&console));
        assert!(!registry.contains(&named(Some("console"))));

        let found = registry.get("console").unwrap();
        assert_eq!(DestinationId::of(&found), DestinationId::of(&console));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);

        // 快照不受之后修改的影响
        registry.remove_all();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_concurrent_add_and_remove() {
        let registry = Arc::new(DestinationRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let dest = named(None);
                        assert!(registry.add(Arc::clone(&dest)));
                        let _ = registry.snapshot();
                        assert!(registry.remove(&dest));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_concurrent_label_race_admits_one() {
        let registry = Arc::new(DestinationRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.add(named(Some("shared"))))
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|added| *added)
            .count();
        assert_eq!(admitted, 1);
        assert_eq!(registry.count(), 1);
    }
}
