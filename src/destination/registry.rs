use crate::config::TypeOptions;
use crate::destination::{
    ConsoleDestination, ConsoleDestinationConfig, Destination, MemoryDestination,
    MemoryDestinationConfig,
};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

// 构造函数类型
type Constructor = Box<dyn Fn(JsonValue) -> Result<Arc<dyn Destination>> + Send + Sync>;

// 类型名称 -> 构造函数
static FACTORIES: Lazy<RwLock<HashMap<String, Constructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 以指定名称注册一种 destination
///
/// 配置先反序列化为 `Config`，再通过 `TryFrom<Config>` 创建实例。
/// 重复注册同一名称会覆盖之前的构造函数
pub fn register_destination<T, Config>(type_name: &str) -> Result<()>
where
    T: Destination + TryFrom<Config, Error = Error> + 'static,
    Config: DeserializeOwned + 'static,
{
    let constructor: Constructor = Box::new(|value| {
        let config: Config = serde_json::from_value(value)?;
        let destination: Arc<dyn Destination> = Arc::new(T::try_from(config)?);
        Ok(destination)
    });

    let mut factories = FACTORIES.write().map_err(|_| Error::RegistryUnavailable)?;
    factories.insert(type_name.to_string(), constructor);
    Ok(())
}

/// 根据 TypeOptions 创建 destination
pub fn create_destination(options: &TypeOptions) -> Result<Arc<dyn Destination>> {
    let factories = FACTORIES.read().map_err(|_| Error::RegistryUnavailable)?;
    let constructor = factories
        .get(&options.type_name)
        .ok_or_else(|| Error::UnknownDestinationType(options.type_name.clone()))?;
    // 省略 options 时按空对象处理，使用各字段默认值
    let value = match &options.options {
        JsonValue::Null => JsonValue::Object(Default::default()),
        value => value.clone(),
    };
    constructor(value)
}

/// 检查类型名称是否已注册
pub fn is_destination_registered(type_name: &str) -> bool {
    FACTORIES
        .read()
        .map(|factories| factories.contains_key(type_name))
        .unwrap_or(false)
}

/// 注册所有内置 destination
pub fn register_destinations() -> Result<()> {
    register_destination::<ConsoleDestination, ConsoleDestinationConfig>("ConsoleDestination")?;
    register_destination::<MemoryDestination, MemoryDestinationConfig>("MemoryDestination")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogLevel;

    #[test]
    fn test_register_destinations() -> Result<()> {
        register_destinations()?;

        assert!(is_destination_registered("ConsoleDestination"));
        assert!(is_destination_registered("MemoryDestination"));
        assert!(!is_destination_registered("SyslogDestination"));
        Ok(())
    }

    #[test]
    fn test_create_console_destination() -> Result<()> {
        register_destinations()?;

        let opts = TypeOptions::from_json(
            r#"{
                type: "ConsoleDestination",
                options: {
                    target: "stdout",
                    label: "console",
                    min_level: "info",
                }
            }"#,
        )?;

        let destination = create_destination(&opts)?;
        assert_eq!(destination.label(), Some("console"));
        assert_eq!(destination.min_level(), LogLevel::Info);
        Ok(())
    }

    #[test]
    fn test_create_memory_destination_with_defaults() -> Result<()> {
        register_destinations()?;

        let opts = TypeOptions::from_json(r#"{ type: "MemoryDestination", options: {} }"#)?;
        let destination = create_destination(&opts)?;

        assert!(destination.label().is_none());
        assert_eq!(destination.min_level(), LogLevel::Verbose);
        assert!(destination.is_asynchronous());
        Ok(())
    }

    #[test]
    fn test_create_unknown_destination() {
        register_destinations().unwrap();

        let opts = TypeOptions::from_json(r#"{ type: "Carrier", options: {} }"#).unwrap();
        assert!(matches!(
            create_destination(&opts),
            Err(Error::UnknownDestinationType(name)) if name == "Carrier"
        ));
    }

    #[test]
    fn test_create_destination_with_invalid_options() {
        register_destinations().unwrap();

        let opts = TypeOptions::from_json(
            r#"{ type: "MemoryDestination", options: { min_level: "loud" } }"#,
        )
        .unwrap();
        assert!(matches!(
            create_destination(&opts),
            Err(Error::InvalidOptions(_))
        ));
    }
}
