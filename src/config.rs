// 配置的序列化与解析

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use smart_default::SmartDefault;

/// 类型选项
///
/// `type` 是已注册的 destination 类型名称，`options` 是该类型自己的配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeOptions {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub options: JsonValue,
}

impl TypeOptions {
    pub fn new(type_name: impl Into<String>, options: JsonValue) -> Self {
        Self {
            type_name: type_name.into(),
            options,
        }
    }

    /// 从 JSON 字符串创建（支持 JSON5 格式）
    pub fn from_json(json_str: &str) -> Result<Self> {
        json5::from_str(json_str).map_err(|e| Error::parse("json5", e))
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| Error::parse("yaml", e))
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::parse("toml", e))
    }

    /// 导出为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 线程名称解析策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThreadNaming {
    /// 按平台选择：支持线程的平台使用线程名称，否则为空
    #[default]
    Auto,
    /// 始终为空
    None,
}

/// 分发器配置
///
/// # 示例
///
/// ```
/// use logcast::DispatcherConfig;
///
/// let config = DispatcherConfig::from_yaml(r#"
/// thread_names: auto
/// destinations:
///   - type: ConsoleDestination
///     options:
///       label: console
///       min_level: info
/// "#).unwrap();
///
/// assert_eq!(config.destinations.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct DispatcherConfig {
    pub thread_names: ThreadNaming,

    /// 启动时注册的 destination
    #[default(Vec::new())]
    pub destinations: Vec<TypeOptions>,
}

impl DispatcherConfig {
    pub fn from_json(json_str: &str) -> Result<Self> {
        json5::from_str(json_str).map_err(|e| Error::parse("json5", e))
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| Error::parse("yaml", e))
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::parse("toml", e))
    }
}
