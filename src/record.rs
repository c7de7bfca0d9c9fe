use crate::call_site::CallSite;
use crate::level::LogLevel;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::time::SystemTime;

/// 附加在日志事件上的上下文值
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Null,
    /// 任意 JSON 兼容的数据
    Json(Value),
}

impl MetadataValue {
    /// 从任意实现了 Serialize 的结构体创建上下文值，序列化失败时得到 `Null`
    pub fn from_struct<T: Serialize>(value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(json_value) => MetadataValue::Json(json_value),
            Err(_) => MetadataValue::Null,
        }
    }
}

impl Serialize for MetadataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MetadataValue::String(s) => serializer.serialize_str(s),
            MetadataValue::I64(n) => serializer.serialize_i64(*n),
            MetadataValue::U64(n) => serializer.serialize_u64(*n),
            MetadataValue::F64(n) => serializer.serialize_f64(*n),
            MetadataValue::Bool(b) => serializer.serialize_bool(*b),
            MetadataValue::Null => serializer.serialize_none(),
            MetadataValue::Json(v) => v.serialize(serializer),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{}", s),
            MetadataValue::I64(n) => write!(f, "{}", n),
            MetadataValue::U64(n) => write!(f, "{}", n),
            MetadataValue::F64(n) => write!(f, "{}", n),
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Null => write!(f, "null"),
            MetadataValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        MetadataValue::I64(n)
    }
}

impl From<u64> for MetadataValue {
    fn from(n: u64) -> Self {
        MetadataValue::U64(n)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        MetadataValue::F64(n)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

/// 一次日志调用
///
/// `message` 是延迟求值的消息生成器，在一次分发中最多被调用一次，
/// 没有任何 destination 需要时完全不会被调用
pub struct LogEvent<'a, F> {
    pub level: LogLevel,
    pub message: F,
    /// 只投递给 label 与之相同的 destination
    pub target: Option<&'a str>,
    pub site: CallSite<'a>,
    /// 调用线程名称
    pub thread: String,
    pub context: Option<MetadataValue>,
}

impl<'a, F, M> LogEvent<'a, F>
where
    F: FnOnce() -> M,
    M: fmt::Display,
{
    pub fn new(level: LogLevel, message: F, site: CallSite<'a>) -> Self {
        Self {
            level,
            message,
            target: None,
            site,
            thread: String::new(),
            context: None,
        }
    }

    /// 设置目标 destination 的 label
    pub fn with_target(mut self, target: &'a str) -> Self {
        self.target = Some(target);
        self
    }

    /// 设置调用线程名称
    pub fn with_thread(mut self, thread: impl Into<String>) -> Self {
        self.thread = thread.into();
        self
    }

    /// 设置上下文值
    pub fn with_context(mut self, context: impl Into<MetadataValue>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// 交给 destination 的日志记录
///
/// 每次分发最多构造一次，所有接收的 destination 共享同一份
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    /// 已求值的消息
    pub message: String,
    pub thread: String,
    pub file: String,
    /// 去掉参数列表后的函数名
    pub function: String,
    pub line: u32,
    pub context: Option<MetadataValue>,
    pub timestamp: SystemTime,
}

impl Serialize for LogRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        use std::time::UNIX_EPOCH;

        let timestamp = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry("timestamp", &timestamp)?;
        map.serialize_entry("level", &self.level)?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry("thread", &self.thread)?;
        map.serialize_entry("file", &self.file)?;
        map.serialize_entry("function", &self.function)?;
        map.serialize_entry("line", &self.line)?;
        map.serialize_entry("context", &self.context)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> CallSite<'static> {
        CallSite::new("src/main.rs", "main()", 7)
    }

    #[test]
    fn test_log_event_builder() {
        let event = LogEvent::new(LogLevel::Info, || "hello", site())
            .with_target("console")
            .with_thread("worker")
            .with_context(42i64);

        assert_eq!(event.level, LogLevel::Info);
        assert_eq!(event.target, Some("console"));
        assert_eq!(event.thread, "worker");
        assert_eq!(event.context, Some(MetadataValue::I64(42)));
        assert_eq!((event.message)(), "hello");
    }

    #[test]
    fn test_log_event_defaults() {
        let event = LogEvent::new(LogLevel::Debug, || 1, site());

        assert!(event.target.is_none());
        assert!(event.thread.is_empty());
        assert!(event.context.is_none());
    }

    #[test]
    fn test_metadata_value_display() {
        assert_eq!(MetadataValue::from("hello").to_string(), "hello");
        assert_eq!(MetadataValue::from(-3i64).to_string(), "-3");
        assert_eq!(MetadataValue::from(100u64).to_string(), "100");
        assert_eq!(MetadataValue::from(1.5).to_string(), "1.5");
        assert_eq!(MetadataValue::from(true).to_string(), "true");
        assert_eq!(MetadataValue::Null.to_string(), "null");
        assert_eq!(
            MetadataValue::Json(serde_json::json!({"id": 1})).to_string(),
            r#"{"id":1}"#
        );
    }

    #[test]
    fn test_metadata_value_from_struct() {
        #[derive(Serialize)]
        struct Request {
            endpoint: String,
            duration_ms: u64,
        }

        let value = MetadataValue::from_struct(Request {
            endpoint: "/api/users".to_string(),
            duration_ms: 12,
        });

        let json: Value = serde_json::to_value(&value).unwrap();
        assert_eq!(json["endpoint"], "/api/users");
        assert_eq!(json["duration_ms"], 12);
    }

    #[test]
    fn test_log_record_serialize() {
        let record = LogRecord {
            level: LogLevel::Warning,
            message: "disk almost full".to_string(),
            thread: "io".to_string(),
            file: "src/disk.rs".to_string(),
            function: "check()".to_string(),
            line: 88,
            context: Some(MetadataValue::from("sda1")),
            timestamp: SystemTime::now(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["level"], "WARNING");
        assert_eq!(value["message"], "disk almost full");
        assert_eq!(value["function"], "check()");
        assert_eq!(value["line"], 88);
        assert_eq!(value["context"], "sda1");
        assert!(value["timestamp"].as_u64().unwrap() > 0);
    }
}
