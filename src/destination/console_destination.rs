use crate::destination::{Destination, DestinationCore, DestinationOptions};
use crate::error::Result;
use crate::level::LogLevel;
use crate::queue::ExecutionContext;
use crate::record::LogRecord;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::io::{self, Write};

/// 输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// ConsoleDestination 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ConsoleDestinationConfig {
    pub target: ConsoleTarget,

    #[serde(flatten)]
    pub destination: DestinationOptions,
}

/// 终端输出
///
/// 每条记录输出一行纯文本：
/// `<时间> <级别> [<线程>] <文件>:<行号> <函数> - <消息>`，线程名为空时省略线程部分
pub struct ConsoleDestination {
    target: ConsoleTarget,
    core: DestinationCore,
}

impl ConsoleDestination {
    pub fn new(config: ConsoleDestinationConfig) -> Result<Self> {
        Ok(Self {
            target: config.target,
            core: DestinationCore::new("console", config.destination)?,
        })
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    /// 将记录格式化为一行文本
    pub fn format_line(record: &LogRecord) -> String {
        let timestamp: DateTime<Local> = record.timestamp.into();
        let mut line = String::with_capacity(64 + record.message.len() + record.file.len());

        line.push_str(&timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string());
        line.push(' ');
        line.push_str(&record.level.to_string());
        line.push(' ');
        if !record.thread.is_empty() {
            line.push('[');
            line.push_str(&record.thread);
            line.push_str("] ");
        }
        line.push_str(&record.file);
        line.push(':');
        line.push_str(&record.line.to_string());
        line.push(' ');
        line.push_str(&record.function);
        line.push_str(" - ");
        line.push_str(&record.message);
        line
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        match self.target {
            ConsoleTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", line)?;
                stdout.flush()
            }
            ConsoleTarget::Stderr => {
                let mut stderr = io::stderr().lock();
                writeln!(stderr, "{}", line)?;
                stderr.flush()
            }
        }
    }
}

impl Destination for ConsoleDestination {
    fn label(&self) -> Option<&str> {
        self.core.label()
    }

    fn min_level(&self) -> LogLevel {
        self.core.min_level()
    }

    fn has_message_filters(&self) -> bool {
        self.core.has_message_filters()
    }

    fn should_log(&self, level: LogLevel, path: &str, function: &str, message: Option<&str>) -> bool {
        self.core.should_log(level, path, function, message)
    }

    fn send(&self, record: &LogRecord) -> Option<String> {
        let line = Self::format_line(record);
        if let Err(e) = self.write_line(&line) {
            tracing::warn!(error = %e, "failed to write log line to console");
            return None;
        }
        Some(line)
    }

    fn execution_context(&self) -> Option<&dyn ExecutionContext> {
        self.core.execution_context()
    }

    fn is_asynchronous(&self) -> bool {
        self.core.is_asynchronous()
    }

    fn flush(&self) {
        let result = match self.target {
            ConsoleTarget::Stdout => io::stdout().flush(),
            ConsoleTarget::Stderr => io::stderr().flush(),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to flush console");
        }
    }
}

impl TryFrom<ConsoleDestinationConfig> for ConsoleDestination {
    type Error = crate::Error;

    fn try_from(config: ConsoleDestinationConfig) -> Result<Self> {
        Self::new(config)
    }
}
