use thiserror::Error;

/// 构建与配置阶段的错误类型
///
/// 注册表操作和日志分发本身不会失败，只有创建 destination、解析配置时才会返回该错误
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown destination type: {0}")]
    UnknownDestinationType(String),

    #[error("invalid destination options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("configuration validation failed: {0}")]
    Validation(String),

    #[error("invalid filter pattern '{pattern}': {message}")]
    InvalidFilterPattern { pattern: String, message: String },

    #[error("failed to build execution queue: {0}")]
    QueueBuild(String),

    #[error("destination rejected by registry (duplicate identity or label {label:?})")]
    DuplicateDestination { label: Option<String> },

    #[error("destination factory registry is unavailable")]
    RegistryUnavailable,
}

impl Error {
    pub(crate) fn parse(format: &'static str, err: impl std::fmt::Display) -> Self {
        Error::Parse {
            format,
            message: err.to_string(),
        }
    }
}

impl From<garde::Report> for Error {
    fn from(report: garde::Report) -> Self {
        Error::Validation(report.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::QueueBuild(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
