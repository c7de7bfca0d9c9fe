//! 日志过滤器
//!
//! 过滤器作用于文件路径、函数名或消息文本，由 destination 自己解释，
//! 分发器只关心 [`Destination::has_message_filters`](super::Destination::has_message_filters)
//! 与 `should_log` 的结果。

use crate::error::{Error, Result};
use crate::level::LogLevel;
use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// 过滤器作用的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterTarget {
    Path,
    Function,
    #[default]
    Message,
}

/// 比较方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    #[default]
    Contains,
    StartsWith,
    EndsWith,
    Equals,
    /// 正则匹配（regex-lite 语法）
    Matches,
}

/// 过滤器在判定中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// 必须匹配
    Required,
    /// 所有可选过滤器中至少匹配一个
    #[default]
    Optional,
    /// 匹配则拒绝
    Excluded,
}

/// 过滤器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SmartDefault, Validate)]
#[serde(default)]
pub struct FilterOptions {
    #[garde(skip)]
    pub target: FilterTarget,

    #[garde(skip)]
    pub comparison: Comparison,

    /// 任意一个值匹配即视为匹配
    #[garde(length(min = 1))]
    pub values: Vec<String>,

    #[default = false]
    #[garde(skip)]
    pub case_sensitive: bool,

    #[garde(skip)]
    pub kind: FilterKind,

    /// 低于该级别的事件不受此过滤器影响
    #[garde(skip)]
    pub min_level: LogLevel,
}

impl FilterOptions {
    pub fn new<I, S>(target: FilterTarget, comparison: Comparison, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target,
            comparison,
            values: values.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.kind = FilterKind::Required;
        self
    }

    pub fn excluded(mut self) -> Self {
        self.kind = FilterKind::Excluded;
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

enum Matcher {
    Text {
        comparison: Comparison,
        values: Vec<String>,
        case_sensitive: bool,
    },
    Pattern(Vec<regex_lite::Regex>),
}

/// 编译后的过滤器
pub struct Filter {
    target: FilterTarget,
    kind: FilterKind,
    min_level: LogLevel,
    matcher: Matcher,
}

impl Filter {
    /// 校验配置并编译过滤器，正则非法时返回错误
    pub fn new(options: FilterOptions) -> Result<Self> {
        options.validate()?;

        let matcher = match options.comparison {
            Comparison::Matches => {
                let patterns = options
                    .values
                    .iter()
                    .map(|pattern| {
                        regex_lite::RegexBuilder::new(pattern)
                            .case_insensitive(!options.case_sensitive)
                            .build()
                            .map_err(|e| Error::InvalidFilterPattern {
                                pattern: pattern.clone(),
                                message: e.to_string(),
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Matcher::Pattern(patterns)
            }
            comparison => {
                let values = if options.case_sensitive {
                    options.values
                } else {
                    options.values.iter().map(|v| v.to_lowercase()).collect()
                };
                Matcher::Text {
                    comparison,
                    values,
                    case_sensitive: options.case_sensitive,
                }
            }
        };

        Ok(Self {
            target: options.target,
            kind: options.kind,
            min_level: options.min_level,
            matcher,
        })
    }

    pub fn target(&self) -> FilterTarget {
        self.target
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// 该级别的事件是否受此过滤器约束
    pub fn applies_to(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// 判断事件是否匹配，消息过滤器在消息未求值时视为不匹配
    pub fn matches(&self, path: &str, function: &str, message: Option<&str>) -> bool {
        let subject = match self.target {
            FilterTarget::Path => path,
            FilterTarget::Function => function,
            FilterTarget::Message => match message {
                Some(message) => message,
                None => return false,
            },
        };

        match &self.matcher {
            Matcher::Pattern(patterns) => patterns.iter().any(|p| p.is_match(subject)),
            Matcher::Text {
                comparison,
                values,
                case_sensitive,
            } => {
                let lowered;
                let subject = if *case_sensitive {
                    subject
                } else {
                    lowered = subject.to_lowercase();
                    lowered.as_str()
                };
                values.iter().any(|value| match comparison {
                    Comparison::Contains => subject.contains(value.as_str()),
                    Comparison::StartsWith => subject.starts_with(value.as_str()),
                    Comparison::EndsWith => subject.ends_with(value.as_str()),
                    Comparison::Equals => subject == value,
                    Comparison::Matches => false,
                })
            }
        }
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("target", &self.target)
            .field("kind", &self.kind)
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}
