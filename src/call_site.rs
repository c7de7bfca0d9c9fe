/// 调用点信息
///
/// 文件路径、原始函数签名和行号，通常由 `call_site!()` 宏生成
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    pub file: &'a str,
    pub function: &'a str,
    pub line: u32,
}

impl<'a> CallSite<'a> {
    pub fn new(file: &'a str, function: &'a str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }
}

/// 去掉函数签名中的参数列表，统一补上 `()`
///
/// ```
/// use logcast::strip_parameters;
///
/// assert_eq!(strip_parameters("login(user:password:)"), "login()");
/// assert_eq!(strip_parameters("tick"), "tick()");
/// ```
pub fn strip_parameters(signature: &str) -> String {
    let name = match signature.find('(') {
        Some(index) => &signature[..index],
        None => signature,
    };

    let mut stripped = String::with_capacity(name.len() + 2);
    stripped.push_str(name);
    stripped.push_str("()");
    stripped
}

/// 获取当前所在函数的完整路径，例如 `my_crate::service::handle`
///
/// 在闭包内调用时结果会带有 `::{{closure}}` 后缀
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __logcast_marker() {}
        fn __logcast_type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __logcast_type_name_of(__logcast_marker);
        name.strip_suffix("::__logcast_marker").unwrap_or(name)
    }};
}

/// 捕获当前调用点（文件、函数、行号）
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(file!(), $crate::function_name!(), line!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_parameters_with_arguments() {
        assert_eq!(strip_parameters("login(user:password:)"), "login()");
        assert_eq!(strip_parameters("save(name:age:)"), "save()");
    }

    #[test]
    fn test_strip_parameters_without_arguments() {
        assert_eq!(strip_parameters("refresh"), "refresh()");
        assert_eq!(strip_parameters("tick"), "tick()");
    }

    #[test]
    fn test_strip_parameters_edge_cases() {
        assert_eq!(strip_parameters(""), "()");
        assert_eq!(strip_parameters("run()"), "run()");
        // 只截取到第一个左括号
        assert_eq!(strip_parameters("apply(f:(Int))"), "apply()");
        assert_eq!(strip_parameters("(anonymous)"), "()");
    }

    #[test]
    fn test_function_name_macro() {
        let name = crate::function_name!();
        assert!(name.ends_with("test_function_name_macro"), "got {}", name);
    }

    #[test]
    fn test_call_site_macro() {
        let site = crate::call_site!();
        assert!(site.file.ends_with("call_site.rs"));
        assert!(site.function.ends_with("test_call_site_macro"));
        assert!(site.line > 0);
    }
}
