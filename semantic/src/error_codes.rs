//! Error code registry for semantic analysis
//!
//! # Error Code Ranges
//!
//! - E2000-E2999: Symbol resolution and scope errors
//! - E9000-E9999: Analyzer limits and internal errors
//!
//! Codes are never reused once published; retired codes stay reserved.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// The numeric error code (e.g., 2001)
    pub code: u16,
    pub category: &'static str,
    pub description: &'static str,
    pub help: Option<&'static str>,
}

impl ErrorCode {
    pub const fn new(
        code: u16,
        category: &'static str,
        description: &'static str,
        help: Option<&'static str>,
    ) -> Self {
        Self {
            code,
            category,
            description,
            help,
        }
    }

    /// "E{code:04}", e.g. "E2001"
    pub fn format_code(&self) -> String {
        format_error_code(self.code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.format_code(), self.category, self.description)
    }
}

pub const DUPLICATE_ID: ErrorCode = ErrorCode::new(
    2001,
    "Symbol",
    "Duplicate identifier in the same scope",
    Some("Rename one declaration; shadowing is only allowed in a nested function scope"),
);

pub const ID_NOT_FOUND: ErrorCode = ErrorCode::new(
    2002,
    "Symbol",
    "Identifier not found",
    Some("Declare the variable with 'var' before it is used"),
);

pub const UNDEFINED_FUNCTION: ErrorCode = ErrorCode::new(
    2003,
    "Symbol",
    "Undefined function",
    Some("Declare the function, import its package, or check the builtin name"),
);

pub const WRONG_PARAMS_NUM: ErrorCode = ErrorCode::new(
    2004,
    "Symbol",
    "Wrong number of arguments",
    Some("Pass exactly as many arguments as the function declares parameters"),
);

pub const NESTING_TOO_DEEP: ErrorCode = ErrorCode::new(
    9001,
    "Analyzer",
    "Nesting limit exceeded",
    Some("Raise 'max-depth' in the [analyzer] configuration or flatten the program"),
);

const ALL_CODES: &[ErrorCode] = &[
    DUPLICATE_ID,
    ID_NOT_FOUND,
    UNDEFINED_FUNCTION,
    WRONG_PARAMS_NUM,
    NESTING_TOO_DEEP,
];

pub fn all_codes() -> &'static [ErrorCode] {
    ALL_CODES
}

pub fn get_error_code(code: u16) -> Option<&'static ErrorCode> {
    ALL_CODES.iter().find(|c| c.code == code)
}

pub fn format_error_code(code: u16) -> String {
    format!("E{:04}", code)
}

/// Parse "E2001" back into 2001
pub fn parse_error_code(text: &str) -> Option<u16> {
    let digits = text.strip_prefix('E')?;
    if digits.len() != 4 {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse() {
        assert_eq!(DUPLICATE_ID.format_code(), "E2001");
        assert_eq!(format_error_code(42), "E0042");
        assert_eq!(parse_error_code("E2004"), Some(2004));
        assert_eq!(parse_error_code("2004"), None);
        assert_eq!(parse_error_code("E20041"), None);
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(get_error_code(2002), Some(&ID_NOT_FOUND));
        assert!(get_error_code(1).is_none());
        assert_eq!(
            NESTING_TOO_DEEP.to_string(),
            "E9001 [Analyzer]: Nesting limit exceeded"
        );
    }

    #[test]
    fn test_codes_are_unique_and_in_range() {
        let codes = all_codes();
        for (i, a) in codes.iter().enumerate() {
            assert!(codes[i + 1..].iter().all(|b| b.code != a.code));
            assert!((2000..3000).contains(&a.code) || (9000..10000).contains(&a.code));
        }
    }
}
