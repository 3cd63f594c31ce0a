use crate::error_codes::{self, ErrorCode};
use ast::Token;
use diagnostics::script::ScriptDiagnostics;
use diagnostics::{Diagnostic, FileId, SourceSpan};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SemanticError>;

/// The closed set of faults the analyzer raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateId,
    IdNotFound,
    UndefinedFunction,
    WrongParamsNum,
    NestingTooDeep,
}

impl ErrorKind {
    pub fn code(self) -> &'static ErrorCode {
        match self {
            ErrorKind::DuplicateId => &error_codes::DUPLICATE_ID,
            ErrorKind::IdNotFound => &error_codes::ID_NOT_FOUND,
            ErrorKind::UndefinedFunction => &error_codes::UNDEFINED_FUNCTION,
            ErrorKind::WrongParamsNum => &error_codes::WRONG_PARAMS_NUM,
            ErrorKind::NestingTooDeep => &error_codes::NESTING_TOO_DEEP,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::DuplicateId => "Duplicate id found",
            ErrorKind::IdNotFound => "Identifier not found",
            ErrorKind::UndefinedFunction => "Undefined function",
            ErrorKind::WrongParamsNum => "Wrong number of parameters",
            ErrorKind::NestingTooDeep => "Nesting too deep",
        };
        f.write_str(text)
    }
}

/// Extra facts about a fault, used to render a helpful diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// Scope that already holds the name
    Scope(String),
    /// Closest visible name, if one looks like a typo fix
    Candidate(Option<String>),
    Arity { expected: usize, found: usize },
    Limit(usize),
}

/// A semantic fault: what went wrong, at which token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SemanticError {
    pub kind: ErrorKind,
    pub token: Token,
    pub message: String,
    pub detail: ErrorDetail,
}

impl SemanticError {
    fn new(kind: ErrorKind, token: &Token, detail: ErrorDetail) -> Self {
        Self {
            kind,
            token: token.clone(),
            message: format!("{} -> {}", kind, token),
            detail,
        }
    }

    pub fn duplicate_id(token: &Token, scope_name: &str) -> Self {
        Self::new(ErrorKind::DuplicateId, token, ErrorDetail::Scope(scope_name.to_string()))
    }

    pub fn id_not_found(token: &Token, candidate: Option<&str>) -> Self {
        Self::new(
            ErrorKind::IdNotFound,
            token,
            ErrorDetail::Candidate(candidate.map(str::to_string)),
        )
    }

    pub fn undefined_function(token: &Token, candidate: Option<&str>) -> Self {
        Self::new(
            ErrorKind::UndefinedFunction,
            token,
            ErrorDetail::Candidate(candidate.map(str::to_string)),
        )
    }

    pub fn wrong_params_num(token: &Token, expected: usize, found: usize) -> Self {
        Self::new(ErrorKind::WrongParamsNum, token, ErrorDetail::Arity { expected, found })
    }

    pub fn nesting_too_deep(token: &Token, limit: usize) -> Self {
        Self::new(ErrorKind::NestingTooDeep, token, ErrorDetail::Limit(limit))
    }

    pub fn code(&self) -> &'static ErrorCode {
        self.kind.code()
    }

    pub fn span(&self, file_id: FileId) -> SourceSpan {
        SourceSpan::covering(self.token.line, self.token.column, self.token.width(), file_id)
    }

    /// Render this fault as a diagnostic located in `file_id`
    pub fn to_diagnostic(&self, file_id: FileId) -> Diagnostic {
        let span = self.span(file_id);
        let code = self.code().format_code();
        let code = code.as_str();
        let name = self.token.lexeme.as_str();
        match (&self.kind, &self.detail) {
            (ErrorKind::DuplicateId, ErrorDetail::Scope(scope)) => {
                ScriptDiagnostics::duplicate_id(code, span, name, scope)
            }
            (ErrorKind::IdNotFound, ErrorDetail::Candidate(candidate)) => {
                ScriptDiagnostics::identifier_not_found(code, span, name, candidate.as_deref())
            }
            (ErrorKind::UndefinedFunction, ErrorDetail::Candidate(candidate)) => {
                ScriptDiagnostics::undefined_function(code, span, name, candidate.as_deref())
            }
            (ErrorKind::WrongParamsNum, ErrorDetail::Arity { expected, found }) => {
                ScriptDiagnostics::wrong_params_num(code, span, name, *expected, *found)
            }
            (ErrorKind::NestingTooDeep, ErrorDetail::Limit(limit)) => {
                ScriptDiagnostics::nesting_too_deep(code, span, *limit)
            }
            _ => diagnostics::DiagnosticBuilder::error(self.message.clone(), span)
                .code(code)
                .label(span, self.kind.to_string())
                .build(),
        }
    }
}

/// Failure to load analyzer configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::TokenKind;

    #[test]
    fn test_message_combines_kind_and_token() {
        let token = Token::id("x", 3, 5);
        let error = SemanticError::duplicate_id(&token, "global");
        assert_eq!(error.message, "Duplicate id found -> Token(ID, x, position=3:5)");
        assert_eq!(error.to_string(), error.message);
        assert_eq!(error.code().format_code(), "E2001");
    }

    #[test]
    fn test_diagnostic_codes_match_registry() {
        let token = Token::new(TokenKind::Id, "count", 2, 7);
        let errors = [
            SemanticError::duplicate_id(&token, "global"),
            SemanticError::id_not_found(&token, Some("counts")),
            SemanticError::undefined_function(&token, None),
            SemanticError::wrong_params_num(&token, 2, 1),
            SemanticError::nesting_too_deep(&token, 8),
        ];
        for error in &errors {
            let diagnostic = error.to_diagnostic(FileId::new(0));
            assert_eq!(diagnostic.code.as_deref(), Some(error.code().format_code().as_str()));
            assert_eq!(diagnostic.span.start.line, 2);
            assert_eq!(diagnostic.span.start.column, 7);
            assert_eq!(diagnostic.span.width(), 5);
        }
    }

    #[test]
    fn test_not_found_diagnostic_carries_candidate() {
        let token = Token::id("cout", 1, 1);
        let diagnostic =
            SemanticError::id_not_found(&token, Some("count")).to_diagnostic(FileId::new(0));
        assert_eq!(diagnostic.suggestions[0].replacement, "count");
    }
}
