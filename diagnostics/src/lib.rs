//! Diagnostics for the script front end
//!
//! Semantic faults raised by the analyzer are converted into [`Diagnostic`]
//! values here and rendered for the terminal:
//! - severity levels (Error, Warning, Info, Hint)
//! - a label under the offending token
//! - "did you mean" suggestions, help and note lines
//! - plain or ANSI-coloured output

use std::fmt;

pub use source_map::{FileId, SourceFile, SourceMap, SourcePosition, SourceSpan};

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
    Hint,
}

impl DiagnosticSeverity {
    fn ansi(self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "\x1b[31m",
            DiagnosticSeverity::Warning => "\x1b[33m",
            DiagnosticSeverity::Info => "\x1b[36m",
            DiagnosticSeverity::Hint => "\x1b[32m",
        }
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
            DiagnosticSeverity::Hint => "hint",
        };
        f.write_str(name)
    }
}

/// A message attached to a span
#[derive(Debug, Clone)]
pub struct Label {
    pub span: SourceSpan,
    pub message: String,
}

impl Label {
    pub fn primary(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A proposed replacement for the text under `span`
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub message: String,
    pub span: SourceSpan,
    pub replacement: String,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: Option<String>,
    pub message: String,
    pub span: SourceSpan,
    pub labels: Vec<Label>,
    pub suggestions: Vec<Suggestion>,
    pub notes: Vec<String>,
    pub help: Vec<String>,
}

impl Diagnostic {
    pub fn primary_label(&self) -> Option<&Label> {
        self.labels.first()
    }
}

/// Builder for creating diagnostics
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            diagnostic: Diagnostic {
                severity,
                code: None,
                message: message.into(),
                span,
                labels: Vec::new(),
                suggestions: Vec::new(),
                notes: Vec::new(),
                help: Vec::new(),
            },
        }
    }

    pub fn error(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(DiagnosticSeverity::Error, message, span)
    }

    pub fn warning(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(DiagnosticSeverity::Warning, message, span)
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.diagnostic.code = Some(code.into());
        self
    }

    pub fn label(mut self, span: SourceSpan, message: impl Into<String>) -> Self {
        self.diagnostic.labels.push(Label::primary(span, message));
        self
    }

    pub fn suggestion(
        mut self,
        message: impl Into<String>,
        span: SourceSpan,
        replacement: impl Into<String>,
    ) -> Self {
        self.diagnostic.suggestions.push(Suggestion {
            message: message.into(),
            span,
            replacement: replacement.into(),
        });
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.diagnostic.notes.push(note.into());
        self
    }

    pub fn help(mut self, help_msg: impl Into<String>) -> Self {
        self.diagnostic.help.push(help_msg.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

/// Renders diagnostics as text, optionally with ANSI colours
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorFormatter {
    use_colors: bool,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    pub fn with_colors() -> Self {
        Self { use_colors: true }
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", style, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic, source_map: &SourceMap) -> String {
        let mut out = String::new();

        let mut header = diagnostic.severity.to_string();
        if let Some(code) = &diagnostic.code {
            header.push_str(&format!("[{}]", code));
        }
        out.push_str(&self.paint(diagnostic.severity.ansi(), &header));
        out.push_str(": ");
        out.push_str(&self.paint("\x1b[1;97m", &diagnostic.message));
        out.push('\n');

        let span = diagnostic.span;
        if let Some(file) = source_map.get_file(span.file_id) {
            out.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.paint("\x1b[96m", "-->"),
                file.name,
                span.start.line,
                span.start.column
            ));
            if let Some(line) = file.get_line(span.start.line).filter(|l| !l.is_empty()) {
                self.push_snippet(&mut out, diagnostic, line);
            }
        }

        for suggestion in &diagnostic.suggestions {
            out.push_str(&self.paint("\x1b[38;5;208m", "suggestion"));
            out.push_str(&format!(": {}\n", suggestion.message));
        }
        for help in &diagnostic.help {
            out.push_str(&format!("     {}: {}\n", self.paint("\x1b[32m", "help"), help));
        }
        for note in &diagnostic.notes {
            out.push_str(&format!("{}: {}\n", self.paint("\x1b[34m", "note"), note));
        }

        out
    }

    fn push_snippet(&self, out: &mut String, diagnostic: &Diagnostic, line: &str) {
        let span = diagnostic.span;
        let gutter = span.start.line.to_string();
        let bar = self.paint("\x1b[96m", "|");
        let blank = " ".repeat(gutter.len());

        out.push_str(&format!("{} {}\n", blank, bar));
        out.push_str(&format!("{} {} {}\n", self.paint("\x1b[96m", &gutter), bar, line));

        let padding = " ".repeat(span.start.column.saturating_sub(1));
        let carets = self.paint(diagnostic.severity.ansi(), &"^".repeat(span.width()));
        out.push_str(&format!("{} {} {}{}", blank, bar, padding, carets));
        if let Some(label) = diagnostic.primary_label() {
            out.push(' ');
            out.push_str(&self.paint("\x1b[1;4;31m", &label.message));
        }
        out.push('\n');
    }
}

pub mod script;
