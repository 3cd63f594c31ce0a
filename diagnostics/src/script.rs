//! Diagnostic builders for semantic faults in scripts
//!
//! One constructor per fault the analyzer can raise. The caller supplies the
//! error code from its registry.

use crate::{Diagnostic, DiagnosticBuilder, SourceSpan};

pub struct ScriptDiagnostics;

impl ScriptDiagnostics {
    /// A name declared twice in the same scope
    pub fn duplicate_id(code: &str, span: SourceSpan, name: &str, scope_name: &str) -> Diagnostic {
        DiagnosticBuilder::error(format!("duplicate identifier '{}'", name), span)
            .code(code)
            .label(span, format!("'{}' is already declared in scope '{}'", name, scope_name))
            .help("rename one of the declarations or remove the duplicate")
            .note("a nested function scope may shadow an outer declaration, the same scope may not")
            .build()
    }

    /// A variable reference with no binding in the scope chain
    pub fn identifier_not_found(
        code: &str,
        span: SourceSpan,
        name: &str,
        candidate: Option<&str>,
    ) -> Diagnostic {
        let builder = DiagnosticBuilder::error(format!("identifier '{}' not found", name), span)
            .code(code)
            .label(span, "not declared in this scope or any enclosing scope");
        with_candidate(builder, span, candidate)
            .help(format!("declare it first, e.g. 'var {} INTEGER'", name))
            .build()
    }

    /// A call or function reference that resolves to nothing
    pub fn undefined_function(
        code: &str,
        span: SourceSpan,
        name: &str,
        candidate: Option<&str>,
    ) -> Diagnostic {
        let builder = DiagnosticBuilder::error(format!("undefined function '{}'", name), span)
            .code(code)
            .label(span, "no user, package or builtin function with this name");
        with_candidate(builder, span, candidate)
            .help("package functions need an import and a qualified call, e.g. 'math.sqrt(x)'")
            .build()
    }

    /// Actual argument count differs from the declared parameter count
    pub fn wrong_params_num(
        code: &str,
        span: SourceSpan,
        name: &str,
        expected: usize,
        found: usize,
    ) -> Diagnostic {
        DiagnosticBuilder::error(format!("wrong number of arguments to '{}'", name), span)
            .code(code)
            .label(
                span,
                format!(
                    "expected {} argument{}, found {}",
                    expected,
                    if expected == 1 { "" } else { "s" },
                    found
                ),
            )
            .build()
    }

    /// The program nests deeper than the analyzer is configured to walk
    pub fn nesting_too_deep(code: &str, span: SourceSpan, limit: usize) -> Diagnostic {
        DiagnosticBuilder::error("program nests too deeply to analyze", span)
            .code(code)
            .label(span, format!("nesting limit of {} reached here", limit))
            .help("raise 'max-depth' in the [analyzer] section of the configuration")
            .build()
    }
}

fn with_candidate(
    builder: DiagnosticBuilder,
    span: SourceSpan,
    candidate: Option<&str>,
) -> DiagnosticBuilder {
    match candidate {
        Some(name) => builder.suggestion(format!("did you mean '{}'?", name), span, name),
        None => builder,
    }
}

/// Pick the candidate closest to `found`, if any is close enough to be a typo.
pub fn closest_match<'a, I>(found: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let limit = (found.chars().count() / 3).max(1);
    candidates
        .into_iter()
        .filter(|c| *c != found)
        .map(|c| (edit_distance(found, c), c))
        .filter(|(d, _)| *d <= limit)
        .min_by_key(|(d, _)| *d)
        .map(|(_, c)| c)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cur = row[j + 1];
            row[j + 1] = if ca == *cb {
                prev
            } else {
                1 + prev.min(cur).min(row[j])
            };
            prev = cur;
        }
    }
    row[b.len()]
}
