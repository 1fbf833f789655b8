//! Calculator - sanitizing, parsing and classifying chat arithmetic
//!
//! Evaluation itself runs out of process; see
//! `infrastructure::sandbox` for the worker and its supervisor.

pub mod outcome;
pub mod parser;
pub mod sanitizer;

pub use outcome::{classify, format_value, ErrorKind, EvaluationOutcome};
pub use parser::{parse, EvalError, Expr};
pub use sanitizer::{sanitize, SanitizedExpression};

/// Parse and evaluate a sanitized expression in the current process
pub fn evaluate_in_process(expr: &str) -> Result<f64, EvalError> {
    parse(expr)?.eval()
}
