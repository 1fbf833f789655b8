use super::parser::EvalError;
use super::SanitizedExpression;
use crate::domain::entities::Reply;

/// User-facing failure categories of the calculator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    SyntaxError,
    DivisionByZero,
    OutputTooLarge,
    Timeout,
    /// Anything not covered above, with a short description
    Internal(String),
}

impl ErrorKind {
    pub fn message(&self) -> String {
        match self {
            ErrorKind::SyntaxError => "Syntax error".to_string(),
            ErrorKind::DivisionByZero => "Error: Division by zero".to_string(),
            ErrorKind::OutputTooLarge => "Output too long".to_string(),
            ErrorKind::Timeout => "Execution exceeded time limit".to_string(),
            ErrorKind::Internal(detail) => format!("Error: {}", detail),
        }
    }
}

impl From<EvalError> for ErrorKind {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::Syntax(_) => ErrorKind::SyntaxError,
            EvalError::DivisionByZero => ErrorKind::DivisionByZero,
            other => ErrorKind::Internal(other.to_string()),
        }
    }
}

/// Result of one calculator invocation
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    Success(f64),
    Failure(ErrorKind),
}

impl From<Result<f64, EvalError>> for EvaluationOutcome {
    fn from(result: Result<f64, EvalError>) -> Self {
        match result {
            Ok(value) => EvaluationOutcome::Success(value),
            Err(err) => EvaluationOutcome::Failure(err.into()),
        }
    }
}

/// Format a result, dropping the fractional part of integral values.
pub fn format_value(value: f64) -> String {
    // -0.0 == 0.0, and prints as 0
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Turn an outcome into the reply shown to the user.
///
/// `limit` is the platform's message size ceiling; a successful result
/// whose rendered text is longer is reported as [`ErrorKind::OutputTooLarge`].
pub fn classify(expr: &SanitizedExpression, outcome: &EvaluationOutcome, limit: usize) -> Reply {
    let kind = match outcome {
        EvaluationOutcome::Success(value) => {
            let text = format!("{} = {}", expr, format_value(*value));
            if text.chars().count() <= limit {
                return Reply::Text(text);
            }
            ErrorKind::OutputTooLarge
        }
        EvaluationOutcome::Failure(kind) => kind.clone(),
    };
    Reply::Error(kind.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calculator::sanitize;

    #[test]
    fn test_success_reply() {
        let expr = sanitize("2+2");
        let reply = classify(&expr, &EvaluationOutcome::Success(4.0), 2000);
        assert_eq!(reply, Reply::text("2+2 = 4"));
    }

    #[test]
    fn test_output_too_large() {
        let expr = sanitize("10**300");
        let outcome = EvaluationOutcome::Success(1e300);
        assert!(matches!(classify(&expr, &outcome, 2048), Reply::Text(_)));
        assert_eq!(classify(&expr, &outcome, 100), Reply::error("Output too long"));
    }

    #[test]
    fn test_failure_messages() {
        let expr = sanitize("5/0");
        let cases = [
            (ErrorKind::SyntaxError, "Syntax error"),
            (ErrorKind::DivisionByZero, "Error: Division by zero"),
            (ErrorKind::Timeout, "Execution exceeded time limit"),
            (ErrorKind::Internal("math range error".into()), "Error: math range error"),
        ];
        for (kind, message) in cases {
            assert_eq!(classify(&expr, &EvaluationOutcome::Failure(kind), 2000), Reply::error(message));
        }
    }

    #[test]
    fn test_eval_errors_map_to_kinds() {
        assert_eq!(ErrorKind::from(EvalError::Syntax("x".into())), ErrorKind::SyntaxError);
        assert_eq!(ErrorKind::from(EvalError::DivisionByZero), ErrorKind::DivisionByZero);
        assert_eq!(ErrorKind::from(EvalError::Domain), ErrorKind::Internal("math domain error".into()));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(4.0), "4");
        assert_eq!(format_value(-12.0), "-12");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(-0.0 * 2.5), "0");
        assert_eq!(format_value(6.283185307179586), "6.283185307179586");
    }
}
