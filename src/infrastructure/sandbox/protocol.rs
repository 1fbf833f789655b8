use serde::{Deserialize, Serialize};

use crate::domain::calculator::{EvalError, EvaluationOutcome};

/// The single line a worker writes to stdout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkerReply {
    Value { value: f64 },
    Error { error: EvalError },
}

impl From<Result<f64, EvalError>> for WorkerReply {
    fn from(result: Result<f64, EvalError>) -> Self {
        match result {
            Ok(value) => WorkerReply::Value { value },
            Err(error) => WorkerReply::Error { error },
        }
    }
}

impl From<WorkerReply> for EvaluationOutcome {
    fn from(reply: WorkerReply) -> Self {
        match reply {
            WorkerReply::Value { value } => Ok(value).into(),
            WorkerReply::Error { error } => Err(error).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calculator::ErrorKind;

    #[test]
    fn test_reply_wire_format() {
        let json = serde_json::to_string(&WorkerReply::Value { value: 4.0 }).unwrap();
        assert_eq!(json, r#"{"status":"value","value":4.0}"#);

        let reply: WorkerReply =
            serde_json::from_str(r#"{"status":"error","error":{"kind":"division_by_zero"}}"#).unwrap();
        assert_eq!(
            EvaluationOutcome::from(reply),
            EvaluationOutcome::Failure(ErrorKind::DivisionByZero)
        );
    }
}
