//! Worker side of the sandbox protocol

use std::io::{self, Read, Write};

use super::WorkerReply;
use crate::application::errors::BotError;
use crate::domain::calculator::evaluate_in_process;

/// Read one expression from stdin, evaluate it and write the reply to stdout
pub fn run() -> Result<(), BotError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let reply = respond(input.trim());

    let line = serde_json::to_string(&reply).map_err(|e| BotError::Internal(e.to_string()))?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}

/// Evaluate `expr` and wrap the result for the wire
pub fn respond(expr: &str) -> WorkerReply {
    let result = evaluate_in_process(expr);
    tracing::debug!(?result, "Worker evaluated {}", expr);
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calculator::EvalError;

    #[test]
    fn test_respond() {
        assert_eq!(respond("2+2"), WorkerReply::Value { value: 4.0 });
        assert_eq!(respond("5/0"), WorkerReply::Error { error: EvalError::DivisionByZero });
    }
}
