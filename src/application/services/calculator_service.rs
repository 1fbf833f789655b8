use crate::domain::calculator::{classify, sanitize};
use crate::domain::entities::{Platform, Reply};
use crate::infrastructure::sandbox::Supervisor;

/// The calculator command end to end: sanitize, evaluate out of process,
/// classify for the platform the request came from.
pub struct CalculatorService {
    supervisor: Supervisor,
}

impl CalculatorService {
    pub fn new(supervisor: Supervisor) -> Self {
        Self { supervisor }
    }

    pub async fn calculate(&self, raw: &str, platform: Platform) -> Reply {
        let expr = sanitize(raw);
        let outcome = self.supervisor.evaluate(&expr).await;
        tracing::debug!(?outcome, "Evaluated {}", expr);
        classify(&expr, &outcome, platform.message_limit())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::infrastructure::sandbox::WorkerCommand;
    use std::time::Duration;

    #[tokio::test]
    async fn test_timeout_reply() {
        let supervisor = Supervisor::new(WorkerCommand::new("sleep", &["30"]), Duration::from_millis(100), 1);
        let service = CalculatorService::new(supervisor);
        assert_eq!(
            service.calculate("2+2", Platform::Discord).await,
            Reply::error("Execution exceeded time limit")
        );
    }

    #[tokio::test]
    async fn test_reply_from_canned_worker() {
        // Any program that prints a valid reply works as a worker
        let supervisor = Supervisor::new(
            WorkerCommand::new("echo", &[r#"{"status":"value","value":4.0}"#]),
            Duration::from_secs(5),
            1,
        );
        let service = CalculatorService::new(supervisor);
        assert_eq!(service.calculate("2 + 2", Platform::Twitch).await, Reply::text("2+2 = 4"));
    }
}
