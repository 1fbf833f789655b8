//! Out-of-process expression evaluation
//!
//! Every calculation runs in a fresh worker process: the bot binary
//! started again with the hidden `eval-worker` subcommand. The expression
//! goes in on stdin and one JSON [`WorkerReply`] comes back on stdout.

pub mod protocol;
pub mod supervisor;
pub mod worker;

pub use protocol::WorkerReply;
pub use supervisor::{Supervisor, Worker, WorkerCommand};

/// Subcommand that turns the binary into an evaluation worker
pub const WORKER_SUBCOMMAND: &str = "eval-worker";
