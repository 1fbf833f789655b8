//! Application services - Business logic orchestration

pub mod calculator_service;
pub mod command_service;
pub mod message_service;

pub use calculator_service::CalculatorService;
pub use command_service::CommandService;
pub use message_service::MessageService;
