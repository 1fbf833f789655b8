//! Message handling - parsing and routing of chat messages

pub mod dispatcher;
pub mod parser;

pub use dispatcher::MessageDispatcher;
pub use parser::MessageParser;
