//! Third-party REST API clients and their response shapes

pub mod astronomy;
pub mod finance;
pub mod overwatch;

pub use astronomy::AstronomyApi;
pub use finance::FinanceApi;
pub use overwatch::OverwatchApi;
