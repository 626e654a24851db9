pub mod clock;
mod error;
pub mod models;
pub mod ports;
pub mod services;
pub mod ticker;
pub mod time_spent;
pub mod timer_registry;

pub use error::*;
pub use ticker::{spawn_ticker, TickerHandle};
pub use timer_registry::{ElapsedSnapshot, SharedTimerRegistry, TimerRegistry};
