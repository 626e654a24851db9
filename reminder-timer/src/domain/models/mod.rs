mod ids;
mod reminder;
mod timer;

pub use ids::*;
pub use reminder::*;
pub use timer::*;
