mod reminder_board;
mod time_recording;

pub use reminder_board::*;
pub use time_recording::*;
