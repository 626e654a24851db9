mod reminder_store;

pub use reminder_store::*;
