mod memory;

pub use memory::InMemoryReminderStore;
