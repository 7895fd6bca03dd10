// JustTasks - Task list state management with pluggable key-value persistence

pub mod models;
pub mod slot;
pub mod snapshot;
pub mod store;

// Re-export main types for convenience
pub use models::{Category, Priority, Task};
pub use slot::{FileSlot, MemorySlot, StorageSlot, TASKS_KEY};
pub use store::{TaskStore, ToggleOutcome};
