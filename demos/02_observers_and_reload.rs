//! Example 02: Change notification and reload from the durable slot
//!
//! The store notifies subscribed observers after every mutation; a view
//! layer re-renders from those notifications. Reopening a store over the
//! same slot restores the persisted list, and a corrupted slot value
//! degrades to an empty list instead of failing startup.
//!
//! Run with: cargo run --example 02_observers_and_reload

use eyre::Result;
use justtasks::{Category, FileSlot, Priority, StorageSlot, TASKS_KEY, TaskStore};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let temp_dir = tempfile::tempdir()?;

    println!("JustTasks Observers & Reload Example");
    println!("====================================\n");

    // First session: subscribe a fake view, then mutate
    println!("1. OBSERVERS - A subscriber re-renders after each mutation...");
    {
        let slot = FileSlot::open(temp_dir.path())?;
        let mut store = TaskStore::open(slot);

        store.subscribe(|tasks| {
            let done = tasks.iter().filter(|t| t.completed).count();
            println!("   [render] {} tasks, {} completed", tasks.len(), done);
        });

        store.set_draft_text("Write release notes");
        store.set_draft_category(Category::Work);
        store.set_draft_priority(Priority::High);
        store.add_task();

        store.set_draft_text("Plan weekend hike");
        store.set_draft_category(Category::Personal);
        store.set_draft_priority(Priority::Low);
        store.add_task();

        store.toggle_task(0);
    }
    println!();

    // Second session: same slot directory, state comes back
    println!("2. RELOAD - Reopening the store over the same slot...");
    {
        let slot = FileSlot::open(temp_dir.path())?;
        let store = TaskStore::open(slot);
        println!("   Restored {} tasks, progress {}%", store.len(), store.progress_label());
        for (_, task) in store.sorted_view() {
            let mark = if task.completed { "x" } else { " " };
            println!("   [{}] {}", mark, task.text);
        }
    }
    println!();

    // Third session: corrupt the snapshot, startup still succeeds
    println!("3. CORRUPTION - A bad snapshot yields an empty list, not an error...");
    {
        let mut slot = FileSlot::open(temp_dir.path())?;
        slot.write(TASKS_KEY, "{definitely not a task array")?;

        let store = TaskStore::open(slot);
        println!("   Store opened with {} tasks", store.len());
    }

    Ok(())
}
