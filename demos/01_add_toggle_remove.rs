//! Example 01: Adding, toggling, and removing tasks
//!
//! This example demonstrates the core task store operations against a
//! file-backed slot, the way a view layer would drive them.
//!
//! Run with: cargo run --example 01_add_toggle_remove

use eyre::Result;
use justtasks::{Category, FileSlot, Priority, TaskStore};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Create a temporary directory for this example
    let temp_dir = tempfile::tempdir()?;
    let slot = FileSlot::open(temp_dir.path())?;

    println!("JustTasks Basic Example");
    println!("=======================\n");
    println!("Slot path: {}\n", temp_dir.path().display());

    let mut store = TaskStore::open(slot);

    // ADD: three tasks from draft fields
    println!("1. ADD - Creating tasks from draft fields...");
    store.set_draft_text("Ship quarterly report");
    store.set_draft_category(Category::Work);
    store.set_draft_priority(Priority::High);
    store.add_task();

    store.set_draft_text("Water the plants");
    store.set_draft_category(Category::Personal);
    store.set_draft_priority(Priority::Low);
    store.add_task();

    store.set_draft_text("Book dentist appointment");
    store.set_draft_priority(Priority::Medium);
    store.add_task();

    // An empty draft is silently ignored
    store.set_draft_text("   ");
    let added = store.add_task();
    println!("   Added 3 tasks; whitespace-only add accepted: {}\n", added);

    // TOGGLE: complete one task and check the celebration report
    println!("2. TOGGLE - Completing the first task...");
    let outcome = store.toggle_task(0);
    if outcome.celebrates() {
        println!("   Task completed - fire the confetti here!\n");
    }

    // Derived views
    println!("3. VIEWS - Progress: {}%", store.progress_label());
    println!("   Display order (incomplete first, then by priority):");
    for (index, task) in store.sorted_view() {
        let mark = if task.completed { "x" } else { " " };
        println!(
            "   [{}] #{} {} - [{}] - Priority: {}",
            mark, index, task.text, task.category, task.priority
        );
    }
    println!();

    // REMOVE: delete by storage index
    println!("4. REMOVE - Deleting the plants task...");
    let removed = store.remove_task(1);
    println!("   Removed: {}", removed.text);
    println!("   {} tasks remain, progress {}%", store.len(), store.progress_label());

    Ok(())
}
