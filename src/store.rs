// Task store: draft fields, mutation intents, derived views, persistence

use crate::models::{Category, Priority, Task};
use crate::slot::{StorageSlot, TASKS_KEY};
use crate::snapshot;
use tracing::{debug, warn};

/// Report from [`TaskStore::toggle_task`]: which way the flag flipped.
///
/// The store emits no UI side effects. The caller checks [`celebrates`]
/// and fires the celebration collaborator itself, at most once per toggle.
///
/// [`celebrates`]: ToggleOutcome::celebrates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The task went from incomplete to completed.
    Completed,
    /// The task went from completed back to incomplete.
    Reopened,
}

impl ToggleOutcome {
    /// True exactly when the toggle completed the task.
    pub fn celebrates(self) -> bool {
        matches!(self, ToggleOutcome::Completed)
    }
}

/// Observer callback invoked with the task list after each mutation.
pub type Observer = Box<dyn FnMut(&[Task])>;

/// The task list and the logic that mutates, derives, and persists it.
///
/// Mutations run synchronously to completion: apply the intent, write the
/// snapshot to the slot, notify observers. The view layer holds the store,
/// dispatches intents by storage index, and re-renders on notification; it
/// never mutates the list directly.
pub struct TaskStore<S> {
    slot: S,
    tasks: Vec<Task>,
    draft_text: String,
    draft_category: Category,
    draft_priority: Priority,
    observers: Vec<Observer>,
}

impl<S: StorageSlot> TaskStore<S> {
    /// Open a store backed by the given slot.
    ///
    /// The slot is read once. An absent, unreadable, or unparsable snapshot
    /// starts the store with an empty list; startup itself cannot fail.
    pub fn open(slot: S) -> Self {
        let tasks = match slot.read(TASKS_KEY) {
            Ok(Some(value)) => snapshot::decode(&value),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = ?e, "Failed to read task snapshot, starting empty");
                Vec::new()
            }
        };

        debug!(count = tasks.len(), "Task store ready");

        Self {
            slot,
            tasks,
            draft_text: String::new(),
            draft_category: Category::default(),
            draft_priority: Priority::default(),
            observers: Vec::new(),
        }
    }

    // ========================================================================
    // Draft fields
    // ========================================================================

    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
    }

    pub fn set_draft_category(&mut self, category: Category) {
        self.draft_category = category;
    }

    pub fn set_draft_priority(&mut self, priority: Priority) {
        self.draft_priority = priority;
    }

    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    pub fn draft_category(&self) -> Category {
        self.draft_category
    }

    pub fn draft_priority(&self) -> Priority {
        self.draft_priority
    }

    // ========================================================================
    // Mutation intents
    // ========================================================================

    /// Append a task built from the draft fields.
    ///
    /// Returns `false` without changing state when the draft text trims to
    /// empty. Otherwise the task keeps the draft text verbatim (surrounding
    /// whitespace included), the draft text is cleared, and the category and
    /// priority selections stay put for the next add.
    pub fn add_task(&mut self) -> bool {
        if self.draft_text.trim().is_empty() {
            return false;
        }

        let task = Task::new(
            std::mem::take(&mut self.draft_text),
            self.draft_category,
            self.draft_priority,
        );
        self.tasks.push(task);

        self.after_mutation();
        true
    }

    /// Flip the completion flag of the task at `index`.
    ///
    /// Toggling twice restores the original flag. The returned outcome tells
    /// the caller whether this toggle completed the task.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Indices come from enumerating the
    /// current list at render time, so an invalid index is a caller bug.
    pub fn toggle_task(&mut self, index: usize) -> ToggleOutcome {
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        let outcome = if task.completed {
            ToggleOutcome::Completed
        } else {
            ToggleOutcome::Reopened
        };

        self.after_mutation();
        outcome
    }

    /// Remove the task at `index`, preserving the relative order of the
    /// rest. Returns the removed task.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove_task(&mut self, index: usize) -> Task {
        let removed = self.tasks.remove(index);
        self.after_mutation();
        removed
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    /// Completion percentage in `[0, 100]`; `0.0` for an empty list.
    pub fn progress(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        completed as f64 / self.tasks.len() as f64 * 100.0
    }

    /// Progress formatted to one decimal place, e.g. `"66.7"`.
    pub fn progress_label(&self) -> String {
        format!("{:.1}", self.progress())
    }

    /// Display ordering: incomplete tasks before completed ones, then by
    /// priority rank (High, Medium, Low).
    ///
    /// The sort is stable, so tasks equal under the comparator keep their
    /// storage order. Each entry carries its storage index so the view can
    /// dispatch toggle/remove intents against the unsorted list.
    pub fn sorted_view(&self) -> Vec<(usize, &Task)> {
        let mut view: Vec<(usize, &Task)> = self.tasks.iter().enumerate().collect();
        view.sort_by_key(|(_, task)| (task.completed, task.priority.rank()));
        view
    }

    /// The task list in storage (insertion) order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // ========================================================================
    // Change notification
    // ========================================================================

    /// Register an observer called with the post-mutation task list after
    /// every state change. The store knows nothing about rendering.
    pub fn subscribe(&mut self, observer: impl FnMut(&[Task]) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Persist the current list and notify observers.
    ///
    /// Persistence is fire-and-forget: a failed write is logged and the
    /// in-memory mutation stands, with no retry and no rollback.
    fn after_mutation(&mut self) {
        match snapshot::encode(&self.tasks) {
            Ok(value) => {
                if let Err(e) = self.slot.write(TASKS_KEY, &value) {
                    warn!(error = ?e, "Failed to persist task snapshot");
                }
            }
            Err(e) => warn!(error = ?e, "Failed to serialize task snapshot"),
        }

        for observer in &mut self.observers {
            observer(&self.tasks);
        }
    }

    /// Get a reference to the underlying slot
    pub fn slot(&self) -> &S {
        &self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::MemorySlot;
    use eyre::eyre;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Slot whose writes always fail, for the fire-and-forget contract.
    struct BrokenSlot;

    impl StorageSlot for BrokenSlot {
        fn read(&self, _key: &str) -> eyre::Result<Option<String>> {
            Err(eyre!("read failure"))
        }

        fn write(&mut self, _key: &str, _value: &str) -> eyre::Result<()> {
            Err(eyre!("write failure"))
        }
    }

    fn store_with_tasks(specs: &[(&str, Priority, bool)]) -> TaskStore<MemorySlot> {
        let mut store = TaskStore::open(MemorySlot::new());
        for (text, priority, completed) in specs {
            store.set_draft_text(*text);
            store.set_draft_priority(*priority);
            assert!(store.add_task());
            if *completed {
                store.toggle_task(store.len() - 1);
            }
        }
        store
    }

    #[test]
    fn test_open_empty_slot_starts_empty() {
        let store = TaskStore::open(MemorySlot::new());
        assert!(store.is_empty());
        assert_eq!(store.draft_text(), "");
        assert_eq!(store.draft_category(), Category::General);
        assert_eq!(store.draft_priority(), Priority::Medium);
    }

    #[test]
    fn test_open_restores_persisted_tasks() {
        let slot = MemorySlot::with_value(
            TASKS_KEY,
            r#"[{"text":"call mom","category":"Personal","priority":"Low","completed":true}]"#,
        );

        let store = TaskStore::open(slot);
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].text, "call mom");
        assert_eq!(store.tasks()[0].category, Category::Personal);
        assert!(store.tasks()[0].completed);
    }

    #[test]
    fn test_open_corrupted_slot_starts_empty() {
        let slot = MemorySlot::with_value(TASKS_KEY, "{corrupted!");
        let store = TaskStore::open(slot);
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_unreadable_slot_starts_empty() {
        let store = TaskStore::open(BrokenSlot);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_task_appends_and_clears_draft_text() {
        let mut store = TaskStore::open(MemorySlot::new());
        store.set_draft_text("buy milk");
        store.set_draft_category(Category::Work);
        store.set_draft_priority(Priority::High);

        assert!(store.add_task());

        assert_eq!(store.len(), 1);
        let task = &store.tasks()[0];
        assert_eq!(task.text, "buy milk");
        assert_eq!(task.category, Category::Work);
        assert_eq!(task.priority, Priority::High);
        assert!(!task.completed);

        // Text is cleared; category and priority selections survive
        assert_eq!(store.draft_text(), "");
        assert_eq!(store.draft_category(), Category::Work);
        assert_eq!(store.draft_priority(), Priority::High);
    }

    #[test]
    fn test_add_task_keeps_surrounding_whitespace() {
        let mut store = TaskStore::open(MemorySlot::new());
        store.set_draft_text(" buy milk ");
        store.set_draft_category(Category::Work);
        store.set_draft_priority(Priority::High);

        assert!(store.add_task());
        assert_eq!(store.tasks()[0].text, " buy milk ");
    }

    #[test]
    fn test_add_task_whitespace_only_is_noop() {
        let mut store = TaskStore::open(MemorySlot::new());

        store.set_draft_text("   ");
        assert!(!store.add_task());

        assert!(store.is_empty());
        // Nothing was persisted either
        assert!(store.slot().read(TASKS_KEY).unwrap().is_none());
        // The rejected draft is kept for the user to edit
        assert_eq!(store.draft_text(), "   ");
    }

    #[test]
    fn test_toggle_task_outcome() {
        let mut store = store_with_tasks(&[("a", Priority::Medium, false)]);

        let outcome = store.toggle_task(0);
        assert_eq!(outcome, ToggleOutcome::Completed);
        assert!(outcome.celebrates());
        assert!(store.tasks()[0].completed);

        // Un-completing never celebrates
        let outcome = store.toggle_task(0);
        assert_eq!(outcome, ToggleOutcome::Reopened);
        assert!(!outcome.celebrates());
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn test_double_toggle_restores_original_flags() {
        let mut store = store_with_tasks(&[
            ("a", Priority::High, false),
            ("b", Priority::Low, true),
            ("c", Priority::Medium, false),
        ]);
        let before: Vec<bool> = store.tasks().iter().map(|t| t.completed).collect();

        store.toggle_task(1);
        store.toggle_task(1);

        let after: Vec<bool> = store.tasks().iter().map(|t| t.completed).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_task_preserves_relative_order() {
        let mut store = store_with_tasks(&[
            ("a", Priority::Medium, false),
            ("b", Priority::Medium, false),
            ("c", Priority::Medium, false),
        ]);

        let removed = store.remove_task(1);
        assert_eq!(removed.text, "b");

        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].text, "a");
        assert_eq!(store.tasks()[1].text, "c");
    }

    #[test]
    fn test_progress() {
        let store = TaskStore::open(MemorySlot::new());
        assert_eq!(store.progress(), 0.0);

        let store = store_with_tasks(&[("a", Priority::Medium, true)]);
        assert_eq!(store.progress(), 100.0);

        let store = store_with_tasks(&[("a", Priority::Medium, true), ("b", Priority::Medium, false)]);
        assert_eq!(store.progress(), 50.0);
    }

    #[test]
    fn test_progress_label_one_decimal() {
        let store = store_with_tasks(&[
            ("a", Priority::Medium, true),
            ("b", Priority::Medium, true),
            ("c", Priority::Medium, false),
        ]);
        assert_eq!(store.progress_label(), "66.7");

        let empty = TaskStore::open(MemorySlot::new());
        assert_eq!(empty.progress_label(), "0.0");
    }

    #[test]
    fn test_sorted_view_ordering() {
        let store = store_with_tasks(&[
            ("low", Priority::Low, false),
            ("high", Priority::High, false),
            ("done-high", Priority::High, true),
        ]);

        let view = store.sorted_view();
        let texts: Vec<&str> = view.iter().map(|(_, t)| t.text.as_str()).collect();
        assert_eq!(texts, vec!["high", "low", "done-high"]);

        // Storage order untouched
        assert_eq!(store.tasks()[0].text, "low");
    }

    #[test]
    fn test_sorted_view_is_stable_and_indexed() {
        let store = store_with_tasks(&[
            ("first", Priority::Medium, false),
            ("second", Priority::Medium, false),
            ("third", Priority::High, false),
        ]);

        let view = store.sorted_view();

        // High first, then the two Medium tasks in storage order
        assert_eq!(view[0].0, 2);
        assert_eq!(view[1].0, 0);
        assert_eq!(view[2].0, 1);
        assert_eq!(view[1].1.text, "first");
        assert_eq!(view[2].1.text, "second");
    }

    #[test]
    fn test_every_mutation_persists_snapshot() {
        let mut store = TaskStore::open(MemorySlot::new());

        store.set_draft_text("a");
        store.add_task();
        let after_add = store.slot().read(TASKS_KEY).unwrap().unwrap();
        assert_eq!(snapshot::decode(&after_add), store.tasks());

        store.toggle_task(0);
        let after_toggle = store.slot().read(TASKS_KEY).unwrap().unwrap();
        assert!(after_toggle.contains("\"completed\":true"));

        store.remove_task(0);
        let after_remove = store.slot().read(TASKS_KEY).unwrap().unwrap();
        assert_eq!(after_remove, "[]");
    }

    #[test]
    fn test_failed_write_keeps_in_memory_mutation() {
        let mut store = TaskStore::open(BrokenSlot);

        store.set_draft_text("survives");
        assert!(store.add_task());

        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].text, "survives");
    }

    #[test]
    fn test_observer_fires_once_per_mutation() {
        let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));

        let mut store = TaskStore::open(MemorySlot::new());
        let sink = Rc::clone(&seen);
        store.subscribe(move |tasks| sink.borrow_mut().push(tasks.len()));

        store.set_draft_text("a");
        store.add_task();
        store.set_draft_text("b");
        store.add_task();
        store.toggle_task(0);
        store.remove_task(1);

        // One notification per mutation, each with the post-mutation list
        assert_eq!(*seen.borrow(), vec![1, 2, 2, 1]);
    }

    #[test]
    fn test_noop_add_does_not_notify() {
        let count: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));

        let mut store = TaskStore::open(MemorySlot::new());
        let sink = Rc::clone(&count);
        store.subscribe(move |_| *sink.borrow_mut() += 1);

        store.set_draft_text("  ");
        assert!(!store.add_task());

        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_reload_round_trip() {
        let mut store = TaskStore::open(MemorySlot::new());
        store.set_draft_text("persist me");
        store.set_draft_priority(Priority::Low);
        store.add_task();
        store.toggle_task(0);

        let snapshot_value = store.slot().read(TASKS_KEY).unwrap().unwrap();
        let reloaded = TaskStore::open(MemorySlot::with_value(TASKS_KEY, &snapshot_value));

        assert_eq!(reloaded.tasks(), store.tasks());
    }
}
