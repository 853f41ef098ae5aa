use crate::error::AppError;
use crate::model::{Completion, Section, Task, TaskData};
use crate::storage::TaskStore;
use tracing::{debug, info};

/// Owns the three section lists and the store they are flushed to.
///
/// Every operation that changes task data writes the store before returning.
/// A failed write leaves the in-memory change in place and hands the error
/// back to the caller.
pub struct TaskManager {
    data: TaskData,
    current: Section,
    store: TaskStore,
}

impl TaskManager {
    pub fn new(data: TaskData, store: TaskStore) -> Self {
        TaskManager {
            data,
            current: Section::Daily,
            store,
        }
    }

    pub fn open(store: TaskStore) -> Result<Self, AppError> {
        let data = store.load()?;
        info!(path = %store.path().display(), empty = data.is_empty(), "loaded tasks");
        Ok(TaskManager::new(data, store))
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn current_section(&self) -> Section {
        self.current
    }

    pub fn current_tasks(&self) -> &[Task] {
        self.data.tasks(self.current)
    }

    pub fn tasks(&self, section: Section) -> &[Task] {
        self.data.tasks(section)
    }

    pub fn completion(&self) -> Completion {
        Completion::of(self.current_tasks())
    }

    /// Returns `Ok(false)` when the trimmed name is empty and nothing was added.
    pub fn add_task(&mut self, name: &str) -> Result<bool, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        self.current_mut().push(Task::new(name));
        debug!(section = self.current.key(), task = name, "added task");
        self.persist()?;
        Ok(true)
    }

    pub fn toggle_task(&mut self, index: usize) -> Result<bool, AppError> {
        let Some(task) = self.current_mut().get_mut(index) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        debug!(section = self.current.key(), index, "toggled task");
        self.persist()?;
        Ok(true)
    }

    /// Removes the task at `index`, returning it when the index was in range.
    pub fn delete_task(&mut self, index: usize) -> Result<Option<Task>, AppError> {
        if index >= self.current_tasks().len() {
            return Ok(None);
        }
        let removed = self.current_mut().remove(index);
        debug!(section = self.current.key(), index, "deleted task");
        self.persist()?;
        Ok(Some(removed))
    }

    /// Empties the current section only.
    pub fn clear_all(&mut self) -> Result<(), AppError> {
        self.current_mut().clear();
        debug!(section = self.current.key(), "cleared section");
        self.persist()
    }

    /// Unrecognized names leave the current section unchanged.
    pub fn switch_section(&mut self, name: &str) -> bool {
        match Section::from_name(name) {
            Some(section) => {
                self.set_section(section);
                true
            }
            None => false,
        }
    }

    pub fn set_section(&mut self, section: Section) {
        self.current = section;
    }

    fn current_mut(&mut self) -> &mut Vec<Task> {
        self.data.tasks_mut(self.current)
    }

    fn persist(&self) -> Result<(), AppError> {
        self.store.save(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn manager() -> Result<(TempDir, TaskManager)> {
        let temp = tempdir()?;
        let store = TaskStore::new(temp.path().join("tasks.json"));
        let manager = TaskManager::open(store)?;
        Ok((temp, manager))
    }

    fn names(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.name.as_str()).collect()
    }

    fn on_disk(manager: &TaskManager) -> Result<TaskData> {
        Ok(TaskStore::new(manager.store().path()).load()?)
    }

    #[test]
    fn add_appends_in_call_order() -> Result<()> {
        let (_temp, mut tm) = manager()?;
        for (i, name) in ["one", "two", "three"].iter().enumerate() {
            assert!(tm.add_task(name)?);
            assert_eq!(tm.current_tasks().len(), i + 1);
        }
        assert_eq!(names(tm.current_tasks()), vec!["one", "two", "three"]);
        Ok(())
    }

    #[test]
    fn add_trims_and_ignores_blank_names() -> Result<()> {
        let (_temp, mut tm) = manager()?;
        assert!(!tm.add_task("")?);
        assert!(!tm.add_task("   ")?);
        assert!(!tm.add_task("\t\n")?);
        assert!(tm.current_tasks().is_empty());

        tm.add_task("  spaced out  ")?;
        assert_eq!(names(tm.current_tasks()), vec!["spaced out"]);
        Ok(())
    }

    #[test]
    fn toggle_twice_restores_state() -> Result<()> {
        let (_temp, mut tm) = manager()?;
        tm.add_task("a")?;
        tm.add_task("b")?;

        tm.toggle_task(1)?;
        assert!(tm.current_tasks()[1].completed);
        assert!(!tm.current_tasks()[0].completed);
        tm.toggle_task(1)?;
        assert!(!tm.current_tasks()[1].completed);
        Ok(())
    }

    #[test]
    fn delete_removes_only_target_and_keeps_order() -> Result<()> {
        let (_temp, mut tm) = manager()?;
        for name in ["a", "b", "c", "d"] {
            tm.add_task(name)?;
        }

        let removed = tm.delete_task(1)?;

        assert_eq!(removed.map(|t| t.name), Some("b".to_string()));
        assert_eq!(names(tm.current_tasks()), vec!["a", "c", "d"]);
        Ok(())
    }

    #[test]
    fn out_of_range_indices_are_no_ops() -> Result<()> {
        let (_temp, mut tm) = manager()?;
        assert!(!tm.toggle_task(0)?);
        assert_eq!(tm.delete_task(0)?, None);

        tm.add_task("a")?;
        let before = tm.current_tasks().to_vec();
        assert!(!tm.toggle_task(1)?);
        assert!(!tm.toggle_task(usize::MAX)?);
        assert_eq!(tm.delete_task(1)?, None);
        assert_eq!(tm.delete_task(usize::MAX)?, None);
        assert_eq!(tm.current_tasks(), before.as_slice());
        Ok(())
    }

    #[test]
    fn unknown_section_leaves_current_unchanged() -> Result<()> {
        let (_temp, mut tm) = manager()?;
        assert!(tm.switch_section("weekly"));
        assert!(!tm.switch_section("yearly"));
        assert!(!tm.switch_section(""));
        assert_eq!(tm.current_section(), Section::Weekly);
        Ok(())
    }

    #[test]
    fn clear_all_empties_only_current_section() -> Result<()> {
        let (_temp, mut tm) = manager()?;
        tm.add_task("daily")?;
        tm.switch_section("monthly");
        tm.add_task("monthly")?;

        tm.clear_all()?;

        assert!(tm.current_tasks().is_empty());
        assert_eq!(names(tm.tasks(Section::Daily)), vec!["daily"]);
        assert!(on_disk(&tm)?.monthly.is_empty());
        Ok(())
    }

    #[test]
    fn buy_milk_lifecycle_is_persisted() -> Result<()> {
        let (_temp, mut tm) = manager()?;

        tm.add_task("Buy milk")?;
        assert_eq!(tm.current_tasks(), &[Task::new("Buy milk")]);
        assert_eq!(on_disk(&tm)?.daily, vec![Task::new("Buy milk")]);

        tm.toggle_task(0)?;
        assert!(tm.current_tasks()[0].completed);
        assert!(on_disk(&tm)?.daily[0].completed);

        tm.delete_task(0)?;
        assert!(tm.current_tasks().is_empty());
        assert!(on_disk(&tm)?.daily.is_empty());
        Ok(())
    }

    #[test]
    fn sections_do_not_leak_into_each_other() -> Result<()> {
        let (_temp, mut tm) = manager()?;
        for section in ["daily", "weekly", "monthly"] {
            tm.switch_section(section);
            tm.add_task(&format!("{} 1", section))?;
            tm.add_task(&format!("{} 2", section))?;
        }

        tm.switch_section("weekly");
        tm.add_task("x")?;
        assert_eq!(names(tm.current_tasks()), vec!["weekly 1", "weekly 2", "x"]);

        tm.switch_section("daily");
        assert_eq!(names(tm.current_tasks()), vec!["daily 1", "daily 2"]);
        assert_eq!(names(tm.tasks(Section::Monthly)), vec!["monthly 1", "monthly 2"]);
        Ok(())
    }

    #[test]
    fn failed_save_keeps_change_in_memory() -> Result<()> {
        let temp = tempdir()?;
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "")?;
        let mut tm = TaskManager::new(
            TaskData::default(),
            TaskStore::new(blocker.join("tasks.json")),
        );

        let err = tm.add_task("kept").unwrap_err();

        assert!(matches!(err, AppError::Io { .. }));
        assert_eq!(names(tm.current_tasks()), vec!["kept"]);
        Ok(())
    }

    #[test]
    fn reopening_restores_saved_tasks() -> Result<()> {
        let (temp, mut tm) = manager()?;
        tm.switch_section("weekly");
        tm.add_task("carry over")?;

        let reopened = TaskManager::open(TaskStore::new(temp.path().join("tasks.json")))?;

        assert_eq!(reopened.current_section(), Section::Daily);
        assert_eq!(names(reopened.tasks(Section::Weekly)), vec!["carry over"]);
        Ok(())
    }
}
