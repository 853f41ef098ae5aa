use crate::controller::Controller;
use crate::manager::TaskManager;
use crate::model::{Completion, Section, Task};
use crate::storage::TaskStore;
use crate::ui;
use anyhow::{anyhow, bail, Context, Result};
use std::path::Path;

pub fn tui(path: &Path) -> Result<()> {
    let manager = open_manager(path)?;
    ui::run(Controller::new(manager))
}

pub fn list(path: &Path, section: Option<String>) -> Result<()> {
    let manager = open_manager(path)?;
    let sections = match section {
        Some(name) => vec![parse_section(&name)?],
        None => Section::ALL.to_vec(),
    };
    for section in sections {
        let tasks = manager.tasks(section);
        let completion = Completion::of(tasks);
        println!(
            "{} ({}/{}, {}%)",
            section.label(),
            completion.completed,
            completion.total,
            completion.percent
        );
        if tasks.is_empty() {
            println!("  (empty)");
        }
        for (idx, task) in tasks.iter().enumerate() {
            println!("{}", format_task(idx, task));
        }
        println!();
    }
    Ok(())
}

pub fn add(path: &Path, name: String, section: Option<String>) -> Result<()> {
    let mut manager = open_manager(path)?;
    let section = select(&mut manager, section)?;
    if !manager.add_task(&name).context("saving tasks")? {
        bail!("task name cannot be empty");
    }
    println!("Added \"{}\" to {}", name.trim(), section.label());
    Ok(())
}

pub fn toggle(path: &Path, index: usize, section: Option<String>) -> Result<()> {
    let mut manager = open_manager(path)?;
    let section = select(&mut manager, section)?;
    if !manager.toggle_task(index).context("saving tasks")? {
        bail!("no task at index {} in {}", index, section.label());
    }
    let task = &manager.current_tasks()[index];
    println!("{}", format_task(index, task));
    Ok(())
}

pub fn print_path(path: &Path) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}

fn open_manager(path: &Path) -> Result<TaskManager> {
    TaskManager::open(TaskStore::new(path))
        .with_context(|| format!("loading tasks from {}", path.display()))
}

fn select(manager: &mut TaskManager, section: Option<String>) -> Result<Section> {
    if let Some(name) = section {
        if !manager.switch_section(&name) {
            return Err(unknown_section(&name));
        }
    }
    Ok(manager.current_section())
}

fn parse_section(name: &str) -> Result<Section> {
    Section::from_name(name).ok_or_else(|| unknown_section(name))
}

fn unknown_section(name: &str) -> anyhow::Error {
    anyhow!("unknown section '{}' (use daily, weekly or monthly)", name)
}

fn format_task(idx: usize, task: &Task) -> String {
    let checkbox = if task.completed { "[X]" } else { "[ ]" };
    format!("  {:>2} {} {}", idx, checkbox, task.name)
}
