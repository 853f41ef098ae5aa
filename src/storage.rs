use crate::error::AppError;
use crate::model::TaskData;
use anyhow::{Context, Result};
use directories::BaseDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "sisyphus";
const TASKS_FILE: &str = "tasks.json";

#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

/// `<home>/sisyphus/tasks.json`
pub fn default_tasks_path() -> Result<PathBuf> {
    let dirs = BaseDirs::new().context("locating home directory")?;
    Ok(dirs.home_dir().join(APP_DIR).join(TASKS_FILE))
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<TaskData, AppError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "task file missing, creating it");
            let data = TaskData::default();
            self.save(&data)?;
            return Ok(data);
        }
        let raw = fs::read(&self.path).map_err(|err| AppError::io(&self.path, err))?;
        if raw.is_empty() {
            return Ok(TaskData::default());
        }
        serde_json::from_slice(&raw).map_err(|source| AppError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, data: &TaskData) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::io(parent, err))?;
        }
        let serialized =
            serde_json::to_string_pretty(data).map_err(|err| AppError::io(&self.path, err.into()))?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, serialized).map_err(|err| AppError::io(&temp_path, err))?;
        fs::rename(&temp_path, &self.path).map_err(|err| AppError::io(&self.path, err))?;
        debug!(path = %self.path.display(), "saved tasks");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        match self.path.file_name() {
            Some(name) => self
                .path
                .with_file_name(format!("{}.tmp", name.to_string_lossy())),
            None => self.path.with_extension("tmp"),
        }
    }
}
