use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub completed: bool,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Task {
            name: name.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Daily,
    Weekly,
    Monthly,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Daily, Section::Weekly, Section::Monthly];

    /// Parses `daily`, `weekly` or `monthly`, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Section> {
        match name.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Section::Daily),
            "weekly" => Some(Section::Weekly),
            "monthly" => Some(Section::Monthly),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Section::Daily => "daily",
            Section::Weekly => "weekly",
            Section::Monthly => "monthly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Daily => "Daily Goals",
            Section::Weekly => "Weekly Goals",
            Section::Monthly => "Monthly Goals",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Section::Daily => 0,
            Section::Weekly => 1,
            Section::Monthly => 2,
        }
    }

    pub fn next(&self) -> Section {
        match self {
            Section::Daily => Section::Weekly,
            Section::Weekly => Section::Monthly,
            Section::Monthly => Section::Daily,
        }
    }

    pub fn prev(&self) -> Section {
        match self {
            Section::Daily => Section::Monthly,
            Section::Weekly => Section::Daily,
            Section::Monthly => Section::Weekly,
        }
    }
}

/// The persisted document: one ordered task list per section.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TaskData {
    #[serde(default)]
    pub daily: Vec<Task>,
    #[serde(default)]
    pub weekly: Vec<Task>,
    #[serde(default)]
    pub monthly: Vec<Task>,
}

impl TaskData {
    pub fn tasks(&self, section: Section) -> &Vec<Task> {
        match section {
            Section::Daily => &self.daily,
            Section::Weekly => &self.weekly,
            Section::Monthly => &self.monthly,
        }
    }

    pub fn tasks_mut(&mut self, section: Section) -> &mut Vec<Task> {
        match section {
            Section::Daily => &mut self.daily,
            Section::Weekly => &mut self.weekly,
            Section::Monthly => &mut self.monthly,
        }
    }

    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|s| self.tasks(*s).is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub completed: usize,
    pub total: usize,
    pub percent: usize,
}

impl Completion {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        let total = tasks.len();
        let percent = if total == 0 {
            0
        } else {
            completed * 100 / total
        };
        Completion {
            completed,
            total,
            percent,
        }
    }
}
