use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExpenseRecord {
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: String,
    pub time: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScheduleRecord {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StudyRecord {
    pub subject: String,
    pub duration_minutes: u32,
    pub date: String,
    pub time: String,
    pub notes: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct AssistantData {
    expenses: Vec<ExpenseRecord>,
    schedule: Vec<ScheduleRecord>,
    study_sessions: Vec<StudyRecord>,
}

pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

pub fn now_time() -> String {
    Local::now().format("%H:%M").to_string()
}

pub fn current_month() -> String {
    Local::now().format("%Y-%m").to_string()
}

/// Single-document JSON store for expenses, schedule entries, and study
/// sessions. Loaded once at startup and saved after each mutation; there is
/// only ever one writer (the assistant behind its process-wide lock).
pub struct Store {
    path: PathBuf,
    data: AssistantData,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store file {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Malformed store file {:?}", path))?
        } else {
            AssistantData::default()
        };
        Ok(Store { path, data })
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write store file {:?}", self.path))?;
        Ok(())
    }

    pub fn add_expense(&mut self, record: ExpenseRecord) -> Result<()> {
        self.data.expenses.push(record);
        self.save()
    }

    pub fn expenses_on(&self, date: &str) -> Vec<&ExpenseRecord> {
        self.data.expenses.iter().filter(|e| e.date == date).collect()
    }

    /// Expenses whose date falls in the given `%Y-%m` month.
    pub fn expenses_in_month(&self, month: &str) -> Vec<&ExpenseRecord> {
        self.data
            .expenses
            .iter()
            .filter(|e| e.date.starts_with(month))
            .collect()
    }

    pub fn add_schedule(&mut self, record: ScheduleRecord) -> Result<()> {
        self.data.schedule.push(record);
        self.save()
    }

    pub fn schedule_on(&self, date: &str) -> Vec<&ScheduleRecord> {
        self.data.schedule.iter().filter(|s| s.date == date).collect()
    }

    pub fn add_study_session(&mut self, record: StudyRecord) -> Result<()> {
        self.data.study_sessions.push(record);
        self.save()
    }

    pub fn study_sessions(&self) -> &[StudyRecord] {
        &self.data.study_sessions
    }

    pub fn study_sessions_on(&self, date: &str) -> Vec<&StudyRecord> {
        self.data
            .study_sessions
            .iter()
            .filter(|s| s.date == date)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(amount: f64, category: &str, date: &str) -> ExpenseRecord {
        ExpenseRecord {
            amount,
            category: category.to_string(),
            description: String::new(),
            date: date.to_string(),
            time: "12:00".to_string(),
        }
    }

    #[test]
    fn roundtrips_through_the_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assistant_data.json");

        let mut store = Store::open(&path).unwrap();
        store.add_expense(expense(50.0, "food", "2026-08-28")).unwrap();
        store
            .add_study_session(StudyRecord {
                subject: "Rust".to_string(),
                duration_minutes: 60,
                date: "2026-08-28".to_string(),
                time: "10:00".to_string(),
                notes: "ownership".to_string(),
            })
            .unwrap();

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.expenses_on("2026-08-28").len(), 1);
        assert_eq!(reopened.study_sessions().len(), 1);
        assert_eq!(reopened.study_sessions()[0].duration_minutes, 60);
    }

    #[test]
    fn date_filters_select_the_right_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("data.json")).unwrap();
        store.add_expense(expense(10.0, "food", "2026-08-01")).unwrap();
        store.add_expense(expense(20.0, "transport", "2026-08-28")).unwrap();
        store.add_expense(expense(30.0, "food", "2026-07-15")).unwrap();

        assert_eq!(store.expenses_on("2026-08-28").len(), 1);
        assert_eq!(store.expenses_in_month("2026-08").len(), 2);
        assert_eq!(store.expenses_in_month("2026-07").len(), 1);
    }

    #[test]
    fn missing_file_starts_empty_and_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("fresh.json")).unwrap();
        assert!(store.expenses_on("2026-08-28").is_empty());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{broken").unwrap();
        assert!(Store::open(&bad).is_err());
    }
}
