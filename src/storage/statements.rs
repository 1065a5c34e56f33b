//! Statement repository
//!
//! Each month is stored as its own JSON file named after the period
//! (`2025-01.json`), so statements can be copied or restored individually.

use std::fs;
use std::path::PathBuf;

use super::file_io::{read_json_required, write_json_atomic};
use crate::error::{CashflowError, CashflowResult};
use crate::models::{CashFlowStatement, ReportPeriod};

/// Repository for persisting statements
pub struct StatementRepository {
    dir: PathBuf,
}

impl StatementRepository {
    /// Create a repository rooted at a directory
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, period: &ReportPeriod) -> PathBuf {
        self.dir.join(format!("{}.json", period))
    }

    /// Whether a statement exists for a period
    pub fn exists(&self, period: &ReportPeriod) -> bool {
        self.path_for(period).exists()
    }

    /// Load a statement if one has been saved
    pub fn load(&self, period: &ReportPeriod) -> CashflowResult<Option<CashFlowStatement>> {
        let path = self.path_for(period);
        if !path.exists() {
            return Ok(None);
        }

        let statement: CashFlowStatement = read_json_required(&path)?;
        if statement.period != *period {
            return Err(CashflowError::Storage(format!(
                "{} holds the statement for {}, expected {}",
                path.display(),
                statement.period,
                period
            )));
        }
        Ok(Some(statement))
    }

    /// Load a statement, failing if it does not exist
    pub fn get(&self, period: &ReportPeriod) -> CashflowResult<CashFlowStatement> {
        self.load(period)?
            .ok_or_else(|| CashflowError::statement_not_found(period.to_string()))
    }

    /// Save a statement, replacing any previous version for the same period
    pub fn save(&self, statement: &CashFlowStatement) -> CashflowResult<()> {
        write_json_atomic(self.path_for(&statement.period), statement)?;
        tracing::info!(period = %statement.period, "statement saved");
        Ok(())
    }

    /// Delete the statement for a period
    pub fn delete(&self, period: &ReportPeriod) -> CashflowResult<()> {
        let path = self.path_for(period);
        if !path.exists() {
            return Err(CashflowError::statement_not_found(period.to_string()));
        }
        fs::remove_file(&path).map_err(|e| {
            CashflowError::Storage(format!("Failed to delete {}: {}", path.display(), e))
        })?;
        tracing::info!(period = %period, "statement deleted");
        Ok(())
    }

    /// All stored periods, oldest first
    pub fn list(&self) -> CashflowResult<Vec<ReportPeriod>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            CashflowError::Storage(format!("Failed to read {}: {}", self.dir.display(), e))
        })?;

        let mut periods = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match ReportPeriod::parse(stem) {
                Ok(period) => periods.push(period),
                Err(_) => tracing::warn!(file = %path.display(), "ignoring unexpected file"),
            }
        }

        periods.sort();
        Ok(periods)
    }

    /// Most recent statement strictly before a period
    pub fn latest_before(
        &self,
        period: &ReportPeriod,
    ) -> CashflowResult<Option<CashFlowStatement>> {
        let previous = self.list()?.into_iter().filter(|p| p < period).next_back();

        match previous {
            Some(p) => self.load(&p),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldId, Money};
    use tempfile::TempDir;

    fn repo() -> (TempDir, StatementRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = StatementRepository::new(temp_dir.path().join("statements"));
        (temp_dir, repo)
    }

    fn period(month: u32) -> ReportPeriod {
        ReportPeriod::new(2025, month).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, repo) = repo();

        let mut statement = CashFlowStatement::new(period(3));
        statement
            .set(FieldId::MonthlyDues, Money::from_cents(450_000))
            .unwrap();
        repo.save(&statement).unwrap();

        assert!(repo.exists(&period(3)));
        let loaded = repo.get(&period(3)).unwrap();
        assert_eq!(loaded.get(FieldId::MonthlyDues).cents(), 450_000);
    }

    #[test]
    fn test_missing_statement() {
        let (_temp_dir, repo) = repo();

        assert!(repo.load(&period(1)).unwrap().is_none());
        assert!(repo.get(&period(1)).unwrap_err().is_not_found());
        assert!(repo.delete(&period(1)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_sorted_and_skips_strays() {
        let (temp_dir, repo) = repo();

        for m in [5, 1, 3] {
            repo.save(&CashFlowStatement::new(period(m))).unwrap();
        }
        fs::write(temp_dir.path().join("statements").join("notes.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("statements").join("2025-02.txt"), "").unwrap();

        assert_eq!(repo.list().unwrap(), vec![period(1), period(3), period(5)]);
    }

    #[test]
    fn test_latest_before() {
        let (_temp_dir, repo) = repo();

        repo.save(&CashFlowStatement::new(period(1))).unwrap();
        repo.save(&CashFlowStatement::new(period(3))).unwrap();

        assert_eq!(
            repo.latest_before(&period(5)).unwrap().map(|s| s.period),
            Some(period(3))
        );
        assert_eq!(
            repo.latest_before(&period(3)).unwrap().map(|s| s.period),
            Some(period(1))
        );
        assert!(repo.latest_before(&period(1)).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = repo();

        repo.save(&CashFlowStatement::new(period(2))).unwrap();
        repo.delete(&period(2)).unwrap();
        assert!(!repo.exists(&period(2)));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_file_is_rejected() {
        let (temp_dir, repo) = repo();

        repo.save(&CashFlowStatement::new(period(1))).unwrap();
        let dir = temp_dir.path().join("statements");
        fs::rename(dir.join("2025-01.json"), dir.join("2025-02.json")).unwrap();

        assert!(repo.load(&period(2)).is_err());
    }
}
