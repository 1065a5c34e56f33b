//! Statement service
//!
//! Provides business logic for statements: opening a month (with the
//! beginning balance carried forward), editing fields, and listing totals.

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::Settings;
use crate::error::{CashflowError, CashflowResult};
use crate::models::{CashFlowStatement, FieldId, Money, ReportPeriod, StatementTotals};
use crate::storage::Storage;

/// Service for statement management
pub struct StatementService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// A stored statement with its computed totals
#[derive(Debug, Clone)]
pub struct StatementSummary {
    pub period: ReportPeriod,
    pub totals: StatementTotals,
    pub updated_at: DateTime<Utc>,
}

impl<'a> StatementService<'a> {
    /// Create a new statement service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Load the statement for a period, or start a new unsaved one
    ///
    /// A new statement takes its beginning balance from the closest earlier
    /// statement when carry-forward is enabled.
    pub fn open(&self, period: ReportPeriod) -> CashflowResult<CashFlowStatement> {
        if let Some(existing) = self.storage.statements.load(&period)? {
            return Ok(existing);
        }

        let mut statement = CashFlowStatement::new(period);
        if self.settings.carry_forward {
            if let Some(previous) = self.storage.statements.latest_before(&period)? {
                tracing::debug!(from = %previous.period, to = %period, "carrying balance forward");
                statement.carry_forward_from(&previous);
            }
        }
        Ok(statement)
    }

    /// Create and save a new statement
    pub fn create(&self, period: ReportPeriod) -> CashflowResult<CashFlowStatement> {
        if self.storage.statements.exists(&period) {
            return Err(CashflowError::statement_exists(period.to_string()));
        }
        let statement = self.open(period)?;
        self.storage.statements.save(&statement)?;
        Ok(statement)
    }

    /// Load a saved statement
    pub fn get(&self, period: ReportPeriod) -> CashflowResult<CashFlowStatement> {
        self.storage.statements.get(&period)
    }

    /// Save a statement
    pub fn save(&self, statement: &CashFlowStatement) -> CashflowResult<()> {
        for warning in statement.validate() {
            tracing::warn!(period = %statement.period, "{}", warning);
        }
        self.storage.statements.save(statement)
    }

    /// Set several fields at once, creating the statement if needed
    pub fn set_fields(
        &self,
        period: ReportPeriod,
        values: &[(FieldId, Money)],
    ) -> CashflowResult<CashFlowStatement> {
        let mut statement = self.open(period)?;
        for (field, amount) in values {
            statement.set(*field, *amount)?;
        }
        self.save(&statement)?;
        Ok(statement)
    }

    /// Change the date printed on the report
    pub fn set_prepared_on(
        &self,
        period: ReportPeriod,
        date: NaiveDate,
    ) -> CashflowResult<CashFlowStatement> {
        let mut statement = self.open(period)?;
        statement.prepared_on = date;
        self.save(&statement)?;
        Ok(statement)
    }

    /// Replace the notes printed under the table
    pub fn set_notes(&self, period: ReportPeriod, notes: &str) -> CashflowResult<CashFlowStatement> {
        let mut statement = self.open(period)?;
        statement.notes = notes.trim().to_string();
        self.save(&statement)?;
        Ok(statement)
    }

    /// Reset every amount of a saved statement to zero
    pub fn clear(&self, period: ReportPeriod) -> CashflowResult<CashFlowStatement> {
        let mut statement = self.get(period)?;
        statement.clear();
        self.save(&statement)?;
        Ok(statement)
    }

    /// Delete a saved statement
    pub fn delete(&self, period: ReportPeriod) -> CashflowResult<()> {
        self.storage.statements.delete(&period)
    }

    /// Store an externally produced statement (e.g. a CSV import)
    pub fn import(&self, statement: CashFlowStatement, overwrite: bool) -> CashflowResult<()> {
        if !overwrite && self.storage.statements.exists(&statement.period) {
            return Err(CashflowError::statement_exists(statement.period.to_string()));
        }
        self.save(&statement)
    }

    /// All saved statements with their totals, oldest first
    pub fn list(&self) -> CashflowResult<Vec<StatementSummary>> {
        self.storage
            .statements
            .list()?
            .into_iter()
            .map(|period| {
                let statement = self.storage.statements.get(&period)?;
                Ok(StatementSummary {
                    period,
                    totals: statement.totals(),
                    updated_at: statement.updated_at,
                })
            })
            .collect()
    }
}

/// Parse a `field=amount` pair as given on the command line
pub fn parse_assignment(input: &str) -> CashflowResult<(FieldId, Money)> {
    let (key, value) = input.split_once('=').ok_or_else(|| {
        CashflowError::Validation(format!("Expected field=amount, got '{}'", input))
    })?;

    let field =
        FieldId::from_key(key).ok_or_else(|| CashflowError::field_not_found(key.trim()))?;
    let amount = Money::parse(value)
        .map_err(|e| CashflowError::Validation(format!("{}: {}", field.key(), e)))?;

    Ok((field, amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CashflowPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashflowPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn period(month: u32) -> ReportPeriod {
        ReportPeriod::new(2025, month).unwrap()
    }

    #[test]
    fn test_open_does_not_persist() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = StatementService::new(&storage, &settings);

        let statement = service.open(period(1)).unwrap();
        assert!(statement.is_empty());
        assert!(!storage.statements.exists(&period(1)));
    }

    #[test]
    fn test_create_rejects_duplicate() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = StatementService::new(&storage, &settings);

        service.create(period(1)).unwrap();
        let err = service.create(period(1)).unwrap_err();
        assert!(matches!(err, CashflowError::Duplicate { .. }));
    }

    #[test]
    fn test_carry_forward_on_open() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = StatementService::new(&storage, &settings);

        service
            .set_fields(
                period(1),
                &[
                    (FieldId::BeginningBank, Money::from_cents(100_000)),
                    (FieldId::MonthlyDues, Money::from_cents(40_000)),
                    (FieldId::Security, Money::from_cents(15_000)),
                    (FieldId::EndingOnHand, Money::from_cents(5_000)),
                ],
            )
            .unwrap();

        // A gap month is skipped: March carries from January
        let march = service.open(period(3)).unwrap();
        assert_eq!(march.get(FieldId::BeginningBank).cents(), 120_000);
        assert_eq!(march.get(FieldId::BeginningOnHand).cents(), 5_000);
    }

    #[test]
    fn test_carry_forward_disabled() {
        let (_temp_dir, storage) = create_test_storage();
        let mut settings = Settings::default();
        settings.carry_forward = false;
        let service = StatementService::new(&storage, &settings);

        service
            .set_fields(period(1), &[(FieldId::BeginningBank, Money::from_cents(100))])
            .unwrap();
        assert!(service.open(period(2)).unwrap().is_empty());
    }

    #[test]
    fn test_set_fields_validates() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = StatementService::new(&storage, &settings);

        let err = service
            .set_fields(period(1), &[(FieldId::Water, Money::from_cents(-100))])
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!storage.statements.exists(&period(1)));
    }

    #[test]
    fn test_notes_date_clear_and_list() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = StatementService::new(&storage, &settings);

        service
            .set_fields(period(2), &[(FieldId::Donations, Money::from_cents(9_900))])
            .unwrap();
        service.set_notes(period(2), "  Audited  ").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        service.set_prepared_on(period(2), date).unwrap();

        let saved = service.get(period(2)).unwrap();
        assert_eq!(saved.notes, "Audited");
        assert_eq!(saved.prepared_on, date);

        let summaries = service.list().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].totals.total_receipts.cents(), 9_900);

        let cleared = service.clear(period(2)).unwrap();
        assert!(cleared.is_empty());
        assert_eq!(cleared.notes, "Audited");
    }

    #[test]
    fn test_import_respects_overwrite() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = StatementService::new(&storage, &settings);

        service.create(period(4)).unwrap();
        let incoming = CashFlowStatement::new(period(4));
        assert!(service.import(incoming.clone(), false).is_err());
        service.import(incoming, true).unwrap();
    }

    #[test]
    fn test_parse_assignment() {
        let (field, amount) = parse_assignment("monthly_dues=12,500.00").unwrap();
        assert_eq!(field, FieldId::MonthlyDues);
        assert_eq!(amount.cents(), 1_250_000);

        assert!(parse_assignment("monthly_dues").is_err());
        assert!(parse_assignment("rent=100").unwrap_err().is_not_found());
        assert!(parse_assignment("water=1.234").unwrap_err().is_validation());
    }
}
