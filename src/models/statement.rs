//! Cash flow statement model
//!
//! A statement holds the amounts entered for one month. Totals are never
//! stored; they are recomputed from the amounts on every read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::field::{FieldId, Section};
use super::money::Money;
use super::period::ReportPeriod;
use crate::error::{CashflowError, CashflowResult};

/// The monthly cash flow statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub period: ReportPeriod,

    /// Date printed on the report
    pub prepared_on: NaiveDate,

    /// Entered amounts; a missing field reads as zero
    #[serde(default, deserialize_with = "deserialize_amounts")]
    amounts: BTreeMap<FieldId, Money>,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Computed totals for a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTotals {
    pub beginning_bank: Money,
    pub beginning_on_hand: Money,
    pub beginning_total: Money,
    pub total_receipts: Money,
    pub total_disbursements: Money,
    pub net_change: Money,
    pub ending_total: Money,
    pub ending_on_hand: Money,
    pub ending_bank: Money,
}

impl CashFlowStatement {
    /// Create an empty statement for a period, prepared on the period's last day
    pub fn new(period: ReportPeriod) -> Self {
        let now = Utc::now();
        Self {
            period,
            prepared_on: period.end_date(),
            amounts: BTreeMap::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount entered for a field
    pub fn get(&self, field: FieldId) -> Money {
        self.amounts.get(&field).copied().unwrap_or_default()
    }

    /// Set the amount of a field
    ///
    /// Every field on the form is a non-negative quantity; outflows are
    /// entered as positive amounts and subtracted by the totals.
    pub fn set(&mut self, field: FieldId, amount: Money) -> CashflowResult<()> {
        check_amount(field, amount)?;

        if amount.is_zero() {
            self.amounts.remove(&field);
        } else {
            self.amounts.insert(field, amount);
        }
        self.touch();
        Ok(())
    }

    /// Reset every amount to zero
    pub fn clear(&mut self) {
        self.amounts.clear();
        self.touch();
    }

    /// Whether any amount has been entered
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Fields and amounts in form order, zeros included
    pub fn entries(&self) -> impl Iterator<Item = (FieldId, Money)> + '_ {
        FieldId::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Sum of the fields in one section
    pub fn section_total(&self, section: Section) -> Money {
        FieldId::in_section(section).map(|f| self.get(f)).sum()
    }

    /// Seed this statement's beginning balance from a previous ending balance
    pub fn carry_forward_from(&mut self, previous: &CashFlowStatement) {
        let totals = previous.totals();
        // A negative derived bank balance carries over as zero
        let bank = if totals.ending_bank.is_negative() {
            Money::zero()
        } else {
            totals.ending_bank
        };
        let on_hand = totals.ending_on_hand;

        for (field, amount) in [
            (FieldId::BeginningBank, bank),
            (FieldId::BeginningOnHand, on_hand),
        ] {
            if let Err(e) = self.set(field, amount) {
                tracing::warn!(
                    from = %previous.period,
                    to = %self.period,
                    field = field.key(),
                    "balance not carried forward: {}",
                    e
                );
            }
        }
    }

    /// Compute totals
    ///
    /// ending = beginning + receipts - disbursements; the bank share of the
    /// ending balance is whatever is not counted as cash on hand.
    pub fn totals(&self) -> StatementTotals {
        let beginning_bank = self.get(FieldId::BeginningBank);
        let beginning_on_hand = self.get(FieldId::BeginningOnHand);
        let beginning_total = beginning_bank + beginning_on_hand;

        let total_receipts = self.section_total(Section::Receipts);
        let total_disbursements = self.section_total(Section::Disbursements);
        let net_change = total_receipts - total_disbursements;

        let ending_total = beginning_total + net_change;
        let ending_on_hand = self.get(FieldId::EndingOnHand);

        StatementTotals {
            beginning_bank,
            beginning_on_hand,
            beginning_total,
            total_receipts,
            total_disbursements,
            net_change,
            ending_total,
            ending_on_hand,
            ending_bank: ending_total - ending_on_hand,
        }
    }

    /// Consistency warnings; none of these block saving or exporting
    pub fn validate(&self) -> Vec<String> {
        let totals = self.totals();
        let mut warnings = Vec::new();

        if self.is_empty() {
            warnings.push("No amounts have been entered".to_string());
        }
        if totals.ending_total.is_negative() {
            warnings.push(format!(
                "Ending balance is negative ({})",
                totals.ending_total.format_grouped()
            ));
        }
        if totals.ending_bank.is_negative() && !totals.ending_total.is_negative() {
            warnings.push(format!(
                "Cash on hand ({}) exceeds the ending balance ({})",
                totals.ending_on_hand.format_grouped(),
                totals.ending_total.format_grouped()
            ));
        }
        if self.prepared_on < self.period.start_date() {
            warnings.push(format!(
                "Prepared-on date {} is before the period starts",
                self.prepared_on
            ));
        }

        warnings
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Reject an amount no form field can hold
fn check_amount(field: FieldId, amount: Money) -> CashflowResult<()> {
    if amount.is_negative() {
        return Err(CashflowError::Validation(format!(
            "{} cannot be negative ({})",
            field.label(),
            amount.format_grouped()
        )));
    }
    if amount > Money::MAX {
        return Err(CashflowError::Validation(format!(
            "{} exceeds the largest accepted amount ({})",
            field.label(),
            Money::MAX.format_grouped()
        )));
    }
    Ok(())
}

/// Amounts read from disk or an import obey the same rules as `set`
fn deserialize_amounts<'de, D>(deserializer: D) -> Result<BTreeMap<FieldId, Money>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut amounts = BTreeMap::<FieldId, Money>::deserialize(deserializer)?;
    for (field, amount) in &amounts {
        check_amount(*field, *amount).map_err(serde::de::Error::custom)?;
    }
    amounts.retain(|_, amount| !amount.is_zero());
    Ok(amounts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> ReportPeriod {
        ReportPeriod::new(2025, 1).unwrap()
    }

    fn sample() -> CashFlowStatement {
        let mut s = CashFlowStatement::new(period());
        s.set(FieldId::BeginningBank, Money::from_cents(5_000_000)).unwrap();
        s.set(FieldId::BeginningOnHand, Money::from_cents(250_000)).unwrap();
        s.set(FieldId::MonthlyDues, Money::from_cents(1_200_000)).unwrap();
        s.set(FieldId::CarStickers, Money::from_cents(30_000)).unwrap();
        s.set(FieldId::Security, Money::from_cents(600_000)).unwrap();
        s.set(FieldId::Electricity, Money::from_cents(125_050)).unwrap();
        s.set(FieldId::EndingOnHand, Money::from_cents(100_000)).unwrap();
        s
    }

    #[test]
    fn test_new_statement_defaults() {
        let s = CashFlowStatement::new(period());
        assert!(s.is_empty());
        assert_eq!(s.prepared_on, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(s.get(FieldId::MonthlyDues), Money::zero());
        assert_eq!(s.entries().count(), FieldId::ALL.len());
    }

    #[test]
    fn test_totals() {
        let t = sample().totals();
        assert_eq!(t.beginning_total.cents(), 5_250_000);
        assert_eq!(t.total_receipts.cents(), 1_230_000);
        assert_eq!(t.total_disbursements.cents(), 725_050);
        assert_eq!(t.net_change.cents(), 504_950);
        assert_eq!(t.ending_total.cents(), 5_754_950);
        assert_eq!(t.ending_on_hand.cents(), 100_000);
        assert_eq!(t.ending_bank.cents(), 5_654_950);
    }

    #[test]
    fn test_ending_identity_holds() {
        let t = sample().totals();
        assert_eq!(
            t.ending_total,
            t.beginning_total + t.total_receipts - t.total_disbursements
        );
        assert_eq!(t.ending_total, t.ending_bank + t.ending_on_hand);
    }

    #[test]
    fn test_set_rejects_negative() {
        let mut s = CashFlowStatement::new(period());
        let err = s.set(FieldId::Water, Money::from_cents(-1)).unwrap_err();
        assert!(err.is_validation());
        assert!(s.is_empty());
    }

    #[test]
    fn test_set_rejects_amount_above_max() {
        let mut s = CashFlowStatement::new(period());
        s.set(FieldId::Water, Money::MAX).unwrap();
        let err = s
            .set(FieldId::Water, Money::from_cents(Money::MAX.cents() + 1))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(s.get(FieldId::Water), Money::MAX);
    }

    #[test]
    fn test_totals_at_max_do_not_overflow() {
        let mut s = CashFlowStatement::new(period());
        for field in FieldId::ALL {
            s.set(field, Money::MAX).unwrap();
        }
        let t = s.totals();
        let receipts = FieldId::in_section(Section::Receipts).count() as i64;
        assert_eq!(t.total_receipts.cents(), Money::MAX.cents() * receipts);
        assert_eq!(
            t.ending_total,
            t.beginning_total + t.total_receipts - t.total_disbursements
        );
    }

    #[test]
    fn test_set_zero_removes_entry() {
        let mut s = sample();
        s.set(FieldId::CarStickers, Money::zero()).unwrap();
        assert_eq!(s.get(FieldId::CarStickers), Money::zero());
        assert_eq!(s.totals().total_receipts.cents(), 1_200_000);
    }

    #[test]
    fn test_carry_forward() {
        let previous = sample();
        let mut next = CashFlowStatement::new(period().next());
        next.carry_forward_from(&previous);

        assert_eq!(next.get(FieldId::BeginningBank).cents(), 5_654_950);
        assert_eq!(next.get(FieldId::BeginningOnHand).cents(), 100_000);
        assert_eq!(next.totals().beginning_total, previous.totals().ending_total);
    }

    #[test]
    fn test_carry_forward_skips_invalid_balance() {
        // A statement stored before amounts were validated on load
        let mut previous = CashFlowStatement::new(period());
        previous
            .set(FieldId::BeginningBank, Money::from_cents(1_000))
            .unwrap();
        previous
            .amounts
            .insert(FieldId::EndingOnHand, Money::from_cents(-300));

        let mut next = CashFlowStatement::new(period().next());
        next.carry_forward_from(&previous);

        assert_eq!(next.get(FieldId::BeginningBank).cents(), 1_300);
        assert_eq!(next.get(FieldId::BeginningOnHand), Money::zero());
    }

    #[test]
    fn test_validate_warnings() {
        assert!(!CashFlowStatement::new(period()).validate().is_empty());
        assert!(sample().validate().is_empty());

        let mut overdrawn = CashFlowStatement::new(period());
        overdrawn.set(FieldId::Salaries, Money::from_cents(1000)).unwrap();
        let warnings = overdrawn.validate();
        assert!(warnings.iter().any(|w| w.contains("negative")));

        let mut too_much_cash = CashFlowStatement::new(period());
        too_much_cash
            .set(FieldId::BeginningBank, Money::from_cents(1000))
            .unwrap();
        too_much_cash
            .set(FieldId::EndingOnHand, Money::from_cents(5000))
            .unwrap();
        let warnings = too_much_cash.validate();
        assert!(warnings.iter().any(|w| w.contains("exceeds")));
    }

    #[test]
    fn test_serde_round_trip_keeps_amounts() {
        let s = sample();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"monthly_dues\":1200000"));
        let back: CashFlowStatement = serde_json::from_str(&json).unwrap();
        assert_eq!(back.totals(), s.totals());
    }

    #[test]
    fn test_deserialize_rejects_invalid_amounts() {
        let json = serde_json::to_string(&sample()).unwrap();

        let negative = json.replace("\"monthly_dues\":1200000", "\"monthly_dues\":-1200000");
        let err = serde_json::from_str::<CashFlowStatement>(&negative).unwrap_err();
        assert!(err.to_string().contains("Monthly Dues cannot be negative"));

        let huge = json.replace(
            "\"monthly_dues\":1200000",
            "\"monthly_dues\":9223372036854775807",
        );
        assert!(serde_json::from_str::<CashFlowStatement>(&huge).is_err());

        let zero = json.replace("\"monthly_dues\":1200000", "\"monthly_dues\":0");
        let back: CashFlowStatement = serde_json::from_str(&zero).unwrap();
        assert_eq!(back.get(FieldId::MonthlyDues), Money::zero());
        assert!(!back.amounts.contains_key(&FieldId::MonthlyDues));
    }
}
