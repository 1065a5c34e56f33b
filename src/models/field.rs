//! Catalog of statement fields
//!
//! The statement form has a fixed set of fields in a fixed order. That order
//! drives the on-screen form, every exported document, and the positional CSV
//! layout.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four blocks of a cash flow statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    BeginningBalance,
    Receipts,
    Disbursements,
    EndingBalance,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::BeginningBalance,
        Section::Receipts,
        Section::Disbursements,
        Section::EndingBalance,
    ];

    /// Heading printed above the section
    pub fn title(&self) -> &'static str {
        match self {
            Section::BeginningBalance => "BEGINNING BALANCE",
            Section::Receipts => "CASH RECEIPTS",
            Section::Disbursements => "CASH DISBURSEMENTS",
            Section::EndingBalance => "ENDING BALANCE",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// An input field on the statement form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    // Beginning balance
    BeginningBank,
    BeginningOnHand,

    // Receipts
    MonthlyDues,
    DuesArrears,
    WaterCollections,
    GarbageFees,
    ClubhouseRental,
    CarStickers,
    Penalties,
    InterestIncome,
    Donations,
    OtherReceipts,

    // Disbursements
    Security,
    Janitorial,
    Electricity,
    Water,
    GarbageCollection,
    RepairsMaintenance,
    Salaries,
    OfficeSupplies,
    BankCharges,
    PermitsLicenses,
    Miscellaneous,

    // Ending balance; bank is derived from the totals
    EndingOnHand,
}

impl FieldId {
    /// Every field, in form and document order
    pub const ALL: [FieldId; 24] = [
        FieldId::BeginningBank,
        FieldId::BeginningOnHand,
        FieldId::MonthlyDues,
        FieldId::DuesArrears,
        FieldId::WaterCollections,
        FieldId::GarbageFees,
        FieldId::ClubhouseRental,
        FieldId::CarStickers,
        FieldId::Penalties,
        FieldId::InterestIncome,
        FieldId::Donations,
        FieldId::OtherReceipts,
        FieldId::Security,
        FieldId::Janitorial,
        FieldId::Electricity,
        FieldId::Water,
        FieldId::GarbageCollection,
        FieldId::RepairsMaintenance,
        FieldId::Salaries,
        FieldId::OfficeSupplies,
        FieldId::BankCharges,
        FieldId::PermitsLicenses,
        FieldId::Miscellaneous,
        FieldId::EndingOnHand,
    ];

    pub fn section(&self) -> Section {
        match self {
            FieldId::BeginningBank | FieldId::BeginningOnHand => Section::BeginningBalance,
            FieldId::MonthlyDues
            | FieldId::DuesArrears
            | FieldId::WaterCollections
            | FieldId::GarbageFees
            | FieldId::ClubhouseRental
            | FieldId::CarStickers
            | FieldId::Penalties
            | FieldId::InterestIncome
            | FieldId::Donations
            | FieldId::OtherReceipts => Section::Receipts,
            FieldId::Security
            | FieldId::Janitorial
            | FieldId::Electricity
            | FieldId::Water
            | FieldId::GarbageCollection
            | FieldId::RepairsMaintenance
            | FieldId::Salaries
            | FieldId::OfficeSupplies
            | FieldId::BankCharges
            | FieldId::PermitsLicenses
            | FieldId::Miscellaneous => Section::Disbursements,
            FieldId::EndingOnHand => Section::EndingBalance,
        }
    }

    /// Printed label
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::BeginningBank => "Cash in Bank",
            FieldId::BeginningOnHand => "Cash on Hand",
            FieldId::MonthlyDues => "Monthly Dues",
            FieldId::DuesArrears => "Dues Arrears",
            FieldId::WaterCollections => "Water Bill Collections",
            FieldId::GarbageFees => "Garbage Collection Fees",
            FieldId::ClubhouseRental => "Clubhouse Rental",
            FieldId::CarStickers => "Car Sticker Sales",
            FieldId::Penalties => "Penalties and Surcharges",
            FieldId::InterestIncome => "Interest Income",
            FieldId::Donations => "Donations",
            FieldId::OtherReceipts => "Other Receipts",
            FieldId::Security => "Security Services",
            FieldId::Janitorial => "Janitorial Services",
            FieldId::Electricity => "Electricity",
            FieldId::Water => "Water",
            FieldId::GarbageCollection => "Garbage Collection",
            FieldId::RepairsMaintenance => "Repairs and Maintenance",
            FieldId::Salaries => "Salaries and Wages",
            FieldId::OfficeSupplies => "Office Supplies",
            FieldId::BankCharges => "Bank Charges",
            FieldId::PermitsLicenses => "Permits and Licenses",
            FieldId::Miscellaneous => "Miscellaneous",
            FieldId::EndingOnHand => "Cash on Hand",
        }
    }

    /// Stable identifier used on the command line
    pub fn key(&self) -> &'static str {
        match self {
            FieldId::BeginningBank => "beginning_bank",
            FieldId::BeginningOnHand => "beginning_on_hand",
            FieldId::MonthlyDues => "monthly_dues",
            FieldId::DuesArrears => "dues_arrears",
            FieldId::WaterCollections => "water_collections",
            FieldId::GarbageFees => "garbage_fees",
            FieldId::ClubhouseRental => "clubhouse_rental",
            FieldId::CarStickers => "car_stickers",
            FieldId::Penalties => "penalties",
            FieldId::InterestIncome => "interest_income",
            FieldId::Donations => "donations",
            FieldId::OtherReceipts => "other_receipts",
            FieldId::Security => "security",
            FieldId::Janitorial => "janitorial",
            FieldId::Electricity => "electricity",
            FieldId::Water => "water",
            FieldId::GarbageCollection => "garbage_collection",
            FieldId::RepairsMaintenance => "repairs_maintenance",
            FieldId::Salaries => "salaries",
            FieldId::OfficeSupplies => "office_supplies",
            FieldId::BankCharges => "bank_charges",
            FieldId::PermitsLicenses => "permits_licenses",
            FieldId::Miscellaneous => "miscellaneous",
            FieldId::EndingOnHand => "ending_on_hand",
        }
    }

    /// Look up a field by its key (case-insensitive, `-` accepted for `_`)
    pub fn from_key(key: &str) -> Option<FieldId> {
        let normalized = key.trim().to_lowercase().replace('-', "_");
        Self::ALL.iter().copied().find(|f| f.key() == normalized)
    }

    /// Fields of one section, in order
    pub fn in_section(section: Section) -> impl Iterator<Item = FieldId> {
        Self::ALL.into_iter().filter(move |f| f.section() == section)
    }

    /// Position in [`FieldId::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|f| f == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
