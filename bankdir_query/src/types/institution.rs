//! Institution classification: charter type and total-asset size bucket.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Charter type of an institution, keyed by the reference-table code.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionType {
    Bank,
    CreditUnion,
    SavingsLoan,
}

impl InstitutionType {
    pub const ALL: [InstitutionType; 3] = [
        InstitutionType::Bank,
        InstitutionType::CreditUnion,
        InstitutionType::SavingsLoan,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            InstitutionType::Bank => "bank",
            InstitutionType::CreditUnion => "credit_union",
            InstitutionType::SavingsLoan => "savings_loan",
        }
    }

    /// Plural label used on filter pills.
    pub fn plural_label(&self) -> &'static str {
        match self {
            InstitutionType::Bank => "Banks",
            InstitutionType::CreditUnion => "Credit Unions",
            InstitutionType::SavingsLoan => "Savings & Loans",
        }
    }

    /// Detail page slug for this type. Unknown codes route to the bank page.
    pub fn detail_page(code: &str) -> &'static str {
        match code {
            "credit_union" => "credit-union",
            "savings_loan" => "savings-and-loan",
            _ => "bank",
        }
    }
}

impl std::fmt::Display for InstitutionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for InstitutionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank" => Ok(InstitutionType::Bank),
            "credit_union" => Ok(InstitutionType::CreditUnion),
            "savings_loan" => Ok(InstitutionType::SavingsLoan),
            _ => Err(Error::UnknownInstitutionType(s.to_string())),
        }
    }
}

/// Total-asset bucket, in thousands of dollars. Buckets are half-open and
/// together partition the non-negative domain. A negative total is treated
/// as unreported, like a null one: it belongs to no bucket.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRange {
    #[serde(rename = "under50")]
    Under50M,
    #[serde(rename = "50-100")]
    From50Mto100M,
    #[serde(rename = "100-500")]
    From100Mto500M,
    #[serde(rename = "500-1000")]
    From500Mto1B,
    #[serde(rename = "over1000")]
    Over1B,
}

impl AssetRange {
    pub const ALL: [AssetRange; 5] = [
        AssetRange::Under50M,
        AssetRange::From50Mto100M,
        AssetRange::From100Mto500M,
        AssetRange::From500Mto1B,
        AssetRange::Over1B,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AssetRange::Under50M => "under50",
            AssetRange::From50Mto100M => "50-100",
            AssetRange::From100Mto500M => "100-500",
            AssetRange::From500Mto1B => "500-1000",
            AssetRange::Over1B => "over1000",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetRange::Under50M => "Under $50M",
            AssetRange::From50Mto100M => "$50M - $100M",
            AssetRange::From100Mto500M => "$100M - $500M",
            AssetRange::From500Mto1B => "$500M - $1B",
            AssetRange::Over1B => "Over $1B",
        }
    }

    /// Inclusive lower and exclusive upper bound; `None` means unbounded.
    pub fn bounds(&self) -> (i64, Option<i64>) {
        match self {
            AssetRange::Under50M => (0, Some(50_000)),
            AssetRange::From50Mto100M => (50_000, Some(100_000)),
            AssetRange::From100Mto500M => (100_000, Some(500_000)),
            AssetRange::From500Mto1B => (500_000, Some(1_000_000)),
            AssetRange::Over1B => (1_000_000, None),
        }
    }

    pub fn contains(&self, total_assets: i64) -> bool {
        let (min, max) = self.bounds();
        total_assets >= min && max.map_or(true, |max| total_assets < max)
    }

    /// Bucket for a reported total; negative totals count as unreported.
    pub fn for_total_assets(total_assets: i64) -> Option<AssetRange> {
        Self::ALL.into_iter().find(|r| r.contains(total_assets))
    }
}

impl std::fmt::Display for AssetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for AssetRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.code() == s)
            .ok_or_else(|| Error::UnknownAssetRange(s.to_string()))
    }
}
