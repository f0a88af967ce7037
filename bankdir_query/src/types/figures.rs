use serde::{Deserialize, Serialize};

/// Column names of the monetary fields, in balance-sheet display order.
pub const FINANCIAL_FIELDS: [&str; 15] = [
    "total_assets",
    "net_loans",
    "total_loans",
    "cash_due",
    "securities",
    "total_investments",
    "fed_funds_sold",
    "all_other_assets",
    "capital_stock",
    "surplus",
    "undivided_profits",
    "retained_earnings",
    "total_deposits",
    "shares",
    "net_income",
];

/// Monetary figures for one snapshot, in thousands of dollars.
/// `None` means the institution did not report the figure.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Financials {
    pub total_assets: Option<i64>,
    pub net_loans: Option<i64>,
    pub total_loans: Option<i64>,
    pub cash_due: Option<i64>,
    pub securities: Option<i64>,
    pub total_investments: Option<i64>,
    pub fed_funds_sold: Option<i64>,
    pub all_other_assets: Option<i64>,
    pub capital_stock: Option<i64>,
    pub surplus: Option<i64>,
    pub undivided_profits: Option<i64>,
    pub retained_earnings: Option<i64>,
    pub total_deposits: Option<i64>,
    pub shares: Option<i64>,
    pub net_income: Option<i64>,
}

impl Financials {
    /// Field name and value pairs in [`FINANCIAL_FIELDS`] order.
    pub fn entries(&self) -> [(&'static str, Option<i64>); 15] {
        [
            ("total_assets", self.total_assets),
            ("net_loans", self.net_loans),
            ("total_loans", self.total_loans),
            ("cash_due", self.cash_due),
            ("securities", self.securities),
            ("total_investments", self.total_investments),
            ("fed_funds_sold", self.fed_funds_sold),
            ("all_other_assets", self.all_other_assets),
            ("capital_stock", self.capital_stock),
            ("surplus", self.surplus),
            ("undivided_profits", self.undivided_profits),
            ("retained_earnings", self.retained_earnings),
            ("total_deposits", self.total_deposits),
            ("shares", self.shares),
            ("net_income", self.net_income),
        ]
    }
}
