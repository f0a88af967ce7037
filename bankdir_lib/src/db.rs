//! SQLite storage for directory snapshots.
//!
//! The store is read-only from the directory's point of view: snapshots,
//! branches and memberships are loaded by an external import. Filtered
//! queries take a [`CompiledFilter`] produced by `bankdir_query`.

use std::collections::BTreeMap;
use std::path::Path;

use bankdir_query::types::{AssetRange, Financials, Publication, Season};
use bankdir_query::{CompiledFilter, Value};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension, Row};
use serde::Serialize;

use crate::lookup::InstitutionTypeTable;

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const SCHEMA_VERSION: i32 = 1;

const BASE_FROM: &str =
    "FROM institution_main m JOIN institution_types t ON m.institution_type_id = t.id";

const SUMMARY_COLUMNS: &str = "m.id, m.pub_state, m.bank_no, m.pub_year, m.pub_season, m.name, \
     m.city, m.county, m.total_assets, t.code, t.name";

const FINANCIAL_COLUMNS: &str = "m.total_assets, m.net_loans, m.total_loans, m.cash_due, \
     m.securities, m.total_investments, m.fed_funds_sold, m.all_other_assets, m.capital_stock, \
     m.surplus, m.undivided_profits, m.retained_earnings, m.total_deposits, m.shares, m.net_income";

const OFFICER_COLUMNS: [&str; 5] = ["officer_1", "officer_2", "officer_3", "officer_4", "officer_5"];

pub struct Db {
    conn: Connection,
}

/// `fold(text)` lowercases with full Unicode case mapping; SQLite's own
/// `LIKE` only folds ASCII.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        register_functions(&conn)?;
        Ok(Self { conn })
    }

    /// Open an existing database without write access (for serving).
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        register_functions(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        register_functions(&conn)?;
        Ok(Self { conn })
    }

    /// Underlying connection, for fixture loading in tests and imports.
    #[doc(hidden)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn init(&self) -> Result<(), DbError> {
        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version < SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32, DbError> {
        Ok(self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?)
    }

    // -- publications --------------------------------------------------

    /// Distinct state codes with data, ascending.
    pub fn available_states(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT pub_state FROM institution_main ORDER BY pub_state")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Every distinct (state, publication) pair, unordered.
    pub fn state_publications(&self) -> Result<Vec<(String, Publication)>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT pub_state, pub_year, pub_season FROM institution_main",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut result = Vec::new();
        for row in rows {
            let (state, year, season) = row?;
            if let Some(publication) = publication_or_warn(year, &season) {
                result.push((state, publication));
            }
        }
        Ok(result)
    }

    /// Distinct publications for one state, unordered.
    pub fn publications_for_state(&self, state: &str) -> Result<Vec<Publication>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT pub_year, pub_season FROM institution_main WHERE pub_state = ?1",
        )?;
        let rows = stmt.query_map(params![state], |row| {
            Ok((row.get::<_, i32>(0)?, row.get::<_, String>(1)?))
        })?;
        collect_publications(rows)
    }

    /// Distinct publications one institution appears in, unordered.
    pub fn publications_for_institution(
        &self,
        state: &str,
        bank_no: &str,
    ) -> Result<Vec<Publication>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT pub_year, pub_season FROM institution_main
             WHERE pub_state = ?1 AND bank_no = ?2",
        )?;
        let rows = stmt.query_map(params![state, bank_no], |row| {
            Ok((row.get::<_, i32>(0)?, row.get::<_, String>(1)?))
        })?;
        collect_publications(rows)
    }

    // -- single institution -------------------------------------------

    /// The full snapshot row for one institution in one publication.
    pub fn institution_record(
        &self,
        state: &str,
        bank_no: &str,
        publication: Publication,
        types: &InstitutionTypeTable,
    ) -> Result<Option<InstitutionRecord>, DbError> {
        let record = self
            .conn
            .query_row(
                "SELECT m.* FROM institution_main m
                 WHERE m.pub_state = ?1 AND m.bank_no = ?2
                   AND m.pub_year = ?3 AND m.pub_season = ?4",
                params![
                    state,
                    bank_no,
                    publication.year,
                    publication.season.as_str()
                ],
                |row| read_record(row, types),
            )
            .optional()?;
        Ok(record)
    }

    /// Monetary figures for one institution in one publication.
    pub fn financials(
        &self,
        state: &str,
        bank_no: &str,
        publication: Publication,
    ) -> Result<Option<Financials>, DbError> {
        let sql = format!(
            "SELECT {} FROM institution_main m
             WHERE m.pub_state = ?1 AND m.bank_no = ?2
               AND m.pub_year = ?3 AND m.pub_season = ?4",
            FINANCIAL_COLUMNS
        );
        let financials = self
            .conn
            .query_row(
                &sql,
                params![
                    state,
                    bank_no,
                    publication.year,
                    publication.season.as_str()
                ],
                read_financials,
            )
            .optional()?;
        Ok(financials)
    }

    /// Figures for every publication of one institution, unordered.
    pub fn financial_history(
        &self,
        state: &str,
        bank_no: &str,
    ) -> Result<Vec<(Publication, Financials)>, DbError> {
        let sql = format!(
            "SELECT m.pub_year, m.pub_season, {} FROM institution_main m
             WHERE m.pub_state = ?1 AND m.bank_no = ?2",
            FINANCIAL_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![state, bank_no], |row| {
            let publication = Publication::new(row.get(0)?, read_season(row, 1)?);
            Ok((publication, read_financials_from(row, 2)?))
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Branches listed in the snapshot's city section, by city then address.
    pub fn city_branches(&self, main_id: i64) -> Result<Vec<Branch>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT NULL, address, city, state, zip, phone, manager
             FROM institution_city_branch
             WHERE main_id = ?1
             ORDER BY city, address",
        )?;
        let rows = stmt.query_map(params![main_id], read_branch)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Named branches outside the home city, by city then address.
    pub fn other_branches(&self, main_id: i64) -> Result<Vec<Branch>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT branch_name, address, city, state, zip, phone, manager
             FROM institution_other_branch
             WHERE main_id = ?1
             ORDER BY city, address",
        )?;
        let rows = stmt.query_map(params![main_id], read_branch)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Organizations a snapshot belongs to, by org name.
    pub fn memberships_for(&self, main_id: i64) -> Result<Vec<MembershipOrg>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT o.id, o.code, o.name, o.description, o.website
             FROM institution_memberships im
             JOIN membership_orgs o ON im.org_id = o.id
             WHERE im.main_id = ?1
             ORDER BY o.name",
        )?;
        let rows = stmt.query_map(params![main_id], read_org)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    // -- membership organizations -------------------------------------

    pub fn membership_org(&self, code: &str) -> Result<Option<MembershipOrg>, DbError> {
        let org = self
            .conn
            .query_row(
                "SELECT id, code, name, description, website FROM membership_orgs WHERE code = ?1",
                params![code],
                read_org,
            )
            .optional()?;
        Ok(org)
    }

    /// Code to name for the given org codes; unknown codes are absent.
    pub fn membership_org_names(
        &self,
        codes: &[String],
    ) -> Result<BTreeMap<String, String>, DbError> {
        let mut names = BTreeMap::new();
        if codes.is_empty() {
            return Ok(names);
        }
        let placeholders: Vec<String> = (1..=codes.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "SELECT code, name FROM membership_orgs WHERE code IN ({})",
            placeholders.join(",")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(codes.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (code, name) = row?;
            names.insert(code, name);
        }
        Ok(names)
    }

    /// Member institutions of one org in one state's publication, by type
    /// name then institution name.
    pub fn membership_members(
        &self,
        org_id: i64,
        state: &str,
        publication: Publication,
    ) -> Result<Vec<InstitutionSummary>, DbError> {
        let sql = format!(
            "SELECT {} {}
             JOIN institution_memberships im ON m.id = im.main_id
             WHERE im.org_id = ?1 AND m.pub_state = ?2
               AND m.pub_year = ?3 AND m.pub_season = ?4
             ORDER BY t.name, m.name",
            SUMMARY_COLUMNS, BASE_FROM
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![org_id, state, publication.year, publication.season.as_str()],
            read_summary,
        )?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    // -- filtered queries -----------------------------------------------

    /// Distinct institutions matching `filter`, by name.
    pub fn search_institutions(
        &self,
        filter: &CompiledFilter,
    ) -> Result<Vec<InstitutionSummary>, DbError> {
        let sql = format!(
            "SELECT DISTINCT {} {}{} WHERE {} ORDER BY m.name, m.pub_state, m.bank_no",
            SUMMARY_COLUMNS, BASE_FROM, filter.joins, filter.where_clause
        );
        tracing::debug!(%sql, params = filter.params.len(), "search institutions");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind(&filter.params)), read_summary)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Number of distinct institutions matching `filter`.
    pub fn count_institutions(&self, filter: &CompiledFilter) -> Result<i64, DbError> {
        let sql = format!(
            "SELECT COUNT(DISTINCT m.id) {}{} WHERE {}",
            BASE_FROM, filter.joins, filter.where_clause
        );
        tracing::debug!(%sql, params = filter.params.len(), "count institutions");
        let count = self
            .conn
            .query_row(&sql, params_from_iter(bind(&filter.params)), |row| row.get(0))?;
        Ok(count)
    }

    /// Institutions per type under `filter`, by type name.
    pub fn type_counts(&self, filter: &CompiledFilter) -> Result<Vec<TypeCount>, DbError> {
        let sql = format!(
            "SELECT t.code, t.name, COUNT(DISTINCT m.id) {}{} WHERE {}
             GROUP BY t.id, t.code, t.name
             ORDER BY t.name",
            BASE_FROM, filter.joins, filter.where_clause
        );
        tracing::debug!(%sql, params = filter.params.len(), "type counts");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind(&filter.params)), |row| {
            Ok(TypeCount {
                code: row.get(0)?,
                name: row.get(1)?,
                count: row.get(2)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Institutions per county under `filter`, by county.
    pub fn county_counts(&self, filter: &CompiledFilter) -> Result<Vec<CountyCount>, DbError> {
        let sql = format!(
            "SELECT m.county, COUNT(DISTINCT m.id) {}{} WHERE {}
             GROUP BY m.county
             ORDER BY m.county",
            BASE_FROM, filter.joins, filter.where_clause
        );
        tracing::debug!(%sql, params = filter.params.len(), "county counts");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind(&filter.params)), |row| {
            Ok(CountyCount {
                county: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Member institutions per org under `filter`, largest first.
    pub fn membership_counts(
        &self,
        filter: &CompiledFilter,
    ) -> Result<Vec<MembershipCount>, DbError> {
        let sql = format!(
            "SELECT o.code, o.name, COUNT(DISTINCT m.id) AS member_count {}{}
             JOIN institution_memberships im ON m.id = im.main_id
             JOIN membership_orgs o ON im.org_id = o.id
             WHERE {}
             GROUP BY o.id, o.code, o.name
             ORDER BY member_count DESC, o.name",
            BASE_FROM, filter.joins, filter.where_clause
        );
        tracing::debug!(%sql, params = filter.params.len(), "membership counts");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind(&filter.params)), |row| {
            Ok(MembershipCount {
                code: row.get(0)?,
                name: row.get(1)?,
                count: row.get(2)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    // -- reference tables ---------------------------------------------

    pub fn institution_types(&self) -> Result<Vec<InstitutionTypeRow>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, code, name FROM institution_types ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(InstitutionTypeRow {
                id: row.get(0)?,
                code: row.get(1)?,
                name: row.get(2)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// (abbreviation, full title) pairs.
    pub fn title_abbreviations(&self) -> Result<Vec<(String, String)>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT abbrev, full_title FROM title_abbreviations")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

fn bind(params: &[Value]) -> Vec<SqlValue> {
    params
        .iter()
        .map(|v| match v {
            Value::Text(s) => SqlValue::Text(s.clone()),
            Value::Integer(i) => SqlValue::Integer(*i),
        })
        .collect()
}

fn publication_or_warn(year: i32, season: &str) -> Option<Publication> {
    match season.parse::<Season>() {
        Ok(season) => Some(Publication::new(year, season)),
        Err(e) => {
            tracing::warn!(year, season, "skipping publication: {}", e);
            None
        }
    }
}

fn collect_publications(
    rows: impl Iterator<Item = rusqlite::Result<(i32, String)>>,
) -> Result<Vec<Publication>, DbError> {
    let mut result = Vec::new();
    for row in rows {
        let (year, season) = row?;
        if let Some(publication) = publication_or_warn(year, &season) {
            result.push(publication);
        }
    }
    Ok(result)
}

fn read_season(row: &Row<'_>, idx: usize) -> rusqlite::Result<Season> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn read_summary(row: &Row<'_>) -> rusqlite::Result<InstitutionSummary> {
    Ok(InstitutionSummary {
        id: row.get(0)?,
        state: row.get(1)?,
        bank_no: row.get(2)?,
        year: row.get(3)?,
        season: read_season(row, 4)?,
        name: row.get(5)?,
        city: row.get(6)?,
        county: row.get(7)?,
        total_assets: row.get(8)?,
        type_code: row.get(9)?,
        type_name: row.get(10)?,
    })
}

fn read_financials(row: &Row<'_>) -> rusqlite::Result<Financials> {
    read_financials_from(row, 0)
}

/// Reads the 15 columns of [`FINANCIAL_COLUMNS`] starting at `start`.
fn read_financials_from(row: &Row<'_>, start: usize) -> rusqlite::Result<Financials> {
    Ok(Financials {
        total_assets: row.get(start)?,
        net_loans: row.get(start + 1)?,
        total_loans: row.get(start + 2)?,
        cash_due: row.get(start + 3)?,
        securities: row.get(start + 4)?,
        total_investments: row.get(start + 5)?,
        fed_funds_sold: row.get(start + 6)?,
        all_other_assets: row.get(start + 7)?,
        capital_stock: row.get(start + 8)?,
        surplus: row.get(start + 9)?,
        undivided_profits: row.get(start + 10)?,
        retained_earnings: row.get(start + 11)?,
        total_deposits: row.get(start + 12)?,
        shares: row.get(start + 13)?,
        net_income: row.get(start + 14)?,
    })
}

fn read_branch(row: &Row<'_>) -> rusqlite::Result<Branch> {
    Ok(Branch {
        branch_name: row.get(0)?,
        address: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        zip: row.get(4)?,
        phone: row.get(5)?,
        manager: row.get(6)?,
    })
}

fn read_org(row: &Row<'_>) -> rusqlite::Result<MembershipOrg> {
    Ok(MembershipOrg {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        website: row.get(4)?,
    })
}

/// Non-blank text column, or `None`.
fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<String>> {
    let value: Option<String> = row.get(column)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// Type code and name come from `types`, so ids missing from
/// `institution_types` read as a bank.
fn read_record(
    row: &Row<'_>,
    types: &InstitutionTypeTable,
) -> rusqlite::Result<InstitutionRecord> {
    let type_id: i64 = row.get("institution_type_id")?;
    let season_idx = row.as_ref().column_index("pub_season")?;
    let mut officers = Vec::new();
    for column in OFFICER_COLUMNS {
        if let Some(name) = text(row, column)? {
            officers.push(name);
        }
    }
    let mut department_contacts = Vec::new();
    for department in Department::ALL {
        if let Some(name) = text(row, department.column())? {
            department_contacts.push(DepartmentContact {
                department,
                label: department.label(),
                name,
            });
        }
    }

    Ok(InstitutionRecord {
        id: row.get("id")?,
        state: row.get("pub_state")?,
        bank_no: row.get("bank_no")?,
        year: row.get("pub_year")?,
        season: read_season(row, season_idx)?,
        type_id,
        type_code: types.code(type_id).to_string(),
        type_name: types.name(type_id).to_string(),
        name: row.get("name")?,
        contact: ContactInfo {
            address: text(row, "address")?,
            mail_address: text(row, "mail_address")?,
            city: text(row, "city")?,
            state: text(row, "state")?,
            zip: text(row, "zip")?,
            county: text(row, "county")?,
            phone1: text(row, "phone1")?,
            phone2: text(row, "phone2")?,
            fax: text(row, "fax")?,
            email: text(row, "email")?,
            website: text(row, "website")?,
            hours: text(row, "hours")?,
            micr: text(row, "micr")?,
            transit_no: text(row, "transit_no")?,
            employer_id: text(row, "employer_id")?,
            charter_year: row.get("charter_year")?,
            holding_company: text(row, "holding_company")?,
        },
        ceo: text(row, "ceo")?,
        ceo_title: text(row, "ceo_title")?,
        officers,
        department_contacts,
        financials: Financials {
            total_assets: row.get("total_assets")?,
            net_loans: row.get("net_loans")?,
            total_loans: row.get("total_loans")?,
            cash_due: row.get("cash_due")?,
            securities: row.get("securities")?,
            total_investments: row.get("total_investments")?,
            fed_funds_sold: row.get("fed_funds_sold")?,
            all_other_assets: row.get("all_other_assets")?,
            capital_stock: row.get("capital_stock")?,
            surplus: row.get("surplus")?,
            undivided_profits: row.get("undivided_profits")?,
            retained_earnings: row.get("retained_earnings")?,
            total_deposits: row.get("total_deposits")?,
            shares: row.get("shares")?,
            net_income: row.get("net_income")?,
        },
    })
}

/// One institution in a result listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionSummary {
    pub id: i64,
    pub state: String,
    pub bank_no: String,
    pub year: i32,
    pub season: Season,
    pub name: String,
    pub city: Option<String>,
    pub county: Option<String>,
    pub total_assets: Option<i64>,
    pub type_code: String,
    pub type_name: String,
}

impl InstitutionSummary {
    pub fn publication(&self) -> Publication {
        Publication::new(self.year, self.season)
    }

    pub fn asset_range(&self) -> Option<AssetRange> {
        self.total_assets.and_then(AssetRange::for_total_assets)
    }
}

/// Contact and registration fields of a snapshot. Blank text is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactInfo {
    pub address: Option<String>,
    pub mail_address: Option<String>,
    pub city: Option<String>,
    /// Mailing-address state, which may differ from the publication state.
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub hours: Option<String>,
    pub micr: Option<String>,
    pub transit_no: Option<String>,
    pub employer_id: Option<String>,
    pub charter_year: Option<i64>,
    pub holding_company: Option<String>,
}

/// Department contact slots carried on every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Marketing,
    Trust,
    Operations,
    ChiefLending,
    FinanceAccounting,
    Cto,
    ItSecurity,
    Agriculture,
}

impl Department {
    pub const ALL: [Department; 8] = [
        Department::Marketing,
        Department::Trust,
        Department::Operations,
        Department::ChiefLending,
        Department::FinanceAccounting,
        Department::Cto,
        Department::ItSecurity,
        Department::Agriculture,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Department::Marketing => "off_marketing",
            Department::Trust => "off_trust",
            Department::Operations => "off_operations",
            Department::ChiefLending => "off_chief_lending",
            Department::FinanceAccounting => "off_finance_accounting",
            Department::Cto => "off_cto",
            Department::ItSecurity => "off_it_security",
            Department::Agriculture => "off_agriculture",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Department::Marketing => "Marketing",
            Department::Trust => "Trust",
            Department::Operations => "Operations",
            Department::ChiefLending => "Chief Lending Officer",
            Department::FinanceAccounting => "Finance & Accounting",
            Department::Cto => "Chief Technology Officer",
            Department::ItSecurity => "IT/Security",
            Department::Agriculture => "Agriculture",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentContact {
    pub department: Department,
    pub label: &'static str,
    pub name: String,
}

/// A full snapshot row returned by [`Db::institution_record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionRecord {
    pub id: i64,
    pub state: String,
    pub bank_no: String,
    pub year: i32,
    pub season: Season,
    pub type_id: i64,
    pub type_code: String,
    pub type_name: String,
    pub name: String,
    pub contact: ContactInfo,
    pub ceo: Option<String>,
    pub ceo_title: Option<String>,
    /// Non-blank `officer_1..officer_5`, in slot order.
    pub officers: Vec<String>,
    pub department_contacts: Vec<DepartmentContact>,
    pub financials: Financials,
}

impl InstitutionRecord {
    pub fn publication(&self) -> Publication {
        Publication::new(self.year, self.season)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    /// Only branches outside the home city carry a name.
    pub branch_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub manager: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipOrg {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionTypeRow {
    pub id: i64,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCount {
    pub code: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub code: String,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountyCount {
    pub county: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipCount {
    pub code: String,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRangeCount {
    pub code: AssetRange,
    pub label: &'static str,
    pub count: i64,
}
