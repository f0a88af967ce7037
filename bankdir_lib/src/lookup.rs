//! Reference tables loaded once and passed by reference.

use std::collections::HashMap;

use crate::db::{Db, DbError};

const DEFAULT_TYPE_CODE: &str = "bank";
const DEFAULT_TYPE_NAME: &str = "Bank";

/// Institution type id/code/name mappings with fixed fallbacks.
#[derive(Debug, Clone, Default)]
pub struct InstitutionTypeTable {
    codes: HashMap<i64, String>,
    names: HashMap<i64, String>,
}

impl InstitutionTypeTable {
    pub fn new(rows: impl IntoIterator<Item = (i64, String, String)>) -> Self {
        let mut table = Self::default();
        for (id, code, name) in rows {
            table.codes.insert(id, code);
            table.names.insert(id, name);
        }
        table
    }

    /// Code for a type id; unknown ids read as `"bank"`.
    pub fn code(&self, id: i64) -> &str {
        self.codes.get(&id).map_or(DEFAULT_TYPE_CODE, String::as_str)
    }

    /// Display name for a type id; unknown ids read as `"Bank"`.
    pub fn name(&self, id: i64) -> &str {
        self.names.get(&id).map_or(DEFAULT_TYPE_NAME, String::as_str)
    }
}

/// Officer title abbreviations ("EVP" -> "Executive Vice President").
#[derive(Debug, Clone, Default)]
pub struct TitleAbbreviations {
    titles: HashMap<String, String>,
}

impl TitleAbbreviations {
    pub fn new(rows: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            titles: rows.into_iter().collect(),
        }
    }

    /// Expand a compound title such as `"EVP-CFO-Cash"`. Parts are split on
    /// `-` and trimmed; unknown parts are kept as written.
    pub fn expand(&self, title: &str) -> String {
        title
            .split('-')
            .map(str::trim)
            .map(|part| self.titles.get(part).map_or(part, String::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// All static lookup tables, read from the store in one pass.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub institution_types: InstitutionTypeTable,
    pub titles: TitleAbbreviations,
}

impl ReferenceTables {
    pub fn load(db: &Db) -> Result<Self, DbError> {
        let types = db
            .institution_types()?
            .into_iter()
            .map(|row| (row.id, row.code, row.name));
        let tables = Self {
            institution_types: InstitutionTypeTable::new(types),
            titles: TitleAbbreviations::new(db.title_abbreviations()?),
        };
        tracing::debug!(
            types = tables.institution_types.codes.len(),
            titles = tables.titles.titles.len(),
            "loaded reference tables"
        );
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_table_falls_back_to_bank() {
        let table = InstitutionTypeTable::new([
            (1, "bank".to_string(), "Bank".to_string()),
            (2, "credit_union".to_string(), "Credit Union".to_string()),
        ]);
        assert_eq!(table.code(2), "credit_union");
        assert_eq!(table.name(2), "Credit Union");
        assert_eq!(table.code(99), "bank");
        assert_eq!(table.name(99), "Bank");
    }

    #[test]
    fn compound_titles_expand_part_by_part() {
        let titles = TitleAbbreviations::new([
            ("EVP".to_string(), "Executive Vice President".to_string()),
            ("CFO".to_string(), "Chief Financial Officer".to_string()),
        ]);
        assert_eq!(
            titles.expand("EVP-CFO-Cash"),
            "Executive Vice President, Chief Financial Officer, Cash"
        );
        assert_eq!(titles.expand(" EVP "), "Executive Vice President");
        assert_eq!(titles.expand("Pres"), "Pres");
    }

    #[test]
    fn load_reads_seeded_types() {
        let db = Db::open_in_memory().unwrap();
        db.init().unwrap();
        db.conn()
            .execute(
                "INSERT INTO title_abbreviations (abbrev, full_title) VALUES ('VP', 'Vice President')",
                [],
            )
            .unwrap();
        let tables = ReferenceTables::load(&db).unwrap();
        assert_eq!(tables.institution_types.code(3), "savings_loan");
        assert_eq!(tables.institution_types.name(3), "Savings & Loan");
        assert_eq!(tables.titles.expand("SR-VP"), "SR, Vice President");
    }
}
