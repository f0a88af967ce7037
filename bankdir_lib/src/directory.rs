//! Directory operations exposed to the CLI and HTTP boundary.

use std::collections::BTreeMap;

use bankdir_query::types::{Financials, InstitutionType, Publication, Season};
use bankdir_query::{ActiveFilter, SearchQuery};
use serde::Serialize;

use crate::db::{Branch, Db, InstitutionRecord, InstitutionSummary, MembershipOrg};
use crate::error::DirectoryError;
use crate::facets::{facet_counts, FacetCounts};
use crate::format::format_figures;
use crate::lookup::ReferenceTables;
use crate::publication::{resolve_neighbors, Neighbors, PublicationChoice, PublicationResolver};
use crate::validation::sanitize_org_code;

/// An institution's identity: state plus bank number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InstitutionKey {
    pub state: String,
    pub bank_no: String,
}

impl InstitutionKey {
    pub fn new(state: impl Into<String>, bank_no: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            bank_no: bank_no.into(),
        }
    }
}

/// Figures for one publication of one institution, with navigation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiguresReport {
    pub year: i32,
    pub season: Season,
    pub display_year: String,
    pub is_current: bool,
    pub current_year: i32,
    pub current_season: Season,
    pub current_display: String,
    pub older_pub: Option<Publication>,
    pub newer_pub: Option<Publication>,
    /// Formatted in thousands; zero or unreported is `null`.
    pub figures: BTreeMap<&'static str, Option<String>>,
    pub values: Financials,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub label: String,
    pub year: i32,
    pub season: Season,
    #[serde(flatten)]
    pub financials: Financials,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// False until at least one state is selected.
    pub enabled: bool,
    pub total: usize,
    pub results: Vec<InstitutionSummary>,
    pub facets: FacetCounts,
    pub active_filters: Vec<ActiveFilter>,
}

/// Detail view: contact data from the latest publication, figures from
/// the chosen one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionDetail {
    pub institution: InstitutionRecord,
    pub detail_page: &'static str,
    /// CEO title with abbreviations expanded.
    pub ceo_title: Option<String>,
    pub publications: Vec<Publication>,
    pub figures_publication: Publication,
    pub figures_is_current: bool,
    pub figures: Financials,
    pub neighbors: Neighbors,
    pub city_branches: Vec<Branch>,
    pub other_branches: Vec<Branch>,
    pub memberships: Vec<MembershipOrg>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipRoster {
    pub org: MembershipOrg,
    pub state: Option<String>,
    pub year: Option<i32>,
    pub season: Option<Season>,
    pub members: Vec<InstitutionSummary>,
}

/// The directory over one store, with reference tables loaded up front.
pub struct Directory {
    db: Db,
    tables: ReferenceTables,
}

impl Directory {
    pub fn new(db: Db) -> Result<Self, DirectoryError> {
        let tables = ReferenceTables::load(&db)?;
        Ok(Self { db, tables })
    }

    fn resolver(&self) -> PublicationResolver<'_> {
        PublicationResolver::new(&self.db)
    }

    /// Figures for an exact publication. Unlike the detail view there is no
    /// fallback: a publication the institution is absent from is `NotFound`.
    pub fn figures_for_publication(
        &self,
        key: &InstitutionKey,
        publication: Publication,
    ) -> Result<FiguresReport, DirectoryError> {
        let financials = self
            .db
            .financials(&key.state, &key.bank_no, publication)?
            .ok_or_else(|| not_found_snapshot(key, publication))?;

        let resolver = self.resolver();
        let publications = resolver.publications_for_institution(&key.state, &key.bank_no)?;
        let latest = publications
            .first()
            .copied()
            .ok_or_else(|| not_found_institution(key))?;
        let neighbors = resolve_neighbors(&publications, &publication);

        Ok(FiguresReport {
            year: publication.year,
            season: publication.season,
            display_year: publication.label(),
            is_current: publication == latest,
            current_year: latest.year,
            current_season: latest.season,
            current_display: latest.label(),
            older_pub: neighbors.older,
            newer_pub: neighbors.newer,
            figures: format_figures(&financials),
            values: financials,
        })
    }

    /// Every publication's figures, oldest first. Unknown institutions
    /// have an empty history.
    pub fn financial_history(
        &self,
        key: &InstitutionKey,
    ) -> Result<Vec<HistoryEntry>, DirectoryError> {
        let mut rows = self.db.financial_history(&key.state, &key.bank_no)?;
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(rows
            .into_iter()
            .map(|(publication, financials)| HistoryEntry {
                label: publication.label(),
                year: publication.year,
                season: publication.season,
                financials,
            })
            .collect())
    }

    /// Results and facet counts, both scoped to each selected state's most
    /// recent publication.
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResults, DirectoryError> {
        let latest = self.resolver().latest_per_state()?;
        let facets = facet_counts(&self.db, query, &latest)?;
        let results = if query.has_states() {
            self.db.search_institutions(&query.build(&latest).compile())?
        } else {
            Vec::new()
        };
        let org_names = self.db.membership_org_names(&query.memberships)?;
        tracing::debug!(results = results.len(), "search complete");
        Ok(SearchResults {
            enabled: query.has_states(),
            total: results.len(),
            results,
            facets,
            active_filters: query.active_filters(&org_names),
        })
    }

    /// Detail view. `figures_publication` is honored only when the
    /// institution appears in it; otherwise the latest publication is used.
    pub fn institution_detail(
        &self,
        key: &InstitutionKey,
        figures_publication: Option<Publication>,
    ) -> Result<InstitutionDetail, DirectoryError> {
        let resolver = self.resolver();
        let publications = resolver.publications_for_institution(&key.state, &key.bank_no)?;
        let latest = publications
            .first()
            .copied()
            .ok_or_else(|| not_found_institution(key))?;
        let types = &self.tables.institution_types;
        let institution = self
            .db
            .institution_record(&key.state, &key.bank_no, latest, types)?
            .ok_or_else(|| not_found_snapshot(key, latest))?;

        let mut chosen = match figures_publication {
            Some(requested) if publications.contains(&requested) => requested,
            Some(requested) => {
                tracing::info!(
                    state = %key.state,
                    bank_no = %key.bank_no,
                    requested = %requested,
                    "figures publication not available, using latest"
                );
                latest
            }
            None => latest,
        };
        let figures = if chosen == latest {
            institution.financials.clone()
        } else {
            match self.db.financials(&key.state, &key.bank_no, chosen)? {
                Some(financials) => financials,
                None => {
                    chosen = latest;
                    institution.financials.clone()
                }
            }
        };

        let neighbors = resolve_neighbors(&publications, &chosen);
        let ceo_title = institution
            .ceo_title
            .as_deref()
            .map(|title| self.tables.titles.expand(title));
        let city_branches = self.db.city_branches(institution.id)?;
        let other_branches = self.db.other_branches(institution.id)?;
        let memberships = self.db.memberships_for(institution.id)?;

        Ok(InstitutionDetail {
            detail_page: InstitutionType::detail_page(&institution.type_code),
            ceo_title,
            figures_is_current: chosen == latest,
            figures_publication: chosen,
            figures,
            neighbors,
            publications,
            city_branches,
            other_branches,
            memberships,
            institution,
        })
    }

    /// Members of an organization in one state's publication. The state
    /// defaults to the first state with data; year and season each default
    /// to that state's latest publication.
    pub fn membership_roster(
        &self,
        code: &str,
        state: Option<&str>,
        year: Option<i32>,
        season: Option<Season>,
    ) -> Result<MembershipRoster, DirectoryError> {
        let code = sanitize_org_code(code)
            .ok_or_else(|| DirectoryError::InvalidInput(format!("bad org code '{}'", code)))?;
        let org = self
            .db
            .membership_org(&code)?
            .ok_or_else(|| DirectoryError::NotFound(format!("membership org {}", code)))?;

        let resolver = self.resolver();
        let state = match state {
            Some(state) => Some(state.to_string()),
            None => resolver.available_states()?.into_iter().next(),
        };
        let (mut year, mut season) = (year, season);
        if let Some(state) = &state {
            if year.is_none() || season.is_none() {
                if let Some(latest) = resolver.latest_for_state(state)? {
                    year = year.or(Some(latest.year));
                    season = season.or(Some(latest.season));
                }
            }
        }

        let members = match (&state, year, season) {
            (Some(state), Some(year), Some(season)) => {
                self.db
                    .membership_members(org.id, state, Publication::new(year, season))?
            }
            _ => Vec::new(),
        };

        Ok(MembershipRoster {
            org,
            state,
            year,
            season,
            members,
        })
    }

    /// State/year/season lists for the publication selector.
    pub fn publications(
        &self,
        state: Option<&str>,
        year: Option<i32>,
    ) -> Result<PublicationChoice, DirectoryError> {
        Ok(PublicationChoice::resolve(
            &self.resolver(),
            state,
            year,
            None,
        )?)
    }
}

fn not_found_institution(key: &InstitutionKey) -> DirectoryError {
    DirectoryError::NotFound(format!("institution {}/{}", key.state, key.bank_no))
}

fn not_found_snapshot(key: &InstitutionKey, publication: Publication) -> DirectoryError {
    DirectoryError::NotFound(format!(
        "institution {}/{} in {}",
        key.state, key.bank_no, publication
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankdir_query::types::AssetRange;

    fn open_directory() -> Directory {
        let db = Db::open_in_memory().expect("open in-memory db");
        db.init().expect("init schema");
        db.conn()
            .execute_batch(
                "INSERT INTO title_abbreviations (abbrev, full_title) VALUES
                    ('Pres', 'President'), ('CEO', 'Chief Executive Officer');
                 INSERT INTO institution_main
                    (id, pub_state, bank_no, pub_year, pub_season, institution_type_id, name, city,
                     county, ceo, ceo_title, total_assets, net_income)
                 VALUES
                    (1, 'KS', '00001', 2018, 'fall', 1, 'First Bank', 'Topeka', 'Shawnee', 'Old CEO', 'Pres', 50000, 10),
                    (2, 'KS', '00001', 2019, 'spring', 1, 'First Bank', 'Topeka', 'Shawnee', 'Ann Lee', 'Pres', 60000, 0),
                    (3, 'KS', '00001', 2020, 'fall', 1, 'First Bank', 'Topeka', 'Shawnee', 'Ann Lee', 'Pres-CEO', 75000, NULL),
                    (4, 'KS', '00002', 2020, 'fall', 2, 'Prairie CU', 'Wichita', 'Sedgwick', NULL, NULL, 20000, 5),
                    (5, 'MO', '00001', 2021, 'spring', 3, 'Ozark S&L', 'Joplin', 'Jasper', NULL, NULL, 900000, 7);
                 INSERT INTO membership_orgs (id, code, name) VALUES
                    (1, 'kba', 'Kansas Bankers Association');
                 INSERT INTO institution_memberships (main_id, org_id) VALUES (3, 1), (4, 1), (2, 1);
                 INSERT INTO institution_city_branch (main_id, address, city) VALUES (3, '1 Main', 'Topeka');",
            )
            .expect("load fixtures");
        Directory::new(db).expect("directory")
    }

    fn first_bank() -> InstitutionKey {
        InstitutionKey::new("KS", "00001")
    }

    fn p(year: i32, season: Season) -> Publication {
        Publication::new(year, season)
    }

    #[test]
    fn figures_report_navigation() {
        let dir = open_directory();
        let report = dir
            .figures_for_publication(&first_bank(), p(2019, Season::Spring))
            .unwrap();
        assert_eq!(report.display_year, "Spring 2019");
        assert!(!report.is_current);
        assert_eq!(report.current_display, "Fall 2020");
        assert_eq!(report.older_pub, Some(p(2018, Season::Fall)));
        assert_eq!(report.newer_pub, Some(p(2020, Season::Fall)));
        assert_eq!(report.figures["total_assets"].as_deref(), Some("$60,000"));
        assert_eq!(report.figures["net_income"], None);
    }

    #[test]
    fn figures_for_missing_publication_is_not_found() {
        let dir = open_directory();
        let err = dir
            .figures_for_publication(&first_bank(), p(2017, Season::Spring))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }

    #[test]
    fn history_runs_oldest_to_newest() {
        let dir = open_directory();
        let history = dir.financial_history(&first_bank()).unwrap();
        let labels: Vec<&str> = history.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["Fall 2018", "Spring 2019", "Fall 2020"]);
        assert_eq!(history[2].financials.net_income, None);
        assert!(dir
            .financial_history(&InstitutionKey::new("KS", "99999"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn detail_uses_latest_record_and_honors_valid_figures_year() {
        let dir = open_directory();
        let detail = dir
            .institution_detail(&first_bank(), Some(p(2018, Season::Fall)))
            .unwrap();
        assert_eq!(detail.institution.publication(), p(2020, Season::Fall));
        assert_eq!(detail.institution.ceo.as_deref(), Some("Ann Lee"));
        assert_eq!(
            detail.ceo_title.as_deref(),
            Some("President, Chief Executive Officer")
        );
        assert_eq!(detail.figures_publication, p(2018, Season::Fall));
        assert!(!detail.figures_is_current);
        assert_eq!(detail.figures.total_assets, Some(50000));
        assert_eq!(detail.neighbors.older, None);
        assert_eq!(detail.neighbors.newer, Some(p(2019, Season::Spring)));
        assert_eq!(detail.detail_page, "bank");
        assert_eq!(detail.city_branches.len(), 1);
        assert_eq!(detail.memberships[0].code, "kba");
    }

    #[test]
    fn detail_falls_back_to_latest_for_unknown_figures_year() {
        let dir = open_directory();
        let detail = dir
            .institution_detail(&first_bank(), Some(p(2015, Season::Spring)))
            .unwrap();
        assert_eq!(detail.figures_publication, p(2020, Season::Fall));
        assert!(detail.figures_is_current);
        assert_eq!(detail.figures.total_assets, Some(75000));
    }

    #[test]
    fn detail_for_unknown_institution_is_not_found() {
        let dir = open_directory();
        let err = dir
            .institution_detail(&InstitutionKey::new("KS", "77777"), None)
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(_)));
    }

    #[test]
    fn search_is_disabled_without_a_state() {
        let dir = open_directory();
        let results = dir
            .search(&SearchQuery::default().with_text("First"))
            .unwrap();
        assert!(!results.enabled);
        assert!(results.results.is_empty());
        assert_eq!(results.facets.states.len(), 2);
        assert_eq!(results.active_filters.len(), 1);
    }

    #[test]
    fn search_returns_latest_snapshots_only() {
        let dir = open_directory();
        let query = SearchQuery::default()
            .with_state("KS")
            .with_asset_range(AssetRange::From50Mto100M);
        let results = dir.search(&query).unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.results[0].publication(), p(2020, Season::Fall));
        assert_eq!(results.results[0].name, "First Bank");
    }

    #[test]
    fn search_text_matches_name_or_city_case_insensitively() {
        let dir = open_directory();
        let query = SearchQuery::default().with_state("KS").with_text("wichita");
        let results = dir.search(&query).unwrap();
        let names: Vec<&str> = results.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Prairie CU"]);
    }

    #[test]
    fn search_text_folds_non_ascii_case() {
        let dir = open_directory();
        dir.db
            .conn()
            .execute(
                "INSERT INTO institution_main
                    (id, pub_state, bank_no, pub_year, pub_season, institution_type_id, name, city)
                 VALUES (20, 'NM', '00001', 2020, 'fall', 1, 'Banco Ñandú', 'Española')",
                [],
            )
            .unwrap();
        for text in ["BANCO", "ESPAÑOLA", "ñandú"] {
            let query = SearchQuery::default().with_state("NM").with_text(text);
            let results = dir.search(&query).unwrap();
            assert_eq!(results.total, 1, "{}", text);
        }
    }

    #[test]
    fn detail_reads_unknown_type_id_as_bank() {
        let dir = open_directory();
        dir.db
            .conn()
            .execute_batch(
                "PRAGMA foreign_keys = OFF;
                 INSERT INTO institution_main
                    (id, pub_state, bank_no, pub_year, pub_season, institution_type_id, name, city)
                 VALUES (21, 'KS', '00009', 2020, 'fall', 42, 'Orphan Trust', 'Salina');",
            )
            .unwrap();
        let detail = dir
            .institution_detail(&InstitutionKey::new("KS", "00009"), None)
            .unwrap();
        assert_eq!(detail.institution.type_id, 42);
        assert_eq!(detail.institution.type_code, "bank");
        assert_eq!(detail.institution.type_name, "Bank");
        assert_eq!(detail.detail_page, "bank");

        let cu = dir
            .institution_detail(&InstitutionKey::new("KS", "00002"), None)
            .unwrap();
        assert_eq!(cu.institution.type_code, "credit_union");
        assert_eq!(cu.detail_page, "credit-union");
    }

    #[test]
    fn roster_defaults_to_first_state_latest_publication() {
        let dir = open_directory();
        let roster = dir.membership_roster("kba", None, None, None).unwrap();
        assert_eq!(roster.state.as_deref(), Some("KS"));
        assert_eq!(roster.year, Some(2020));
        assert_eq!(roster.season, Some(Season::Fall));
        let names: Vec<&str> = roster.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["First Bank", "Prairie CU"]);

        let older = dir
            .membership_roster("kba", Some("KS"), Some(2019), None)
            .unwrap();
        assert_eq!(older.season, Some(Season::Fall));
        assert!(older.members.is_empty());
    }

    #[test]
    fn roster_rejects_bad_and_unknown_codes() {
        let dir = open_directory();
        assert!(matches!(
            dir.membership_roster("KBA!", None, None, None),
            Err(DirectoryError::InvalidInput(_))
        ));
        assert!(matches!(
            dir.membership_roster("nope", None, None, None),
            Err(DirectoryError::NotFound(_))
        ));
    }

    #[test]
    fn publication_selector_lists() {
        let dir = open_directory();
        let choice = dir.publications(Some("KS"), None).unwrap();
        assert_eq!(choice.states, vec!["KS".to_string(), "MO".to_string()]);
        assert_eq!(choice.years, vec![2020, 2019, 2018]);
        assert_eq!(choice.publication(), Some(p(2020, Season::Fall)));
    }
}
