//! Cascading facet counts for the search sidebar.

use bankdir_query::types::AssetRange;
use bankdir_query::{Column, Expr, FacetLevel, FilterPlan, LatestPublications, SearchQuery};
use serde::Serialize;

use crate::db::{AssetRangeCount, CountyCount, Db, DbError, MembershipCount, StateCount, TypeCount};

/// Counts for every facet. Only `states` is filled until at least one
/// selected state has a publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCounts {
    pub states: Vec<StateCount>,
    pub types: Vec<TypeCount>,
    pub counties: Vec<CountyCount>,
    pub memberships: Vec<MembershipCount>,
    pub asset_ranges: Vec<AssetRangeCount>,
}

/// Count institutions per facet value, each level filtered only by the
/// selections of the levels above it. Free text never affects counts.
pub fn facet_counts(
    db: &Db,
    query: &SearchQuery,
    latest: &LatestPublications,
) -> Result<FacetCounts, DbError> {
    let mut counts = FacetCounts::default();

    for (state, publication) in latest {
        let plan = FilterPlan::always()
            .and(Expr::eq(Column::PubState, state.as_str()))
            .and(Expr::eq(Column::PubYear, publication.year))
            .and(Expr::eq(Column::PubSeason, publication.season.as_str()));
        counts.states.push(StateCount {
            code: state.clone(),
            count: db.count_institutions(&plan.compile())?,
        });
    }

    if !query.has_scoped_states(latest) {
        return Ok(counts);
    }

    counts.types = db.type_counts(&query.cascade(FacetLevel::Type, latest).compile())?;

    let county_plan = query
        .cascade(FacetLevel::County, latest)
        .and(Expr::IsNotNull(Column::County))
        .and(Expr::NotEq(Column::County, "".into()));
    counts.counties = db.county_counts(&county_plan.compile())?;

    counts.memberships =
        db.membership_counts(&query.cascade(FacetLevel::Membership, latest).compile())?;

    let asset_plan = query.cascade(FacetLevel::AssetRange, latest);
    for range in AssetRange::ALL {
        let plan = asset_plan.clone().and(Expr::asset_range(range));
        counts.asset_ranges.push(AssetRangeCount {
            code: range,
            label: range.label(),
            count: db.count_institutions(&plan.compile())?,
        });
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankdir_query::types::InstitutionType;

    use crate::publication::PublicationResolver;

    fn open_test_db() -> Db {
        let db = Db::open_in_memory().expect("open in-memory db");
        db.init().expect("init schema");
        db.conn()
            .execute_batch(
                "INSERT INTO institution_main
                    (id, pub_state, bank_no, pub_year, pub_season, institution_type_id, name, city, county, total_assets)
                 VALUES
                    (1, 'KS', '001', 2020, 'fall', 1, 'Alpha Bank', 'Topeka', 'Shawnee', 40000),
                    (2, 'KS', '002', 2020, 'fall', 1, 'Beta Bank', 'Wichita', 'Sedgwick', 75000),
                    (3, 'KS', '003', 2020, 'fall', 2, 'Gamma CU', 'Topeka', 'Shawnee', 600000),
                    (4, 'KS', '004', 2020, 'fall', 1, 'Delta Bank', 'Salina', NULL, NULL),
                    (5, 'KS', '001', 2019, 'spring', 1, 'Alpha Bank', 'Topeka', 'Shawnee', 35000),
                    (6, 'MO', '001', 2021, 'spring', 3, 'Epsilon S&L', 'Joplin', 'Jasper', 2000000);
                 INSERT INTO membership_orgs (id, code, name) VALUES
                    (1, 'kba', 'Kansas Bankers Association'),
                    (2, 'icba', 'Independent Community Bankers');
                 INSERT INTO institution_memberships (main_id, org_id) VALUES
                    (1, 1), (1, 2), (2, 1), (3, 2), (5, 1);",
            )
            .expect("load fixtures");
        db
    }

    fn latest(db: &Db) -> LatestPublications {
        PublicationResolver::new(db).latest_per_state().unwrap()
    }

    #[test]
    fn no_state_selected_fills_only_state_counts() {
        let db = open_test_db();
        let counts = facet_counts(&db, &SearchQuery::default(), &latest(&db)).unwrap();
        assert_eq!(
            counts.states,
            vec![
                StateCount { code: "KS".into(), count: 4 },
                StateCount { code: "MO".into(), count: 1 },
            ]
        );
        assert!(counts.types.is_empty());
        assert!(counts.counties.is_empty());
        assert!(counts.memberships.is_empty());
        assert!(counts.asset_ranges.is_empty());
    }

    #[test]
    fn unknown_state_leaves_lower_facets_empty() {
        let db = open_test_db();
        let query = SearchQuery::default().with_state("ZZ");
        let counts = facet_counts(&db, &query, &latest(&db)).unwrap();
        assert_eq!(counts.states.len(), 2);
        assert!(counts.types.is_empty());
    }

    #[test]
    fn counts_use_only_the_latest_publication() {
        let db = open_test_db();
        let query = SearchQuery::default().with_state("KS");
        let counts = facet_counts(&db, &query, &latest(&db)).unwrap();
        let types: Vec<(&str, i64)> = counts
            .types
            .iter()
            .map(|t| (t.code.as_str(), t.count))
            .collect();
        assert_eq!(types, vec![("bank", 3), ("credit_union", 1)]);

        let kba = counts.memberships.iter().find(|m| m.code == "kba").unwrap();
        assert_eq!(kba.count, 2, "2019 snapshot must not be counted");
    }

    #[test]
    fn counties_skip_blank_values() {
        let db = open_test_db();
        let query = SearchQuery::default().with_state("KS");
        let counts = facet_counts(&db, &query, &latest(&db)).unwrap();
        let counties: Vec<&str> = counts.counties.iter().map(|c| c.county.as_str()).collect();
        assert_eq!(counties, vec!["Sedgwick", "Shawnee"]);
    }

    #[test]
    fn type_selection_narrows_counties_but_not_types() {
        let db = open_test_db();
        let query = SearchQuery::default()
            .with_state("KS")
            .with_type(InstitutionType::CreditUnion);
        let counts = facet_counts(&db, &query, &latest(&db)).unwrap();
        assert_eq!(counts.types.len(), 2);
        assert_eq!(
            counts.counties,
            vec![CountyCount { county: "Shawnee".into(), count: 1 }]
        );
    }

    #[test]
    fn membership_order_is_count_then_name() {
        let db = open_test_db();
        let query = SearchQuery::default().with_state("KS");
        let counts = facet_counts(&db, &query, &latest(&db)).unwrap();
        let codes: Vec<(&str, i64)> = counts
            .memberships
            .iter()
            .map(|m| (m.code.as_str(), m.count))
            .collect();
        assert_eq!(codes, vec![("icba", 2), ("kba", 2)]);
    }

    #[test]
    fn asset_buckets_partition_reported_totals() {
        let db = open_test_db();
        let query = SearchQuery::default().with_state("KS").with_text("nothing matches");
        let counts = facet_counts(&db, &query, &latest(&db)).unwrap();
        let by_code: Vec<(AssetRange, i64)> =
            counts.asset_ranges.iter().map(|a| (a.code, a.count)).collect();
        assert_eq!(
            by_code,
            vec![
                (AssetRange::Under50M, 1),
                (AssetRange::From50Mto100M, 1),
                (AssetRange::From100Mto500M, 0),
                (AssetRange::From500Mto1B, 1),
                (AssetRange::Over1B, 0),
            ]
        );
        let total: i64 = counts.asset_ranges.iter().map(|a| a.count).sum();
        assert_eq!(total, 3, "null total_assets is excluded from every bucket");
    }

    #[test]
    fn negative_total_is_counted_as_unreported() {
        let db = open_test_db();
        db.conn()
            .execute(
                "INSERT INTO institution_main
                    (id, pub_state, bank_no, pub_year, pub_season, institution_type_id, name, total_assets)
                 VALUES (7, 'KS', '005', 2020, 'fall', 1, 'Omega Bank', -250)",
                [],
            )
            .unwrap();
        let query = SearchQuery::default().with_state("KS");
        let counts = facet_counts(&db, &query, &latest(&db)).unwrap();
        let total: i64 = counts.asset_ranges.iter().map(|a| a.count).sum();
        assert_eq!(total, 3);
        let banks = counts.types.iter().find(|t| t.code == "bank").unwrap();
        assert_eq!(banks.count, 4, "still counted outside the asset level");
    }

    #[test]
    fn membership_selection_scopes_asset_buckets() {
        let db = open_test_db();
        let query = SearchQuery::default()
            .with_state("KS")
            .with_membership("kba")
            .with_membership("icba");
        let counts = facet_counts(&db, &query, &latest(&db)).unwrap();
        let total: i64 = counts.asset_ranges.iter().map(|a| a.count).sum();
        assert_eq!(total, 3, "institution with two memberships counted once");
        assert_eq!(counts.memberships.len(), 2, "own level is not filtered");
    }

    #[test]
    fn adding_filters_never_increases_lower_counts() {
        let db = open_test_db();
        let base = SearchQuery::default().with_state("KS");
        let narrowed = base.clone().with_type(InstitutionType::Bank);
        let wide = facet_counts(&db, &base, &latest(&db)).unwrap();
        let narrow = facet_counts(&db, &narrowed, &latest(&db)).unwrap();
        for c in &narrow.counties {
            let before = wide.counties.iter().find(|w| w.county == c.county).unwrap();
            assert!(c.count <= before.count);
        }
    }
}
