use bankdir_lib::types::{AssetRange, InstitutionType, Publication, Season};
use bankdir_lib::validation::{institution_key, sanitize_publication, search_query_from_pairs};
use bankdir_lib::{resolve_neighbors, Db, Directory, DirectoryError, FilterKey, SearchQuery};

/// Two states on different publication cycles. KS has a fall edition in its
/// latest year; MO only publishes in spring.
fn fixture_directory() -> Directory {
    let db = Db::open_in_memory().expect("open in-memory db");
    db.init().expect("init schema");
    db.conn()
        .execute_batch(
            "INSERT INTO institution_main
                (id, pub_state, bank_no, pub_year, pub_season, institution_type_id, name, city, county, total_assets)
             VALUES
                (1,  'KS', '00001', 2020, 'spring', 1, 'Bluestem Bank',        'Emporia',  'Lyon',     48000),
                (2,  'KS', '00001', 2020, 'fall',   1, 'Bluestem Bank',        'Emporia',  'Lyon',     52000),
                (3,  'KS', '00002', 2020, 'fall',   1, 'Capitol Federal',      'Topeka',   'Shawnee',  9500000),
                (4,  'KS', '00003', 2020, 'fall',   2, 'Topeka Teachers CU',   'Topeka',   'Shawnee',  30000),
                (5,  'KS', '00004', 2020, 'fall',   3, 'Flint Hills S&L',      'Manhattan','Riley',    NULL),
                (6,  'KS', '00005', 2020, 'spring', 1, 'Closed Bank',          'Salina',   'Saline',   10000),
                (7,  'MO', '00001', 2021, 'spring', 1, 'Show Me Bank',         'Topeka',   'Jackson',  150000),
                (8,  'MO', '00001', 2020, 'spring', 1, 'Show Me Bank',         'Topeka',   'Jackson',  140000),
                (9,  'MO', '00002', 2021, 'spring', 2, 'Gateway CU',           'St. Louis','St. Louis',600000);
             INSERT INTO membership_orgs (id, code, name) VALUES
                (1, 'kba', 'Kansas Bankers Association'),
                (2, 'icba', 'Independent Community Bankers of America'),
                (3, 'mba', 'Missouri Bankers Association');
             INSERT INTO institution_memberships (main_id, org_id) VALUES
                (2, 1), (2, 2), (3, 1), (4, 2), (6, 1), (7, 3), (7, 2);",
        )
        .expect("load fixtures");
    Directory::new(db).expect("directory")
}

fn p(year: i32, season: Season) -> Publication {
    Publication::new(year, season)
}

#[test]
fn search_scopes_each_state_to_its_own_latest_publication() {
    let dir = fixture_directory();
    let query = SearchQuery::default().with_state("KS").with_state("MO");
    let results = dir.search(&query).unwrap();
    let rows: Vec<(&str, &str, Publication)> = results
        .results
        .iter()
        .map(|r| (r.state.as_str(), r.bank_no.as_str(), r.publication()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("KS", "00001", p(2020, Season::Fall)),
            ("KS", "00002", p(2020, Season::Fall)),
            ("KS", "00004", p(2020, Season::Fall)),
            ("MO", "00002", p(2021, Season::Spring)),
            ("MO", "00001", p(2021, Season::Spring)),
            ("KS", "00003", p(2020, Season::Fall)),
        ]
    );
}

#[test]
fn text_search_is_literal_and_ignores_facet_counts() {
    let dir = fixture_directory();
    let with_text = search_query_from_pairs([("state[]", "KS"), ("state[]", "MO"), ("q", "topeka")]);
    let without_text = with_text.without(FilterKey::Q, None);

    let a = dir.search(&with_text).unwrap();
    let b = dir.search(&without_text).unwrap();
    assert_eq!(a.facets, b.facets);
    let names: Vec<&str> = a.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Capitol Federal", "Show Me Bank", "Topeka Teachers CU"]);

    let wildcard = dir
        .search(&SearchQuery::default().with_state("KS").with_text("%"))
        .unwrap();
    assert!(wildcard.results.is_empty());
}

#[test]
fn facet_cascade_follows_precedence() {
    let dir = fixture_directory();
    let query = SearchQuery::default()
        .with_state("KS")
        .with_type(InstitutionType::Bank)
        .with_county("Shawnee")
        .with_membership("kba");
    let facets = dir.search(&query).unwrap().facets;

    // types see only the state
    assert_eq!(facets.types.iter().map(|t| t.count).sum::<i64>(), 4);
    // counties see state + type
    let counties: Vec<(&str, i64)> = facets
        .counties
        .iter()
        .map(|c| (c.county.as_str(), c.count))
        .collect();
    assert_eq!(counties, vec![("Lyon", 1), ("Shawnee", 1)]);
    // memberships see state + type + county
    let memberships: Vec<(&str, i64)> = facets
        .memberships
        .iter()
        .map(|m| (m.code.as_str(), m.count))
        .collect();
    assert_eq!(memberships, vec![("kba", 1)]);
    // asset ranges see everything above
    let over = facets
        .asset_ranges
        .iter()
        .find(|a| a.code == AssetRange::Over1B)
        .unwrap();
    assert_eq!(over.count, 1);
    assert_eq!(facets.asset_ranges.iter().map(|a| a.count).sum::<i64>(), 1);
}

#[test]
fn state_counts_ignore_every_other_filter() {
    let dir = fixture_directory();
    let narrow = SearchQuery::default()
        .with_state("MO")
        .with_type(InstitutionType::SavingsLoan);
    let facets = dir.search(&narrow).unwrap().facets;
    let states: Vec<(&str, i64)> = facets
        .states
        .iter()
        .map(|s| (s.code.as_str(), s.count))
        .collect();
    assert_eq!(states, vec![("KS", 4), ("MO", 2)]);
}

#[test]
fn figures_navigation_across_seasons() {
    let dir = fixture_directory();
    let key = institution_key(Some("ks"), Some("00001")).unwrap();
    let publication = sanitize_publication(Some("2020"), Some("Spring")).unwrap();
    let report = dir.figures_for_publication(&key, publication).unwrap();
    assert_eq!(report.newer_pub, Some(p(2020, Season::Fall)));
    assert_eq!(report.older_pub, None);
    assert!(!report.is_current);
    assert_eq!(report.current_display, "Fall 2020");

    let history = dir.financial_history(&key).unwrap();
    let seq: Vec<Publication> = history
        .iter()
        .map(|h| Publication::new(h.year, h.season))
        .collect();
    assert_eq!(seq, vec![p(2020, Season::Spring), p(2020, Season::Fall)]);
}

#[test]
fn neighbors_match_published_example() {
    let list = [
        p(2020, Season::Fall),
        p(2019, Season::Spring),
        p(2018, Season::Fall),
    ];
    let n = resolve_neighbors(&list, &p(2019, Season::Spring));
    assert_eq!(n.older, Some(p(2018, Season::Fall)));
    assert_eq!(n.newer, Some(p(2020, Season::Fall)));
}

#[test]
fn closed_institution_detail_uses_its_own_latest() {
    let dir = fixture_directory();
    let key = institution_key(Some("KS"), Some("00005")).unwrap();
    let detail = dir.institution_detail(&key, None).unwrap();
    assert_eq!(detail.institution.publication(), p(2020, Season::Spring));
    assert!(detail.figures_is_current);

    let err = dir
        .institution_detail(&institution_key(Some("NE"), Some("1")).unwrap(), None)
        .unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(_)));
}

#[test]
fn roster_for_explicit_state() {
    let dir = fixture_directory();
    let roster = dir.membership_roster("icba", Some("MO"), None, None).unwrap();
    assert_eq!(roster.year, Some(2021));
    assert_eq!(roster.season, Some(Season::Spring));
    let names: Vec<&str> = roster.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Show Me Bank"]);
}
