//! Publication resolution: latest editions, per-institution edition lists,
//! and older/newer navigation.

use bankdir_query::types::{sort_newest_first, Publication, Season};
use bankdir_query::LatestPublications;
use serde::Serialize;

use crate::db::{Db, DbError};

/// Read-only publication lookups over one store.
pub struct PublicationResolver<'a> {
    db: &'a Db,
}

impl<'a> PublicationResolver<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Most recent publication for a state, if the state has any data.
    pub fn latest_for_state(&self, state: &str) -> Result<Option<Publication>, DbError> {
        Ok(self.db.publications_for_state(state)?.into_iter().max())
    }

    pub fn latest_for_institution(
        &self,
        state: &str,
        bank_no: &str,
    ) -> Result<Option<Publication>, DbError> {
        Ok(self
            .db
            .publications_for_institution(state, bank_no)?
            .into_iter()
            .max())
    }

    /// Every publication the institution appears in, newest first, without
    /// duplicates.
    pub fn publications_for_institution(
        &self,
        state: &str,
        bank_no: &str,
    ) -> Result<Vec<Publication>, DbError> {
        let mut publications = self.db.publications_for_institution(state, bank_no)?;
        sort_newest_first(&mut publications);
        Ok(publications)
    }

    /// Most recent publication of every state with data.
    pub fn latest_per_state(&self) -> Result<LatestPublications, DbError> {
        let mut latest = LatestPublications::new();
        for (state, publication) in self.db.state_publications()? {
            latest
                .entry(state)
                .and_modify(|current: &mut Publication| {
                    if publication > *current {
                        *current = publication;
                    }
                })
                .or_insert(publication);
        }
        Ok(latest)
    }

    pub fn available_states(&self) -> Result<Vec<String>, DbError> {
        self.db.available_states()
    }

    /// Distinct years published for a state, newest first.
    pub fn available_years(&self, state: &str) -> Result<Vec<i32>, DbError> {
        let mut years: Vec<i32> = self
            .db
            .publications_for_state(state)?
            .into_iter()
            .map(|p| p.year)
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }

    /// Seasons published for a state in one year, most recent first.
    pub fn available_seasons(&self, state: &str, year: i32) -> Result<Vec<Season>, DbError> {
        let mut publications: Vec<Publication> = self
            .db
            .publications_for_state(state)?
            .into_iter()
            .filter(|p| p.year == year)
            .collect();
        sort_newest_first(&mut publications);
        Ok(publications.into_iter().map(|p| p.season).collect())
    }
}

/// Publications adjacent to a target in a newest-first list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Neighbors {
    pub older: Option<Publication>,
    pub newer: Option<Publication>,
}

/// Neighbors of `target` in a newest-first list. A target missing from the
/// list has no neighbors; substituting the latest publication is the
/// caller's decision.
pub fn resolve_neighbors(publications: &[Publication], target: &Publication) -> Neighbors {
    match publications.iter().position(|p| p == target) {
        Some(i) => Neighbors {
            older: publications.get(i + 1).copied(),
            newer: i.checked_sub(1).and_then(|j| publications.get(j)).copied(),
        },
        None => Neighbors::default(),
    }
}

/// State/year/season selection for browsing a publication, with the lists
/// offered at each step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublicationChoice {
    pub state: Option<String>,
    pub year: Option<i32>,
    pub season: Option<Season>,
    pub states: Vec<String>,
    pub years: Vec<i32>,
    pub seasons: Vec<Season>,
}

impl PublicationChoice {
    /// Fill in a missing year with the state's newest year, and a missing
    /// season with the newest season of the chosen year. Nothing is
    /// defaulted without a state.
    pub fn resolve(
        resolver: &PublicationResolver<'_>,
        state: Option<&str>,
        year: Option<i32>,
        season: Option<Season>,
    ) -> Result<Self, DbError> {
        let mut choice = PublicationChoice {
            state: state.map(str::to_string),
            year,
            season,
            states: resolver.available_states()?,
            ..Default::default()
        };
        let Some(state) = state else {
            return Ok(choice);
        };
        choice.years = resolver.available_years(state)?;
        if choice.year.is_none() {
            choice.year = choice.years.first().copied();
        }
        if let Some(year) = choice.year {
            choice.seasons = resolver.available_seasons(state, year)?;
            if choice.season.is_none() {
                choice.season = choice.seasons.first().copied();
            }
        }
        Ok(choice)
    }

    pub fn publication(&self) -> Option<Publication> {
        Some(Publication::new(self.year?, self.season?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn p(year: i32, season: Season) -> Publication {
        Publication::new(year, season)
    }

    fn open_test_db() -> Db {
        let db = Db::open_in_memory().expect("open in-memory db");
        db.init().expect("init schema");
        db
    }

    fn insert(db: &Db, state: &str, bank_no: &str, year: i32, season: &str) {
        db.conn()
            .execute(
                "INSERT INTO institution_main (pub_state, bank_no, pub_year, pub_season, name)
                 VALUES (?1, ?2, ?3, ?4, 'Test Bank')",
                params![state, bank_no, year, season],
            )
            .expect("insert snapshot");
    }

    #[test]
    fn neighbors_in_middle_of_list() {
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
    fn neighbors_at_ends_and_missing() {
        let list = [p(2020, Season::Fall), p(2019, Season::Spring)];
        let first = resolve_neighbors(&list, &p(2020, Season::Fall));
        assert_eq!(first.newer, None);
        assert_eq!(first.older, Some(p(2019, Season::Spring)));

        let last = resolve_neighbors(&list, &p(2019, Season::Spring));
        assert_eq!(last.older, None);
        assert_eq!(last.newer, Some(p(2020, Season::Fall)));

        assert_eq!(
            resolve_neighbors(&list, &p(2017, Season::Fall)),
            Neighbors::default()
        );
        assert_eq!(resolve_neighbors(&[], &p(2017, Season::Fall)), Neighbors::default());
    }

    #[test]
    fn latest_prefers_fall_within_a_year() {
        let db = open_test_db();
        insert(&db, "KS", "1", 2019, "spring");
        insert(&db, "KS", "1", 2019, "fall");
        insert(&db, "KS", "2", 2018, "fall");
        let resolver = PublicationResolver::new(&db);
        assert_eq!(
            resolver.latest_for_state("KS").unwrap(),
            Some(p(2019, Season::Fall))
        );
        assert_eq!(resolver.latest_for_state("MO").unwrap(), None);
    }

    #[test]
    fn latest_per_state_is_independent_per_state() {
        let db = open_test_db();
        insert(&db, "KS", "1", 2020, "spring");
        insert(&db, "KS", "1", 2019, "fall");
        insert(&db, "MO", "1", 2018, "fall");
        insert(&db, "MO", "1", 2018, "spring");
        let latest = PublicationResolver::new(&db).latest_per_state().unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest["KS"], p(2020, Season::Spring));
        assert_eq!(latest["MO"], p(2018, Season::Fall));
    }

    #[test]
    fn institution_publications_newest_first() {
        let db = open_test_db();
        insert(&db, "KS", "1", 2018, "fall");
        insert(&db, "KS", "1", 2020, "fall");
        insert(&db, "KS", "1", 2019, "spring");
        insert(&db, "KS", "2", 2021, "spring");
        let resolver = PublicationResolver::new(&db);
        assert_eq!(
            resolver.publications_for_institution("KS", "1").unwrap(),
            vec![
                p(2020, Season::Fall),
                p(2019, Season::Spring),
                p(2018, Season::Fall)
            ]
        );
        assert_eq!(
            resolver.latest_for_institution("KS", "2").unwrap(),
            Some(p(2021, Season::Spring))
        );
        assert!(resolver
            .publications_for_institution("KS", "9")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn choice_defaults_year_then_season() {
        let db = open_test_db();
        insert(&db, "KS", "1", 2019, "spring");
        insert(&db, "KS", "1", 2019, "fall");
        insert(&db, "KS", "1", 2018, "spring");
        insert(&db, "MO", "1", 2017, "spring");
        let resolver = PublicationResolver::new(&db);

        let choice = PublicationChoice::resolve(&resolver, Some("KS"), None, None).unwrap();
        assert_eq!(choice.states, vec!["KS".to_string(), "MO".to_string()]);
        assert_eq!(choice.years, vec![2019, 2018]);
        assert_eq!(choice.seasons, vec![Season::Fall, Season::Spring]);
        assert_eq!(choice.publication(), Some(p(2019, Season::Fall)));

        let explicit =
            PublicationChoice::resolve(&resolver, Some("KS"), Some(2018), None).unwrap();
        assert_eq!(explicit.publication(), Some(p(2018, Season::Spring)));

        let none = PublicationChoice::resolve(&resolver, None, None, None).unwrap();
        assert_eq!(none.publication(), None);
        assert!(none.years.is_empty());
    }
}
