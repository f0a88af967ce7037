//! Faceted search filters and the cascade that scopes facet counts.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use crate::types::{AssetRange, InstitutionType, Publication};

use super::predicate::{Column, Expr, Value};

/// Most recent publication per state code.
pub type LatestPublications = BTreeMap<String, Publication>;

/// Facet dimensions in cascade precedence. Counts for a level are filtered
/// by the selections of every level before it, never by its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FacetLevel {
    State,
    Type,
    County,
    Membership,
    AssetRange,
}

/// Extra joins a filter needs beyond the base snapshot/type join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Join {
    Membership,
}

impl Join {
    pub fn sql(&self) -> &'static str {
        match self {
            Join::Membership => {
                " JOIN institution_memberships im_filter ON m.id = im_filter.main_id \
                 JOIN membership_orgs mo_filter ON im_filter.org_id = mo_filter.id"
            }
        }
    }
}

/// A predicate plus the joins it depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPlan {
    pub predicate: Expr,
    pub joins: Vec<Join>,
}

impl FilterPlan {
    pub fn always() -> Self {
        Self {
            predicate: Expr::Always,
            joins: Vec::new(),
        }
    }

    pub fn never() -> Self {
        Self {
            predicate: Expr::Never,
            joins: Vec::new(),
        }
    }

    /// AND another condition onto the plan.
    pub fn and(mut self, expr: Expr) -> Self {
        self.predicate = self.predicate.and(expr);
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        if !self.joins.contains(&join) {
            self.joins.push(join);
        }
        self
    }

    pub fn compile(&self) -> CompiledFilter {
        let mut where_clause = String::new();
        let mut params = Vec::new();
        self.predicate.write_sql(&mut where_clause, &mut params);
        let joins: String = self.joins.iter().map(|j| j.sql()).collect();
        tracing::trace!(%where_clause, params = params.len(), "compiled filter");
        CompiledFilter {
            where_clause,
            joins,
            params,
        }
    }
}

/// SQL pieces ready to splice into a statement: `FROM ... {joins} WHERE {where_clause}`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    pub where_clause: String,
    pub joins: String,
    pub params: Vec<Value>,
}

/// Search parameter keys, as used in links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKey {
    State,
    Type,
    County,
    Membership,
    Assets,
    Q,
}

impl FilterKey {
    pub fn param(&self) -> &'static str {
        match self {
            FilterKey::State => "state",
            FilterKey::Type => "type",
            FilterKey::County => "county",
            FilterKey::Membership => "membership",
            FilterKey::Assets => "assets",
            FilterKey::Q => "q",
        }
    }
}

/// One removable filter pill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFilter {
    pub key: FilterKey,
    /// Value to remove; `None` removes the whole key (free text).
    pub value: Option<String>,
    pub label: String,
}

/// Faceted search selections. Within a dimension values are OR-ed, across
/// dimensions AND-ed. Values are expected to be sanitized already.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub states: Vec<String>,
    pub types: Vec<InstitutionType>,
    pub counties: Vec<String>,
    pub memberships: Vec<String>,
    pub asset_ranges: Vec<AssetRange>,
    pub q: Option<String>,
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

impl SearchQuery {
    pub fn with_state(mut self, state: &str) -> Self {
        push_unique(&mut self.states, state.to_string());
        self
    }
    pub fn with_states(mut self, states: &[String]) -> Self {
        for s in states {
            push_unique(&mut self.states, s.clone());
        }
        self
    }

    pub fn with_type(mut self, institution_type: InstitutionType) -> Self {
        push_unique(&mut self.types, institution_type);
        self
    }

    pub fn with_county(mut self, county: &str) -> Self {
        push_unique(&mut self.counties, county.to_string());
        self
    }

    pub fn with_membership(mut self, code: &str) -> Self {
        push_unique(&mut self.memberships, code.to_string());
        self
    }

    pub fn with_asset_range(mut self, range: AssetRange) -> Self {
        push_unique(&mut self.asset_ranges, range);
        self
    }

    pub fn with_text(mut self, q: &str) -> Self {
        self.q = Some(q.to_string()).filter(|q| !q.is_empty());
        self
    }

    pub fn has_states(&self) -> bool {
        !self.states.is_empty()
    }

    /// True when at least one selected state has a publication.
    pub fn has_scoped_states(&self, latest: &LatestPublications) -> bool {
        self.states.iter().any(|s| latest.contains_key(s))
    }

    /// Selected states, each pinned to its most recent publication.
    /// States without data contribute nothing, so an all-unknown selection
    /// compiles to an empty OR and matches no rows.
    fn state_scope(&self, latest: &LatestPublications) -> Expr {
        let scopes = self
            .states
            .iter()
            .filter_map(|state| {
                latest.get(state).map(|publication| {
                    Expr::And(vec![
                        Expr::eq(Column::PubState, state.as_str()),
                        Expr::eq(Column::PubYear, publication.year),
                        Expr::eq(Column::PubSeason, publication.season.as_str()),
                    ])
                })
            })
            .collect();
        Expr::Or(scopes)
    }

    /// Filter for counting `level`: selections from the levels above it only.
    /// `FacetLevel::State` yields no constraint at all.
    pub fn cascade(&self, level: FacetLevel, latest: &LatestPublications) -> FilterPlan {
        let mut plan = FilterPlan::always();
        if level > FacetLevel::State {
            plan = plan.and(self.state_scope(latest));
        }
        if level > FacetLevel::Type && !self.types.is_empty() {
            plan = plan.and(Expr::in_set(
                Column::TypeCode,
                self.types.iter().map(|t| t.code()),
            ));
        }
        if level > FacetLevel::County && !self.counties.is_empty() {
            plan = plan.and(Expr::in_set(
                Column::County,
                self.counties.iter().map(String::as_str),
            ));
        }
        if level > FacetLevel::Membership && !self.memberships.is_empty() {
            plan = plan
                .and(Expr::in_set(
                    Column::MembershipCode,
                    self.memberships.iter().map(String::as_str),
                ))
                .with_join(Join::Membership);
        }
        plan
    }

    /// Full result filter: every dimension plus free text, scoped to each
    /// selected state's most recent publication. Without a state selection
    /// the search is disabled and nothing matches.
    pub fn build(&self, latest: &LatestPublications) -> FilterPlan {
        if !self.has_states() {
            return FilterPlan::never();
        }
        let mut plan = self.cascade(FacetLevel::AssetRange, latest);
        if !self.asset_ranges.is_empty() {
            plan = plan.and(Expr::Or(
                self.asset_ranges
                    .iter()
                    .map(|r| Expr::asset_range(*r))
                    .collect(),
            ));
        }
        if let Some(q) = &self.q {
            plan = plan.and(Expr::Or(vec![
                Expr::Contains(Column::Name, q.clone()),
                Expr::Contains(Column::City, q.clone()),
            ]));
        }
        plan
    }

    /// Appends this query's parameters to `url`, array-style keys for the
    /// multi-select dimensions.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for state in &self.states {
                pairs.append_pair("state[]", state);
            }
            for t in &self.types {
                pairs.append_pair("type[]", t.code());
            }
            for county in &self.counties {
                pairs.append_pair("county[]", county);
            }
            for code in &self.memberships {
                pairs.append_pair("membership[]", code);
            }
            for range in &self.asset_ranges {
                pairs.append_pair("assets[]", range.code());
            }
            if let Some(q) = &self.q {
                pairs.append_pair("q", q);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        url
    }

    /// Copy of this query with one value removed, or the whole key when
    /// `value` is `None`.
    pub fn without(&self, key: FilterKey, value: Option<&str>) -> SearchQuery {
        let mut next = self.clone();
        match key {
            FilterKey::State => retain_except(&mut next.states, value, |s| s.as_str()),
            FilterKey::Type => retain_except(&mut next.types, value, |t| t.code()),
            FilterKey::County => retain_except(&mut next.counties, value, |s| s.as_str()),
            FilterKey::Membership => {
                retain_except(&mut next.memberships, value, |s| s.as_str())
            }
            FilterKey::Assets => retain_except(&mut next.asset_ranges, value, |r| r.code()),
            FilterKey::Q => next.q = None,
        }
        next
    }

    /// Removable pills in display order. `org_names` maps membership codes to
    /// org names; unknown codes are shown upper-cased.
    pub fn active_filters(&self, org_names: &BTreeMap<String, String>) -> Vec<ActiveFilter> {
        let mut active = Vec::new();
        for state in &self.states {
            active.push(ActiveFilter {
                key: FilterKey::State,
                value: Some(state.clone()),
                label: state.clone(),
            });
        }
        for t in &self.types {
            active.push(ActiveFilter {
                key: FilterKey::Type,
                value: Some(t.code().to_string()),
                label: t.plural_label().to_string(),
            });
        }
        for county in &self.counties {
            active.push(ActiveFilter {
                key: FilterKey::County,
                value: Some(county.clone()),
                label: format!("{} County", county),
            });
        }
        for code in &self.memberships {
            active.push(ActiveFilter {
                key: FilterKey::Membership,
                value: Some(code.clone()),
                label: org_names
                    .get(code)
                    .cloned()
                    .unwrap_or_else(|| code.to_uppercase()),
            });
        }
        for range in &self.asset_ranges {
            active.push(ActiveFilter {
                key: FilterKey::Assets,
                value: Some(range.code().to_string()),
                label: range.label().to_string(),
            });
        }
        if let Some(q) = &self.q {
            active.push(ActiveFilter {
                key: FilterKey::Q,
                value: None,
                label: format!("Search: \"{}\"", q),
            });
        }
        active
    }
}

fn retain_except<T>(values: &mut Vec<T>, remove: Option<&str>, code: impl Fn(&T) -> &str) {
    match remove {
        Some(remove) => values.retain(|v| code(v) != remove),
        None => values.clear(),
    }
}
