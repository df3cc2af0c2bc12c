//! The filter engine: four conjunctive predicates over the mission list.
//!
//! Every predicate is optional; an empty value accepts all missions:
//! - **search**: case-insensitive substring of name, objective, agency or type
//! - **agency**: exact match
//! - **year**: exact match on the launch year
//! - **type**: exact match
//!
//! [`MissionFilter::apply`] preserves the catalog order, so applying the same
//! filter to its own output returns it unchanged.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::mission::Mission;

/// Current values of the four filter controls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionFilter {
    /// Free text. Lowercased for matching, never trimmed.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub agency: String,
    /// Four-digit year as selected in the dropdown.
    #[serde(default)]
    pub year: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl MissionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_agency(mut self, agency: impl Into<String>) -> Self {
        self.agency = agency.into();
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.agency.is_empty()
            && self.year.is_empty()
            && self.kind.is_empty()
    }

    /// Clear all four predicates.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether a single mission passes every predicate.
    pub fn matches(&self, mission: &Mission) -> bool {
        let needle = self.search.to_lowercase();
        self.matches_with_needle(mission, &needle)
    }

    /// Missions passing every predicate, in their original order.
    pub fn apply<'a>(&self, missions: &'a [Mission]) -> Vec<&'a Mission> {
        let needle = self.search.to_lowercase();
        missions
            .iter()
            .filter(|m| self.matches_with_needle(m, &needle))
            .collect()
    }

    fn matches_with_needle(&self, mission: &Mission, needle: &str) -> bool {
        let matches_search = needle.is_empty()
            || [
                &mission.name,
                &mission.objective,
                &mission.agency,
                &mission.kind,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(needle));

        let matches_agency = self.agency.is_empty() || mission.agency == self.agency;
        let matches_year = self.year.is_empty()
            || mission
                .launch_year()
                .is_some_and(|y| y.to_string() == self.year);
        let matches_kind = self.kind.is_empty() || mission.kind == self.kind;

        matches_search && matches_agency && matches_year && matches_kind
    }
}

/// Choices offered by the agency, year and type dropdowns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Distinct agencies in first-seen order.
    pub agencies: Vec<String>,
    /// Distinct launch years, most recent first.
    pub years: Vec<i32>,
    /// Distinct mission types in first-seen order.
    #[serde(rename = "types")]
    pub kinds: Vec<String>,
}

impl FilterOptions {
    pub fn from_missions(missions: &[Mission]) -> Self {
        let agencies = distinct(missions.iter().map(|m| m.agency.as_str()));
        let kinds = distinct(missions.iter().map(|m| m.kind.as_str()));

        let mut years: Vec<i32> = missions.iter().filter_map(Mission::launch_year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();

        Self {
            agencies,
            years,
            kinds,
        }
    }

    /// Drop selections that are no longer offered after the list changed.
    pub fn prune(&self, filter: &mut MissionFilter) {
        if !filter.agency.is_empty() && !self.agencies.contains(&filter.agency) {
            filter.agency.clear();
        }
        if !filter.year.is_empty() && !self.years.iter().any(|y| y.to_string() == filter.year) {
            filter.year.clear();
        }
        if !filter.kind.is_empty() && !self.kinds.contains(&filter.kind) {
            filter.kind.clear();
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission(id: u32, name: &str, agency: &str, date: &str, kind: &str) -> Mission {
        Mission {
            id,
            name: name.into(),
            agency: agency.into(),
            objective: format!("Objectif de {name}"),
            launch_date: date.into(),
            kind: kind.into(),
            image: None,
        }
    }

    fn catalog() -> Vec<Mission> {
        vec![
            mission(1, "Apollo 11", "NASA", "1969-07-16", "Alunissage"),
            mission(2, "Rosetta", "ESA", "2004-03-02", "Sonde"),
            mission(3, "Chang'e 4", "CNSA", "2018-12-07", "Alunissage"),
            mission(4, "Perseverance", "NASA", "2020-07-30", "Rover"),
            mission(5, "Hope", "MBRSC", "2020-07-19", "Orbiteur"),
        ]
    }

    fn ids(found: &[&Mission]) -> Vec<u32> {
        found.iter().map(|m| m.id).collect()
    }

    #[test]
    fn empty_filter_returns_everything() {
        let missions = catalog();
        assert_eq!(MissionFilter::new().apply(&missions).len(), missions.len());
    }

    #[test]
    fn apollo_scenario() {
        let missions = vec![mission(1, "Apollo 11", "NASA", "1969-07-16", "Alunissage")];
        assert!(
            MissionFilter::new()
                .with_agency("ESA")
                .apply(&missions)
                .is_empty()
        );
        assert_eq!(
            ids(&MissionFilter::new().with_search("apollo").apply(&missions)),
            vec![1]
        );
    }

    #[test]
    fn search_covers_objective_agency_and_type() {
        let missions = catalog();
        assert_eq!(
            ids(&MissionFilter::new().with_search("OBJECTIF DE ROS").apply(&missions)),
            vec![2]
        );
        assert_eq!(
            ids(&MissionFilter::new().with_search("cnsa").apply(&missions)),
            vec![3]
        );
        assert_eq!(
            ids(&MissionFilter::new().with_search("rover").apply(&missions)),
            vec![4]
        );
    }

    #[test]
    fn search_is_not_trimmed() {
        let missions = catalog();
        // Only "Apollo 11" contains "o 1".
        assert_eq!(
            ids(&MissionFilter::new().with_search("o 1").apply(&missions)),
            vec![1]
        );
    }

    #[test]
    fn predicates_are_conjunctive() {
        let missions = catalog();
        let f = MissionFilter::new()
            .with_agency("NASA")
            .with_year("2020")
            .with_kind("Rover");
        assert_eq!(ids(&f.apply(&missions)), vec![4]);

        let f = MissionFilter::new()
            .with_year("2020")
            .with_kind("Alunissage");
        assert!(f.apply(&missions).is_empty());
    }

    #[test]
    fn year_filter_skips_unparseable_dates() {
        let mut missions = catalog();
        missions.push(mission(6, "Mystery", "NASA", "TBD", "Sonde"));
        let f = MissionFilter::new().with_year("2020");
        assert_eq!(ids(&f.apply(&missions)), vec![4, 5]);
        assert_eq!(MissionFilter::new().apply(&missions).len(), 6);
    }

    #[test]
    fn apply_preserves_order_and_is_idempotent() {
        let missions = catalog();
        let filters = [
            MissionFilter::new(),
            MissionFilter::new().with_search("a"),
            MissionFilter::new().with_agency("NASA"),
            MissionFilter::new().with_year("2020"),
            MissionFilter::new().with_kind("Alunissage"),
            MissionFilter::new().with_search("e").with_year("2020"),
            MissionFilter::new().with_search("zzz"),
        ];
        for f in &filters {
            let first = f.apply(&missions);
            let positions: Vec<usize> = first
                .iter()
                .map(|m| missions.iter().position(|x| x.id == m.id).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "{f:?}");

            let owned: Vec<Mission> = first.iter().map(|m| (*m).clone()).collect();
            let second = f.apply(&owned);
            assert_eq!(ids(&first), ids(&second), "{f:?}");
        }
    }

    #[test]
    fn options_are_distinct_and_years_descend() {
        let opts = FilterOptions::from_missions(&catalog());
        assert_eq!(opts.agencies, vec!["NASA", "ESA", "CNSA", "MBRSC"]);
        assert_eq!(opts.years, vec![2020, 2018, 2004, 1969]);
        assert_eq!(opts.kinds, vec!["Alunissage", "Sonde", "Rover", "Orbiteur"]);
    }

    #[test]
    fn prune_clears_stale_selections_only() {
        let opts = FilterOptions::from_missions(&catalog());
        let mut f = MissionFilter::new()
            .with_search("x")
            .with_agency("ISRO")
            .with_year("2020")
            .with_kind("Navette");
        opts.prune(&mut f);
        assert_eq!(f.search, "x");
        assert!(f.agency.is_empty());
        assert_eq!(f.year, "2020");
        assert!(f.kind.is_empty());
    }
}
