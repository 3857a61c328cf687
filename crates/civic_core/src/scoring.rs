use crate::schema::{CityScoreEntry, IssueRecord};
use feruca::Collator;
use serde::Serialize;
use std::cmp::Ordering;

pub const SCORE_CEILING: i64 = 100;
pub const SCORE_FLOOR: i64 = 0;
pub const UNRESOLVED_PENALTY: i64 = 10;

/// Reported in every entry; fix times are not derived from the records.
pub const AVG_FIX_TIME_PLACEHOLDER_HOURS: u32 = 24;

/// Civic health of one city's issues: 100 minus 10 per unresolved issue,
/// clamped to `0..=100`. Callers filter to a single city beforehand.
pub fn civic_health_score(city_issues: &[IssueRecord]) -> u8 {
    let unresolved = city_issues
        .iter()
        .filter(|issue| !issue.status.is_resolved())
        .count();
    if unresolved == 0 {
        return SCORE_CEILING as u8;
    }
    let penalty = i64::try_from(unresolved)
        .unwrap_or(i64::MAX)
        .saturating_mul(UNRESOLVED_PENALTY);
    clamp_score(SCORE_CEILING.saturating_sub(penalty), SCORE_FLOOR, SCORE_CEILING) as u8
}

/// One entry per candidate city, best score first, ties broken by name.
pub fn rank_cities<S: AsRef<str>>(all_issues: &[IssueRecord], cities: &[S]) -> Vec<CityScoreEntry> {
    let mut entries: Vec<CityScoreEntry> = cities
        .iter()
        .map(|city| score_city(all_issues, city.as_ref()))
        .collect();
    let mut collator = Collator::default();
    entries.sort_by(|a, b| compare_entries(&mut collator, a, b));
    entries
}

fn score_city(all_issues: &[IssueRecord], city: &str) -> CityScoreEntry {
    let city_issues: Vec<IssueRecord> = all_issues
        .iter()
        .filter(|issue| issue.location.city == city)
        .cloned()
        .collect();
    let resolved = city_issues
        .iter()
        .filter(|issue| issue.status.is_resolved())
        .count();

    CityScoreEntry {
        city: city.to_string(),
        civic_health_score: civic_health_score(&city_issues),
        total_issues: city_issues.len(),
        resolved_issues: resolved,
        avg_fix_time_hours: AVG_FIX_TIME_PLACEHOLDER_HOURS,
    }
}

fn compare_entries(collator: &mut Collator, a: &CityScoreEntry, b: &CityScoreEntry) -> Ordering {
    b.civic_health_score
        .cmp(&a.civic_health_score)
        .then_with(|| collate(collator, &a.city, &b.city))
}

/// Unicode collation (CLDR root): accents and case only matter once the
/// base letters tie, lowercase before uppercase. Byte order settles the rest.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collate(&mut Collator::default(), a, b)
}

/// Sorts names with a single collator for the whole pass.
pub fn sort_by_locale(names: &mut [String]) {
    let mut collator = Collator::default();
    names.sort_by(|a, b| collate(&mut collator, a, b));
}

fn collate(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| a.cmp(b))
}

fn clamp_score(value: i64, floor: i64, ceiling: i64) -> i64 {
    value.max(floor).min(ceiling)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    Good,
    Fair,
    Poor,
}

impl HealthBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            71.. => HealthBand::Good,
            41..=70 => HealthBand::Fair,
            _ => HealthBand::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub entry: CityScoreEntry,
}

/// Sorted ranking table. Ranks are 1-based positions in the full table and
/// never depend on how a view subsets it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Leaderboard {
    entries: Vec<CityScoreEntry>,
}

impl Leaderboard {
    pub fn build<S: AsRef<str>>(all_issues: &[IssueRecord], cities: &[S]) -> Self {
        Self {
            entries: rank_cities(all_issues, cities),
        }
    }

    pub fn entries(&self) -> &[CityScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rank_of(&self, city: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.city == city)
            .map(|index| index + 1)
    }

    pub fn ranked(&self) -> Vec<RankedEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| RankedEntry {
                rank: index + 1,
                entry: entry.clone(),
            })
            .collect()
    }

    /// Case-insensitive substring match on city name, keeping full-table ranks.
    pub fn search(&self, term: &str) -> Vec<RankedEntry> {
        let needle = term.to_lowercase();
        self.ranked()
            .into_iter()
            .filter(|ranked| ranked.entry.city.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn podium(&self) -> &[CityScoreEntry] {
        let end = self.entries.len().min(3);
        &self.entries[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IssueStatus, IssueType, Location, Severity};
    use proptest::prelude::*;

    fn issue(city: &str, status: IssueStatus) -> IssueRecord {
        IssueRecord {
            id: format!("{city}-{status}"),
            reporter_id: "u1".to_string(),
            reporter_name: "Tester".to_string(),
            issue_type: IssueType::Pothole,
            description: String::new(),
            image: String::new(),
            location: Location {
                lat: 0.0,
                lng: 0.0,
                address: String::new(),
                city: city.to_string(),
                ward: "Ward A".to_string(),
            },
            severity: Severity::Medium,
            is_anonymous: false,
            status,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
            fixed_at: None,
            confirmations: 0,
            is_verified: false,
            needs_review: false,
            assigned_department: IssueType::Pothole.department().to_string(),
            is_demo: None,
            source: None,
        }
    }

    fn issues_with(unresolved: usize, resolved: usize) -> Vec<IssueRecord> {
        let mut issues = Vec::new();
        for _ in 0..unresolved {
            issues.push(issue("Pune", IssueStatus::Reported));
        }
        for _ in 0..resolved {
            issues.push(issue("Pune", IssueStatus::Fixed));
        }
        issues
    }

    #[test]
    fn empty_city_is_fully_healthy() {
        assert_eq!(civic_health_score(&[]), 100);
    }

    #[test]
    fn in_progress_counts_as_unresolved() {
        let issues = vec![
            issue("Pune", IssueStatus::InProgress),
            issue("Pune", IssueStatus::Reported),
        ];
        assert_eq!(civic_health_score(&issues), 80);
    }

    #[test]
    fn ten_or_more_unresolved_floors_at_zero() {
        assert_eq!(civic_health_score(&issues_with(10, 0)), 0);
        assert_eq!(civic_health_score(&issues_with(25, 4)), 0);
    }

    #[test]
    fn concrete_pune_nashik_scenario() {
        let issues = vec![
            issue("Pune", IssueStatus::Fixed),
            issue("Pune", IssueStatus::Reported),
            issue("Nashik", IssueStatus::InProgress),
        ];
        let board = Leaderboard::build(&issues, &["Pune", "Nashik"]);

        let entries = board.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].city, "Nashik");
        assert_eq!(entries[0].civic_health_score, 90);
        assert_eq!(entries[0].total_issues, 1);
        assert_eq!(entries[0].resolved_issues, 0);
        assert_eq!(entries[1].city, "Pune");
        assert_eq!(entries[1].civic_health_score, 90);
        assert_eq!(entries[1].total_issues, 2);
        assert_eq!(entries[1].resolved_issues, 1);
        assert_eq!(board.rank_of("Nashik"), Some(1));
        assert_eq!(board.rank_of("Pune"), Some(2));
    }

    #[test]
    fn cities_without_issues_still_rank() {
        let issues = vec![issue("Pune", IssueStatus::Reported)];
        let entries = rank_cities(&issues, &["Pune", "Akola", "Wardha"]);

        let cities: Vec<&str> = entries.iter().map(|entry| entry.city.as_str()).collect();
        assert_eq!(cities, vec!["Akola", "Wardha", "Pune"]);
        assert_eq!(entries[0].civic_health_score, 100);
        assert_eq!(entries[0].total_issues, 0);
        assert_eq!(entries[0].avg_fix_time_hours, AVG_FIX_TIME_PLACEHOLDER_HOURS);
    }

    #[test]
    fn issues_outside_candidate_cities_are_ignored() {
        let issues = vec![issue("Goa", IssueStatus::Reported)];
        let entries = rank_cities(&issues, &["Pune"]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total_issues, 0);
    }

    #[test]
    fn ranking_is_deterministic() {
        let issues = vec![
            issue("Latur", IssueStatus::Reported),
            issue("Beed", IssueStatus::Fixed),
            issue("Jalna", IssueStatus::InProgress),
        ];
        let cities = ["Latur", "Beed", "Jalna", "Hingoli"];
        assert_eq!(rank_cities(&issues, &cities), rank_cities(&issues, &cities));
    }

    #[test]
    fn tie_break_ignores_case() {
        assert_eq!(locale_cmp("akola", "Beed"), Ordering::Less);
        assert_eq!(locale_cmp("Beed", "akola"), Ordering::Greater);
        assert_eq!(locale_cmp("akola", "Akola"), Ordering::Less);
        assert_eq!(locale_cmp("Akola", "akola"), Ordering::Greater);
    }

    #[test]
    fn accented_names_collate_with_their_base_letter() {
        assert_eq!(locale_cmp("Éa", "Eb"), Ordering::Less);
        assert_eq!(locale_cmp("Zeta", "Éa"), Ordering::Greater);

        let entries = rank_cities(&[], &["Eb", "Zeta", "Éa"]);
        let cities: Vec<&str> = entries.iter().map(|entry| entry.city.as_str()).collect();
        assert_eq!(cities, vec!["Éa", "Eb", "Zeta"]);
    }

    #[test]
    fn sort_by_locale_matches_pairwise_order() {
        let mut names = vec!["Eb".to_string(), "akola".to_string(), "Éa".to_string(), "Akola".to_string()];
        sort_by_locale(&mut names);
        assert_eq!(names, vec!["akola", "Akola", "Éa", "Eb"]);
    }

    #[test]
    fn search_keeps_full_population_rank() {
        let issues = vec![
            issue("Pune", IssueStatus::Reported),
            issue("Pune", IssueStatus::Reported),
        ];
        let board = Leaderboard::build(&issues, &["Pune", "Nagpur", "Pimpri-Chinchwad"]);

        let hits = board.search("PU");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entry.city, "Nagpur");
        assert_eq!(hits[0].rank, 1);
        assert_eq!(hits[1].entry.city, "Pune");
        assert_eq!(hits[1].rank, 3);

        assert!(board.search("zzz").is_empty());
    }

    #[test]
    fn podium_handles_short_tables() {
        let board = Leaderboard::build(&[], &["Pune", "Nashik"]);
        assert_eq!(board.podium().len(), 2);
        assert!(Leaderboard::default().podium().is_empty());
    }

    #[test]
    fn health_bands() {
        assert_eq!(HealthBand::for_score(100), HealthBand::Good);
        assert_eq!(HealthBand::for_score(71), HealthBand::Good);
        assert_eq!(HealthBand::for_score(70), HealthBand::Fair);
        assert_eq!(HealthBand::for_score(41), HealthBand::Fair);
        assert_eq!(HealthBand::for_score(40), HealthBand::Poor);
        assert_eq!(HealthBand::for_score(0), HealthBand::Poor);
    }

    proptest! {
        #[test]
        fn score_stays_in_range(unresolved in 0usize..40, resolved in 0usize..40) {
            let score = civic_health_score(&issues_with(unresolved, resolved));
            prop_assert!(score <= 100);
        }

        #[test]
        fn resolved_issues_never_change_the_formula(unresolved in 0usize..15, resolved in 0usize..20) {
            let expected = 100i64 - 10 * unresolved as i64;
            let score = civic_health_score(&issues_with(unresolved, resolved));
            prop_assert_eq!(score as i64, expected.max(0));
        }

        #[test]
        fn adding_unresolved_never_raises_score(unresolved in 0usize..15, resolved in 0usize..10) {
            let mut issues = issues_with(unresolved, resolved);
            let before = civic_health_score(&issues);
            issues.push(issue("Pune", IssueStatus::InProgress));
            prop_assert!(civic_health_score(&issues) <= before);
        }

        #[test]
        fn adding_resolved_never_lowers_score(unresolved in 0usize..15, resolved in 0usize..10) {
            let mut issues = issues_with(unresolved, resolved);
            let before = civic_health_score(&issues);
            issues.push(issue("Pune", IssueStatus::Fixed));
            prop_assert!(civic_health_score(&issues) >= before);
        }

        #[test]
        fn every_city_appears_once(n_cities in 0usize..12, n_issues in 0usize..30) {
            let cities: Vec<String> = (0..n_cities).map(|i| format!("City {i:02}")).collect();
            let issues: Vec<IssueRecord> = (0..n_issues)
                .map(|i| issue(&format!("City {:02}", i % 15), IssueStatus::Reported))
                .collect();
            let entries = rank_cities(&issues, &cities);
            prop_assert_eq!(entries.len(), cities.len());
            for city in &cities {
                prop_assert_eq!(entries.iter().filter(|entry| &entry.city == city).count(), 1);
            }
        }
    }
}
