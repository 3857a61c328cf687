use crate::catalog::Catalog;
use crate::schema::{IssueRecord, IssueStatus, IssueType, Location, Severity};
use crate::timing::format_timestamp;
use rand::Rng;
use time::{Duration, OffsetDateTime};

const SEVERITY_CYCLE: [Severity; 3] = [Severity::Critical, Severity::Medium, Severity::Low];
const MUMBAI_LAT: (f64, f64) = (18.89, 19.27);
const MUMBAI_LNG: (f64, f64) = (72.77, 72.99);
const JITTER_DEGREES: f64 = 0.01;
const MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

fn seed_description(issue_type: IssueType) -> &'static str {
    match issue_type {
        IssueType::Pothole => "Major pothole detected near central junction causing slow traffic.",
        IssueType::Garbage => "Illegal garbage dumping spot identified behind commercial complex.",
        IssueType::Streetlight => "Streetlights not functioning in the primary residential lane.",
        IssueType::WaterLeakage => "Significant water leakage from the main municipal pipeline.",
        IssueType::Drainage => "Blocked drainage system causing overflow onto the main road.",
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// One verified demo report per catalog city, cycling through issue types,
/// severities and wards by city index.
pub fn seed_initial_issues<R: Rng>(catalog: &Catalog, rng: &mut R, now: OffsetDateTime) -> Vec<IssueRecord> {
    let updated_at = format_timestamp(now);
    catalog
        .cities
        .iter()
        .enumerate()
        .map(|(index, city)| {
            let issue_type = IssueType::ALL[index % IssueType::ALL.len()];
            let severity = SEVERITY_CYCLE[index % SEVERITY_CYCLE.len()];
            let ward = catalog
                .wards
                .get(index % catalog.wards.len().max(1))
                .cloned()
                .unwrap_or_default();

            let (lat, lng) = if city.name == "Mumbai" {
                (
                    rng.gen_range(MUMBAI_LAT.0..MUMBAI_LAT.1),
                    rng.gen_range(MUMBAI_LNG.0..MUMBAI_LNG.1),
                )
            } else {
                (
                    city.lat + (rng.r#gen::<f64>() - 0.5) * JITTER_DEGREES,
                    city.lng + (rng.r#gen::<f64>() - 0.5) * JITTER_DEGREES,
                )
            };
            let age = Duration::seconds(rng.gen_range(0..MAX_AGE_SECONDS));

            IssueRecord {
                id: format!("seed-{}-{index}", slug(&city.name)),
                reporter_id: "system-verified".to_string(),
                reporter_name: "Civic Inspector".to_string(),
                issue_type,
                description: seed_description(issue_type).to_string(),
                image: format!("https://picsum.photos/seed/fixcity-{index}/800/600"),
                location: Location {
                    lat,
                    lng,
                    address: format!("Verified Spot, {}", city.name),
                    city: city.name.clone(),
                    ward,
                },
                severity,
                is_anonymous: false,
                status: IssueStatus::Reported,
                created_at: format_timestamp(now - age),
                updated_at: updated_at.clone(),
                fixed_at: None,
                confirmations: rng.gen_range(12..32),
                is_verified: true,
                needs_review: false,
                assigned_department: issue_type.department().to_string(),
                is_demo: Some(true),
                source: Some("Initial Verified Report".to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rank_cities;
    use crate::timing::parse_timestamp;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-03-10 12:00 UTC);

    #[test]
    fn one_reported_issue_per_city() {
        let catalog = Catalog::maharashtra();
        let issues = seed_initial_issues(&catalog, &mut StdRng::seed_from_u64(7), NOW);

        assert_eq!(issues.len(), catalog.cities.len());
        for (issue, city) in issues.iter().zip(&catalog.cities) {
            assert_eq!(issue.location.city, city.name);
            assert_eq!(issue.status, IssueStatus::Reported);
            assert!(issue.is_verified);
            assert_eq!(issue.is_demo, Some(true));
            assert!((12..32).contains(&issue.confirmations));
            assert_eq!(issue.assigned_department, issue.issue_type.department());
        }
    }

    #[test]
    fn attributes_cycle_by_index() {
        let catalog = Catalog::maharashtra();
        let issues = seed_initial_issues(&catalog, &mut StdRng::seed_from_u64(1), NOW);

        assert_eq!(issues[0].id, "seed-mumbai-0");
        assert_eq!(issues[1].id, "seed-navi-mumbai-1");
        assert_eq!(issues[0].issue_type, IssueType::Pothole);
        assert_eq!(issues[4].issue_type, IssueType::Drainage);
        assert_eq!(issues[5].issue_type, IssueType::Pothole);
        assert_eq!(issues[2].severity, Severity::Low);
        assert_eq!(issues[3].severity, Severity::Critical);
        assert_eq!(issues[6].location.ward, "Ward B");
    }

    #[test]
    fn coordinates_and_ages_stay_in_bounds() {
        let catalog = Catalog::maharashtra();
        let issues = seed_initial_issues(&catalog, &mut StdRng::seed_from_u64(99), NOW);

        let mumbai = &issues[0];
        assert!((MUMBAI_LAT.0..MUMBAI_LAT.1).contains(&mumbai.location.lat));
        assert!((MUMBAI_LNG.0..MUMBAI_LNG.1).contains(&mumbai.location.lng));

        for (issue, city) in issues.iter().zip(&catalog.cities).skip(1) {
            assert!((issue.location.lat - city.lat).abs() <= JITTER_DEGREES / 2.0 + 1e-9);
            assert!((issue.location.lng - city.lng).abs() <= JITTER_DEGREES / 2.0 + 1e-9);
            let created = parse_timestamp(&issue.created_at).unwrap();
            assert!(created <= NOW);
            assert!(NOW - created < Duration::days(7));
        }
    }

    #[test]
    fn same_seed_same_data() {
        let catalog = Catalog::maharashtra();
        let a = seed_initial_issues(&catalog, &mut StdRng::seed_from_u64(42), NOW);
        let b = seed_initial_issues(&catalog, &mut StdRng::seed_from_u64(42), NOW);
        assert_eq!(a, b);
    }

    #[test]
    fn seeded_leaderboard_is_flat_at_ninety() {
        let catalog = Catalog::maharashtra();
        let issues = seed_initial_issues(&catalog, &mut StdRng::seed_from_u64(3), NOW);
        let entries = rank_cities(&issues, &catalog.city_names());

        assert!(entries.iter().all(|entry| entry.civic_health_score == 90));
        assert_eq!(entries[0].city, "Ahmednagar");
    }
}
