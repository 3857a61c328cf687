use anyhow::Result;
use civic_core::schema::{CityScoreEntry, IssueRecord};
use civic_core::scoring::Leaderboard;
use civic_core::timing::time_to_fix;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub struct VaultPaths {
    pub root: PathBuf,
    pub index_dir: PathBuf,
    pub cities_dir: PathBuf,
}

impl VaultPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            index_dir: root.join("00_Index"),
            cities_dir: root.join("Cities"),
            root,
        }
    }

    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.index_dir)?;
        fs::create_dir_all(&self.cities_dir)?;
        Ok(())
    }
}

pub fn build_vault(
    vault_root: &Path,
    leaderboard: &Leaderboard,
    issues: &[IssueRecord],
    generated_at: OffsetDateTime,
) -> Result<VaultPaths> {
    let paths = VaultPaths::new(vault_root);
    paths.ensure()?;
    let stamp = generated_at.format(&Rfc3339)?;

    // 1) City notes
    for ranked in leaderboard.ranked() {
        let city_issues: Vec<&IssueRecord> = issues
            .iter()
            .filter(|issue| issue.location.city == ranked.entry.city)
            .collect();
        write_city_note(&paths, ranked.rank, &ranked.entry, &city_issues, generated_at)?;
    }

    // 2) Leaderboard MOC
    let mut lines = index_header("MOC - Leaderboard", &stamp);
    lines.push("## Podium".to_string());
    lines.push(String::new());
    if leaderboard.is_empty() {
        lines.push("_No cities ranked._".to_string());
    }
    for (index, entry) in leaderboard.podium().iter().enumerate() {
        lines.push(format!(
            "{}. {} ({}%, {} fixed of {} reports)",
            index + 1,
            city_link(&entry.city),
            entry.civic_health_score,
            entry.resolved_issues,
            entry.total_issues
        ));
    }
    lines.push(String::new());
    lines.push("## Detailed Ranking".to_string());
    lines.push(String::new());
    lines.push("| Rank | City | Civic Health | Resolved | Activity |".to_string());
    lines.push("| --- | --- | --- | --- | --- |".to_string());
    for ranked in leaderboard.ranked() {
        lines.push(format!(
            "| #{:02} | {} | {}% | {} | {} Reports |",
            ranked.rank,
            city_link(&ranked.entry.city),
            ranked.entry.civic_health_score,
            ranked.entry.resolved_issues,
            ranked.entry.total_issues
        ));
    }
    fs::write(paths.index_dir.join("MOC - Leaderboard.md"), lines.join("\n"))?;

    // 3) Category MOC
    let mut category_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for issue in issues {
        *category_counts.entry(issue.issue_type.label()).or_insert(0) += 1;
    }
    let mut lines = index_header("MOC - Categories", &stamp);
    let mut counts: Vec<(&str, usize)> = category_counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    if counts.is_empty() {
        lines.push("_No issues reported._".to_string());
    } else {
        for (label, count) in counts {
            lines.push(format!("- {label} ({count})"));
        }
    }
    fs::write(paths.index_dir.join("MOC - Categories.md"), lines.join("\n"))?;

    tracing::info!(
        root = %paths.root.display(),
        cities = leaderboard.len(),
        issues = issues.len(),
        "vault written"
    );
    Ok(paths)
}

fn index_header(title: &str, stamp: &str) -> Vec<String> {
    vec![
        format!("# {title}"),
        String::new(),
        format!("This index is generated ({stamp}). Do not edit manually."),
        String::new(),
    ]
}

fn note_name(city: &str) -> String {
    city.replace(['/', '\\'], "-")
}

/// Double-quoted YAML scalar.
fn yaml_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn city_link(city: &str) -> String {
    format!("[[Cities/{}|{}]]", note_name(city), city)
}

fn write_city_note(
    paths: &VaultPaths,
    rank: usize,
    entry: &CityScoreEntry,
    city_issues: &[&IssueRecord],
    generated_at: OffsetDateTime,
) -> Result<()> {
    let stamp = generated_at.format(&Rfc3339)?;
    let note_path = paths.cities_dir.join(format!("{}.md", note_name(&entry.city)));

    let mut md = String::new();
    md.push_str("---\n");
    md.push_str(&format!("city: {}\n", yaml_quoted(&entry.city)));
    md.push_str(&format!("rank: {rank}\n"));
    md.push_str(&format!("civic_health_score: {}\n", entry.civic_health_score));
    md.push_str(&format!("total_issues: {}\n", entry.total_issues));
    md.push_str(&format!("resolved_issues: {}\n", entry.resolved_issues));
    md.push_str(&format!("generated_at: {stamp}\n"));
    md.push_str("---\n\n");

    md.push_str(&format!("# {} Civic Health\n\n", entry.city));
    md.push_str(&format!("- Rank: `#{rank:02}`\n"));
    md.push_str(&format!("- Health Score: `{}%`\n", entry.civic_health_score));
    md.push_str(&format!(
        "- Active Reports: `{}`\n",
        entry.total_issues - entry.resolved_issues
    ));
    md.push_str(&format!("- Resolved: `{}`\n\n", entry.resolved_issues));

    md.push_str("## Issues\n");
    if city_issues.is_empty() {
        md.push_str("_No issues reported._\n");
    }
    for issue in city_issues {
        let elapsed = time_to_fix(&issue.created_at, issue.fixed_at.as_deref(), generated_at)?;
        let timing = if issue.status.is_resolved() {
            format!("fixed in {elapsed}")
        } else {
            format!("open for {elapsed}")
        };
        md.push_str(&format!(
            "- **{}** ({}, {}) {}, {timing}: {} `{}`\n",
            issue.issue_type.label(),
            issue.severity.label(),
            issue.location.ward,
            issue.status.label(),
            issue.description,
            issue.id
        ));
    }

    fs::write(note_path, md)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_core::schema::{IssueStatus, IssueType, Location, Severity};
    use time::macros::datetime;

    fn issue(id: &str, city: &str, issue_type: IssueType, status: IssueStatus) -> IssueRecord {
        IssueRecord {
            id: id.to_string(),
            reporter_id: "u1".to_string(),
            reporter_name: "Tester".to_string(),
            issue_type,
            description: "Needs attention".to_string(),
            image: String::new(),
            location: Location {
                lat: 0.0,
                lng: 0.0,
                address: String::new(),
                city: city.to_string(),
                ward: "Ward A".to_string(),
            },
            severity: Severity::Critical,
            is_anonymous: false,
            status,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
            fixed_at: status
                .is_resolved()
                .then(|| "2026-01-01T06:30:00Z".to_string()),
            confirmations: 0,
            is_verified: false,
            needs_review: false,
            assigned_department: issue_type.department().to_string(),
            is_demo: None,
            source: None,
        }
    }

    #[test]
    fn writes_index_and_city_notes() {
        let dir = tempfile::tempdir().unwrap();
        let issues = vec![
            issue("a", "Pune", IssueType::Pothole, IssueStatus::Fixed),
            issue("b", "Pune", IssueType::Pothole, IssueStatus::Reported),
            issue("c", "Nashik", IssueType::Drainage, IssueStatus::InProgress),
        ];
        let board = Leaderboard::build(&issues, &["Pune", "Nashik", "Akola"]);

        let paths = build_vault(dir.path(), &board, &issues, datetime!(2026-03-10 12:00 UTC)).unwrap();

        let moc = fs::read_to_string(paths.index_dir.join("MOC - Leaderboard.md")).unwrap();
        assert!(moc.contains("2026-03-10T12:00:00Z"));
        assert!(moc.contains("| #01 | [[Cities/Akola|Akola]] | 100% | 0 | 0 Reports |"));
        assert!(moc.contains("| #02 | [[Cities/Nashik|Nashik]] | 90% | 0 | 1 Reports |"));
        assert!(moc.contains("| #03 | [[Cities/Pune|Pune]] | 90% | 1 | 2 Reports |"));

        let categories = fs::read_to_string(paths.index_dir.join("MOC - Categories.md")).unwrap();
        assert!(categories.contains("- Pothole (2)\n- Drainage (1)"));

        let pune = fs::read_to_string(paths.cities_dir.join("Pune.md")).unwrap();
        assert!(pune.contains("rank: 3\n"));
        assert!(pune.contains("Work Fixed, fixed in 6h 30m"));
        assert!(pune.contains("Work Reported, open for 1644h 0m"));

        let akola = fs::read_to_string(paths.cities_dir.join("Akola.md")).unwrap();
        assert!(akola.contains("_No issues reported._"));
    }

    #[test]
    fn frontmatter_survives_quotes_in_city_names() {
        let dir = tempfile::tempdir().unwrap();
        let city = r#"Fort "Old" Town\East"#;
        let issues = vec![issue("q", city, IssueType::Garbage, IssueStatus::Reported)];
        let board = Leaderboard::build(&issues, &[city]);

        let paths = build_vault(dir.path(), &board, &issues, datetime!(2026-03-10 12:00 UTC)).unwrap();

        let note = fs::read_to_string(paths.cities_dir.join("Fort \"Old\" Town-East.md")).unwrap();
        let frontmatter = note
            .strip_prefix("---\n")
            .and_then(|rest| rest.split("---\n").next())
            .unwrap();
        let parsed: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(frontmatter).unwrap();
        assert_eq!(parsed["city"].as_str(), Some(city));
        assert_eq!(parsed["civic_health_score"].as_u64(), Some(90));
    }

    #[test]
    fn empty_board_still_writes_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let board = Leaderboard::default();
        let paths = build_vault(dir.path(), &board, &[], datetime!(2026-03-10 12:00 UTC)).unwrap();

        let moc = fs::read_to_string(paths.index_dir.join("MOC - Leaderboard.md")).unwrap();
        assert!(moc.contains("_No cities ranked._"));
        let categories = fs::read_to_string(paths.index_dir.join("MOC - Categories.md")).unwrap();
        assert!(categories.contains("_No issues reported._"));
    }
}
