use crate::catalog::{Catalog, CityData};
use crate::schema::{IssueRecord, IssueStatus, IssueType, Severity};

/// Issue list filter; `None` in any slot means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub status: Option<IssueStatus>,
    pub issue_type: Option<IssueType>,
    pub severity: Option<Severity>,
    pub city: Option<String>,
    pub ward: Option<String>,
}

impl IssueFilter {
    pub fn for_city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, issue: &IssueRecord) -> bool {
        self.status.is_none_or(|status| issue.status == status)
            && self.issue_type.is_none_or(|kind| issue.issue_type == kind)
            && self.severity.is_none_or(|severity| issue.severity == severity)
            && self
                .city
                .as_deref()
                .is_none_or(|city| issue.location.city == city)
            && self
                .ward
                .as_deref()
                .is_none_or(|ward| issue.location.ward == ward)
    }

    pub fn apply<'a>(&self, issues: &'a [IssueRecord]) -> Vec<&'a IssueRecord> {
        issues.iter().filter(|issue| self.matches(issue)).collect()
    }
}

/// Cities whose name, district or region contains `term`, ignoring case.
pub fn search_cities<'a>(catalog: &'a Catalog, term: &str) -> Vec<&'a CityData> {
    let needle = term.to_lowercase();
    catalog
        .cities
        .iter()
        .filter(|city| {
            city.name.to_lowercase().contains(&needle)
                || city.district.to_lowercase().contains(&needle)
                || city.region.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Groups by district, in order of each district's first appearance.
pub fn group_by_district<'a>(cities: &[&'a CityData]) -> Vec<(String, Vec<&'a CityData>)> {
    let mut groups: Vec<(String, Vec<&'a CityData>)> = Vec::new();
    for &city in cities {
        match groups.iter_mut().find(|(district, _)| *district == city.district) {
            Some((_, members)) => members.push(city),
            None => groups.push((city.district.clone(), vec![city])),
        }
    }
    groups
}
