use crate::catalog::Catalog;
use crate::error::{CivicError, Result};
use crate::filter::IssueFilter;
use crate::schema::{
    IssueRecord, IssueStatus, Language, NewIssue, Notification, NotificationKind, User,
};
use crate::scoring::{Leaderboard, civic_health_score};
use crate::seed::seed_initial_issues;
use crate::timing::format_timestamp;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

const GUEST_USER_ID: &str = "guest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CityHealth {
    pub score: u8,
    pub active: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub reported: usize,
    pub resolved: usize,
}

/// Owns every issue and notification plus the session. Collections are kept
/// newest first. Scoring reads from here but never holds a reference to it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    issues: Vec<IssueRecord>,
    notifications: Vec<Notification>,
    user: Option<User>,
    language: Language,
}

impl AppState {
    pub fn new(issues: Vec<IssueRecord>) -> Self {
        Self {
            issues,
            ..Self::default()
        }
    }

    pub fn seeded(catalog: &Catalog, rng_seed: u64, now: OffsetDateTime) -> Self {
        let mut rng = StdRng::seed_from_u64(rng_seed);
        Self::new(seed_initial_issues(catalog, &mut rng, now))
    }

    pub fn issues(&self) -> &[IssueRecord] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<IssueRecord> {
        self.issues
    }

    pub fn issue(&self, id: &str) -> Option<&IssueRecord> {
        self.issues.iter().find(|issue| issue.id == id)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn login(&mut self, user: User) {
        tracing::info!(user_id = %user.id, city = %user.city, "session started");
        self.language = user.preferred_language;
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "session ended");
        }
    }

    pub fn submit_issue(&mut self, new: NewIssue, now: OffsetDateTime) -> &IssueRecord {
        let stamp = format_timestamp(now);
        let issue = IssueRecord {
            id: next_id(),
            reporter_id: new.reporter_id,
            reporter_name: new.reporter_name,
            issue_type: new.issue_type,
            description: new.description,
            image: new.image,
            location: new.location,
            severity: new.severity,
            is_anonymous: new.is_anonymous,
            status: IssueStatus::Reported,
            created_at: stamp.clone(),
            updated_at: stamp.clone(),
            fixed_at: None,
            confirmations: 0,
            is_verified: false,
            needs_review: false,
            assigned_department: new.issue_type.department().to_string(),
            is_demo: None,
            source: None,
        };
        tracing::info!(
            issue_id = %issue.id,
            issue_type = %issue.issue_type,
            city = %issue.location.city,
            "issue submitted"
        );

        if let Some(user) = self.user.as_mut() {
            user.issues_reported_count += 1;
        }
        let recipient = self
            .user
            .as_ref()
            .map(|user| user.id.clone())
            .unwrap_or_else(|| GUEST_USER_ID.to_string());
        self.notify(Notification {
            id: next_id(),
            user_id: recipient,
            title: "Issue Reported".to_string(),
            message: format!(
                "Your {} report has been successfully submitted.",
                issue.issue_type
            ),
            kind: NotificationKind::Success,
            created_at: stamp,
            read: false,
            issue_id: Some(issue.id.clone()),
        });

        self.issues.insert(0, issue);
        &self.issues[0]
    }

    /// Moves an issue forward through its lifecycle. `fixedAt` is stamped
    /// exactly when the new status is `Fixed`.
    pub fn update_status(
        &mut self,
        issue_id: &str,
        status: IssueStatus,
        now: OffsetDateTime,
    ) -> Result<&IssueRecord> {
        let index = self
            .issues
            .iter()
            .position(|issue| issue.id == issue_id)
            .ok_or_else(|| CivicError::IssueNotFound(issue_id.to_string()))?;

        let current = self.issues[index].status;
        if !current.can_transition_to(status) {
            tracing::warn!(issue_id, from = %current, to = %status, "rejected status change");
            return Err(CivicError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        let stamp = format_timestamp(now);
        let issue = &mut self.issues[index];
        issue.status = status;
        issue.updated_at = stamp.clone();
        issue.fixed_at = status.is_resolved().then(|| stamp.clone());
        tracing::info!(issue_id, from = %current, to = %status, "issue status changed");

        let notification = Notification {
            id: next_id(),
            user_id: issue.reporter_id.clone(),
            title: "Issue Status Updated".to_string(),
            message: format!(
                "The status of your {} report has changed to {}.",
                issue.issue_type, status
            ),
            kind: NotificationKind::Info,
            created_at: stamp,
            read: false,
            issue_id: Some(issue.id.clone()),
        };
        self.notify(notification);
        Ok(&self.issues[index])
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
    }

    pub fn filtered_issues(&self, filter: &IssueFilter) -> Vec<&IssueRecord> {
        filter.apply(&self.issues)
    }

    pub fn city_health(&self, city: &str) -> CityHealth {
        let city_issues: Vec<IssueRecord> = self
            .issues
            .iter()
            .filter(|issue| issue.location.city == city)
            .cloned()
            .collect();
        let resolved = city_issues
            .iter()
            .filter(|issue| issue.status.is_resolved())
            .count();
        CityHealth {
            score: civic_health_score(&city_issues),
            active: city_issues.len() - resolved,
            resolved,
        }
    }

    pub fn leaderboard<S: AsRef<str>>(&self, cities: &[S]) -> Leaderboard {
        Leaderboard::build(&self.issues, cities)
    }

    pub fn user_stats(&self, user_id: &str) -> UserStats {
        let mine = self.issues.iter().filter(|issue| issue.reporter_id == user_id);
        let (reported, resolved) = mine.fold((0, 0), |(reported, resolved), issue| {
            (reported + 1, resolved + usize::from(issue.status.is_resolved()))
        });
        UserStats { reported, resolved }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.insert(0, notification);
    }
}

fn next_id() -> String {
    Uuid::new_v4().simple().to_string()
}
