//! Process-local repositories.
//!
//! [`MemoryStore`] implements every repository port over one mutex-guarded
//! state, so the report insert and points award in
//! [`BugReportRepository::create_with_award`] are atomic just as they are in
//! the database adapter. The server falls back to this store when no
//! database URL is configured; tests use it for end-to-end HTTP flows.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Datelike;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    BadgeRepository, BadgeRepositoryError, BugReportPersistenceError, BugReportRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Badge, BugFilter, BugReport, BugReportId, BugReportPatch, MonthlyCount, NewBugReport,
    Registration, StoredCredentials, TrendDimension, User, UserId,
};

#[derive(Default)]
struct State {
    users: Vec<StoredCredentials>,
    badges: Vec<Badge>,
    reports: Vec<BugReport>,
}

const POISONED: &str = "memory store lock poisoned";

/// In-memory implementation of the user, report and badge repositories.
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, State>> {
        self.state.lock().ok()
    }

    /// Grant `name` to `user_id`. Badges have no write path in the service,
    /// so fixtures seed them here.
    ///
    /// Returns `None` if the store is unusable.
    pub fn grant_badge(&self, user_id: UserId, name: &str) -> Option<Badge> {
        let mut state = self.lock()?;
        let id = i32::try_from(state.badges.len() + 1).ok()?;
        let badge = Badge::new(id, name, user_id);
        state.badges.push(badge.clone());
        Some(badge)
    }
}

fn next_id(len: usize) -> Option<i32> {
    i32::try_from(len + 1).ok()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, registration: &Registration) -> Result<User, UserPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        if state
            .users
            .iter()
            .any(|stored| stored.user().username() == registration.username())
        {
            return Err(UserPersistenceError::duplicate("username"));
        }
        if state
            .users
            .iter()
            .any(|stored| stored.user().email() == registration.email())
        {
            return Err(UserPersistenceError::duplicate("email"));
        }
        let id = next_id(state.users.len())
            .and_then(|raw| UserId::new(raw).ok())
            .ok_or_else(|| UserPersistenceError::query("user id space exhausted"))?;
        let user = User::new(
            id,
            registration.username().clone(),
            registration.email().clone(),
            0,
        );
        state
            .users
            .push(StoredCredentials::new(user.clone(), registration.password()));
        Ok(user)
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user().username().as_ref() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        Ok(state
            .users
            .iter()
            .map(StoredCredentials::user)
            .find(|user| user.id() == id)
            .cloned())
    }

    async fn top_by_points(&self, limit: u32) -> Result<Vec<User>, UserPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        let mut users: Vec<User> = state
            .users
            .iter()
            .map(|stored| stored.user().clone())
            .collect();
        users.sort_by(|a, b| b.points().cmp(&a.points()).then(a.id().cmp(&b.id())));
        users.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(users)
    }
}

#[async_trait]
impl BugReportRepository for MemoryStore {
    async fn create_with_award(
        &self,
        report: &NewBugReport,
        points: i32,
    ) -> Result<BugReport, BugReportPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| BugReportPersistenceError::connection(POISONED))?;
        let id = next_id(state.reports.len())
            .and_then(|raw| BugReportId::new(raw).ok())
            .ok_or_else(|| BugReportPersistenceError::query("bug report id space exhausted"))?;

        let Some(owner) = state
            .users
            .iter_mut()
            .find(|stored| stored.user().id() == report.user_id)
        else {
            return Err(BugReportPersistenceError::unknown_user(report.user_id.get()));
        };
        owner.award(points);

        let stored = BugReport {
            id,
            title: report.details.title().to_owned(),
            description: report.details.description().to_owned(),
            status: report.details.status().to_owned(),
            severity: report.details.severity().to_owned(),
            created_at: report.created_at,
            user_id: report.user_id,
            screenshot: report.screenshot.clone(),
            screen_recording: report.screen_recording.clone(),
        };
        state.reports.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(
        &self,
        id: BugReportId,
    ) -> Result<Option<BugReport>, BugReportPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| BugReportPersistenceError::connection(POISONED))?;
        Ok(state.reports.iter().find(|report| report.id == id).cloned())
    }

    async fn update(
        &self,
        id: BugReportId,
        patch: &BugReportPatch,
    ) -> Result<Option<BugReport>, BugReportPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| BugReportPersistenceError::connection(POISONED))?;
        Ok(state
            .reports
            .iter_mut()
            .find(|report| report.id == id)
            .map(|report| {
                patch.apply_to(report);
                report.clone()
            }))
    }

    async fn search(
        &self,
        filter: &BugFilter,
        request: PageRequest,
    ) -> Result<Page<BugReport>, BugReportPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| BugReportPersistenceError::connection(POISONED))?;
        let mut matching: Vec<&BugReport> = state
            .reports
            .iter()
            .filter(|report| filter.matches(report))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);

        let Some(offset) = request.offset().filter(|_| request.is_within(total)) else {
            return Ok(Page::empty(request, total));
        };
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect();
        Ok(Page::new(items, request, total))
    }

    async fn monthly_counts(
        &self,
        dimension: TrendDimension,
    ) -> Result<Vec<MonthlyCount>, BugReportPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| BugReportPersistenceError::connection(POISONED))?;
        let mut counts: BTreeMap<(u32, &str), u64> = BTreeMap::new();
        for report in &state.reports {
            let label = match dimension {
                TrendDimension::Severity => report.severity.as_str(),
                TrendDimension::Status => report.status.as_str(),
            };
            *counts.entry((report.created_at.month(), label)).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|((month, label), count)| MonthlyCount {
                month,
                label: label.to_owned(),
                count,
            })
            .collect())
    }
}

#[async_trait]
impl BadgeRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Badge>, BadgeRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| BadgeRepositoryError::connection(POISONED))?;
        Ok(state.badges.clone())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Badge>, BadgeRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| BadgeRepositoryError::connection(POISONED))?;
        Ok(state
            .badges
            .iter()
            .filter(|badge| badge.user_id() == user_id)
            .cloned()
            .collect())
    }
}
