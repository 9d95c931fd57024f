//! Dashboard session state machine.
//!
//! Fetches and syncs run as spawned tokio tasks, so the controller must be
//! started from inside a runtime. Every mutation goes through one
//! [`parking_lot::Mutex`]; callers poll [`DashboardController::view`] to
//! render.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::AgendaApi;
use crate::models::{ChartRecord, DateRange, Stats};
use crate::services::{compute_stats, filter_by_range, normalize_and_sort};

/// Shown when a sync fails without a usable message.
pub const DEFAULT_SYNC_ERROR: &str = "Failed to sync data";

/// How long a flash message stays visible.
pub const MESSAGE_DURATION: Duration = Duration::from_secs(3);

/// Shown to users who cannot trigger a sync.
pub const NON_ADMIN_NOTICE: &str =
    "Data is synced by an administrator. Contact one if the agenda looks out of date.";

/// Label for a dashboard whose agenda has never been synced.
pub const NEVER_UPDATED: &str = "Never";

const ADMIN_ROLE: &str = "admin";

/// The signed-in user's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCapability {
    pub role: String,
}

impl UserCapability {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }

    pub fn admin() -> Self {
        Self::new(ADMIN_ROLE)
    }

    /// Only admins may trigger a sync.
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("Role '{role}' is not allowed to sync")]
    NotAuthorized { role: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashboardPhase {
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashKind {
    Success,
    Error,
}

/// Transient message shown after a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub message_duration: Duration,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            message_duration: MESSAGE_DURATION,
        }
    }
}

/// Snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub phase: DashboardPhase,
    /// Filtered chart records in ascending date order
    pub records: Vec<ChartRecord>,
    /// Stats over `records`
    pub stats: Stats,
    pub range: DateRange,
    /// Schedule dates in the last fetch, ignoring the filter
    pub scheduled_dates: usize,
    /// Newest `lastUpdated` among the fetched records
    pub last_updated: Option<DateTime<Utc>>,
    pub message: Option<FlashMessage>,
    pub can_sync: bool,
    pub syncing: bool,
    pub notice: Option<&'static str>,
}

impl DashboardView {
    /// `DD/MM/YYYY HH:MM` in UTC, or [`NEVER_UPDATED`].
    pub fn last_updated_label(&self) -> String {
        self.last_updated
            .map(|at| at.format("%d/%m/%Y %H:%M").to_string())
            .unwrap_or_else(|| NEVER_UPDATED.to_string())
    }
}

#[derive(Default)]
struct SessionState {
    /// Normalized and sorted, unfiltered
    records: Vec<ChartRecord>,
    last_updated: Option<DateTime<Utc>>,
    range: DateRange,
    loaded: bool,
    fetches_in_flight: usize,
    syncs_in_flight: usize,
    message: Option<FlashMessage>,
    message_generation: u64,
    dismiss_task: Option<JoinHandle<()>>,
}

impl SessionState {
    fn phase(&self) -> DashboardPhase {
        let error_shown = matches!(
            self.message,
            Some(FlashMessage {
                kind: FlashKind::Error,
                ..
            })
        );
        if error_shown {
            DashboardPhase::Error
        } else if self.fetches_in_flight > 0 {
            DashboardPhase::Loading
        } else if self.loaded {
            DashboardPhase::Ready
        } else {
            DashboardPhase::Idle
        }
    }
}

struct Inner {
    api: Arc<dyn AgendaApi>,
    user: UserCapability,
    options: DashboardOptions,
    state: Mutex<SessionState>,
}

impl Inner {
    fn spawn_fetch(self: &Arc<Self>) {
        self.state.lock().fetches_in_flight += 1;
        let inner = Arc::clone(self);
        tokio::spawn(async move { inner.run_fetch().await });
    }

    fn spawn_sync(self: &Arc<Self>) {
        self.state.lock().syncs_in_flight += 1;
        let inner = Arc::clone(self);
        tokio::spawn(async move { inner.run_sync().await });
    }

    async fn run_fetch(self: Arc<Self>) {
        let result = self.api.fetch_consolidated().await;

        let mut state = self.state.lock();
        state.fetches_in_flight = state.fetches_in_flight.saturating_sub(1);
        match result {
            Ok(response) => {
                state.records = normalize_and_sort(&response.data);
                state.last_updated = response.data.iter().filter_map(|r| r.last_updated).max();
                state.loaded = true;
                debug!("Dashboard loaded {} schedule dates", state.records.len());
            }
            // Previous records stay on screen
            Err(e) => warn!("Failed to fetch consolidated agenda: {}", e),
        }
    }

    async fn run_sync(self: Arc<Self>) {
        let result = self.api.sync().await;

        {
            let mut state = self.state.lock();
            state.syncs_in_flight = state.syncs_in_flight.saturating_sub(1);
        }

        match result {
            Ok(outcome) => {
                info!("Sync finished: {}", outcome.message);
                self.show_message(FlashKind::Success, outcome.message);
                self.spawn_fetch();
            }
            Err(e) => {
                warn!("Sync failed: {}", e);
                let text = e
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SYNC_ERROR.to_string());
                self.show_message(FlashKind::Error, text);
            }
        }
    }

    /// Replace the current flash message and restart its dismissal timer.
    fn show_message(self: &Arc<Self>, kind: FlashKind, text: String) {
        let deadline = Instant::now() + self.options.message_duration;

        let mut state = self.state.lock();
        state.message_generation += 1;
        let generation = state.message_generation;
        state.message = Some(FlashMessage { kind, text });

        if let Some(previous) = state.dismiss_task.take() {
            previous.abort();
        }

        let inner = Arc::clone(self);
        state.dismiss_task = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            inner.dismiss_message(generation);
        }));
    }

    fn dismiss_message(&self, generation: u64) {
        let mut state = self.state.lock();
        // A newer message owns the slot
        if state.message_generation == generation {
            state.message = None;
            state.dismiss_task = None;
        }
    }
}

/// Drives a single dashboard session. Cheap to clone.
#[derive(Clone)]
pub struct DashboardController {
    inner: Arc<Inner>,
}

impl DashboardController {
    /// Start a session with the default options.
    ///
    /// Admins get an automatic sync; every user gets an initial fetch.
    pub fn start(api: Arc<dyn AgendaApi>, user: UserCapability) -> Self {
        Self::start_with_options(api, user, DashboardOptions::default())
    }

    pub fn start_with_options(
        api: Arc<dyn AgendaApi>,
        user: UserCapability,
        options: DashboardOptions,
    ) -> Self {
        let controller = Self {
            inner: Arc::new(Inner {
                api,
                user,
                options,
                state: Mutex::new(SessionState::default()),
            }),
        };

        if controller.inner.user.is_admin() {
            controller.inner.spawn_sync();
        }
        controller.inner.spawn_fetch();
        controller
    }

    pub fn user(&self) -> &UserCapability {
        &self.inner.user
    }

    /// Request a sync. A successful sync is followed by a fresh fetch.
    pub fn trigger_sync(&self) -> Result<(), DashboardError> {
        if !self.inner.user.is_admin() {
            return Err(DashboardError::NotAuthorized {
                role: self.inner.user.role.clone(),
            });
        }
        self.inner.spawn_sync();
        Ok(())
    }

    /// Re-read the consolidated agenda without syncing.
    pub fn refresh(&self) {
        self.inner.spawn_fetch();
    }

    pub fn set_start(&self, start: Option<NaiveDate>) {
        self.inner.state.lock().range.start = start;
    }

    pub fn set_end(&self, end: Option<NaiveDate>) {
        self.inner.state.lock().range.end = end;
    }

    pub fn set_range(&self, range: DateRange) {
        self.inner.state.lock().range = range;
    }

    pub fn reset_filter(&self) {
        self.inner.state.lock().range = DateRange::unbounded();
    }

    pub fn range(&self) -> DateRange {
        self.inner.state.lock().range
    }

    pub fn phase(&self) -> DashboardPhase {
        self.inner.state.lock().phase()
    }

    pub fn message(&self) -> Option<FlashMessage> {
        self.inner.state.lock().message.clone()
    }

    pub fn view(&self) -> DashboardView {
        let state = self.inner.state.lock();
        let records = filter_by_range(&state.records, &state.range);
        let stats = compute_stats(&records);
        let can_sync = self.inner.user.is_admin();

        DashboardView {
            phase: state.phase(),
            records,
            stats,
            range: state.range,
            scheduled_dates: state.records.len(),
            last_updated: state.last_updated,
            message: state.message.clone(),
            can_sync,
            syncing: state.syncs_in_flight > 0,
            notice: (!can_sync).then_some(NON_ADMIN_NOTICE),
        }
    }
}
