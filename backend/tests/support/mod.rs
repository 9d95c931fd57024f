#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex as PlMutex;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use agenda_cad::api::ConsolidatedResponse;
use agenda_cad::dashboard::{AgendaApi, ApiClientError, SyncError};
use agenda_cad::models::ConsolidatedRecord;
use agenda_cad::services::SyncOutcome;
use agenda_cad::sheets::StaticSheetReader;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Record with only a total, the shape used by the stats examples.
pub fn record(date: &str, total: u32) -> ConsolidatedRecord {
    ConsolidatedRecord {
        schedule_date: date.to_string(),
        source1_count: Some(total),
        source2_count: None,
        source3_count: None,
        total_count: Some(total),
        last_updated: None,
    }
}

/// Three March 2024 dates in unsorted order, totals 10/30/20.
pub fn march_records() -> Vec<ConsolidatedRecord> {
    vec![
        record("01/03/2024", 10),
        record("03/03/2024", 30),
        record("02/03/2024", 20),
    ]
}

/// Spreadsheet shaped like production: two approved-status tabs and one plain tab.
///
/// 04/03/2024 is a Monday, 06/03/2024 a Wednesday.
pub fn production_like_sheets() -> StaticSheetReader {
    StaticSheetReader::new()
        .with_sheet(
            "Base1",
            &["Data Agenda", "Pallet", "Status"],
            &[
                &["04/03/2024", "10", "Aprovado"],
                &["04/03/2024", "5", "pendente"],
                &["06/03/2024", "7", "aprovado"],
            ],
        )
        .with_sheet(
            "Base2",
            &["Data Agenda", "Pallet", "Status"],
            &[&["04/03/2024", "3", "aprovado"], &["06/03/2024", "x", "aprovado"]],
        )
        .with_sheet("Base3", &["Data", "Pallet"], &[&["04/03/2024", "2"]])
}

/// Stamped on `MockAgendaApi` records by a sync with no scripted result.
pub fn synced_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 18, 30, 0).unwrap()
}

pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// Mock API
// =============================================================================

/// Scripted [`AgendaApi`] for controller tests.
#[derive(Default)]
pub struct MockAgendaApi {
    records: PlMutex<Vec<ConsolidatedRecord>>,
    sync_results: PlMutex<VecDeque<Result<SyncOutcome, SyncError>>>,
    fail_fetch: AtomicBool,
    fetch_delay: Duration,
    pub fetch_calls: AtomicUsize,
    pub sync_calls: AtomicUsize,
}

impl MockAgendaApi {
    pub fn new(records: Vec<ConsolidatedRecord>) -> Self {
        Self {
            records: PlMutex::new(records),
            ..Self::default()
        }
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Queue the result of the next sync call.
    pub fn push_sync_result(&self, result: Result<SyncOutcome, SyncError>) {
        self.sync_results.lock().push_back(result);
    }

    pub fn set_records(&self, records: Vec<ConsolidatedRecord>) {
        *self.records.lock() = records;
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn syncs(&self) -> usize {
        self.sync_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AgendaApi for MockAgendaApi {
    async fn fetch_consolidated(&self) -> Result<ConsolidatedResponse, ApiClientError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiClientError::Status {
                status: 503,
                message: "Database is not healthy".to_string(),
            });
        }
        Ok(ConsolidatedResponse::new(self.records.lock().clone()))
    }

    async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        match self.sync_results.lock().pop_front() {
            Some(result) => result,
            None => {
                let mut records = self.records.lock();
                for record in records.iter_mut() {
                    record.last_updated = Some(synced_at());
                }
                let count = records.len();
                Ok(SyncOutcome {
                    message: format!("Sync completed: {} dates processed", count),
                    count,
                })
            }
        }
    }
}
