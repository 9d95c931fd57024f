use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::consolidated_agenda;
use crate::models::ConsolidatedRecord;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = consolidated_agenda)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AgendaRow {
    pub schedule_date: String,
    pub source1_count: Option<i64>,
    pub source2_count: Option<i64>,
    pub source3_count: Option<i64>,
    pub total_count: Option<i64>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = consolidated_agenda)]
pub struct NewAgendaRow {
    pub schedule_date: String,
    pub source1_count: Option<i64>,
    pub source2_count: Option<i64>,
    pub source3_count: Option<i64>,
    pub total_count: Option<i64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl NewAgendaRow {
    /// Row for `record`, stamped with the time of the replace.
    pub fn from_record(record: &ConsolidatedRecord, stamped_at: DateTime<Utc>) -> Self {
        Self {
            schedule_date: record.schedule_date.clone(),
            source1_count: record.source1_count.map(i64::from),
            source2_count: record.source2_count.map(i64::from),
            source3_count: record.source3_count.map(i64::from),
            total_count: record.total_count.map(i64::from),
            last_updated: Some(stamped_at),
        }
    }
}

impl From<AgendaRow> for ConsolidatedRecord {
    fn from(row: AgendaRow) -> Self {
        Self {
            schedule_date: row.schedule_date,
            source1_count: row.source1_count.map(count_from_db),
            source2_count: row.source2_count.map(count_from_db),
            source3_count: row.source3_count.map(count_from_db),
            total_count: row.total_count.map(count_from_db),
            last_updated: row.last_updated,
        }
    }
}

/// Columns are checked non-negative; anything above `u32::MAX` saturates.
fn count_from_db(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
