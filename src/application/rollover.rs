//! Daily real-time rollover.
//!
//! Once a day, after the session closes, the engine's real-time stores are
//! emptied so the next session starts clean. Historical bars are kept.

use std::sync::Arc;

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::engine::MarketDataEngine;
use crate::port::outbound::gateway::PersistenceGateway;

/// Days searched for a representable rollover time before giving up.
const SEARCH_DAYS: u64 = 7;

/// Next instant strictly after `now` whose local wall-clock time is `at`.
///
/// Days where `at` falls into a DST gap are skipped. Returns `None` only if
/// no representable instant exists in the next week.
pub fn next_rollover<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let today = now.date_naive();
    (0..=SEARCH_DAYS).find_map(|offset| {
        let day = today.checked_add_days(Days::new(offset))?;
        let candidate = tz.from_local_datetime(&day.and_time(at)).earliest()?;
        (candidate > *now).then_some(candidate)
    })
}

/// Spawn the rollover loop on the current tokio runtime.
///
/// The loop sleeps until the next local `at`, clears all real-time data and
/// repeats until `shutdown` flips to true or its sender is dropped.
pub fn spawn_rollover<G>(
    engine: Arc<MarketDataEngine<G>>,
    at: NaiveTime,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    G: PersistenceGateway + 'static,
{
    tokio::spawn(async move {
        loop {
            let now = Local::now();
            let Some(next) = next_rollover(&now, at) else {
                warn!(%at, "No representable rollover time, stopping rollover");
                return;
            };
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next = %next, "Next real-time rollover scheduled");

            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Rollover stopped");
                        return;
                    }
                }
                () = tokio::time::sleep(wait) => {
                    engine.clear_all_realtime();
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn utc(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_time(time(h, m))
            .and_utc()
    }

    #[test]
    fn later_today_when_before_cutoff() {
        assert_eq!(next_rollover(&utc(4, 9, 30), time(15, 30)), Some(utc(4, 15, 30)));
    }

    #[test]
    fn tomorrow_when_past_cutoff() {
        assert_eq!(next_rollover(&utc(4, 16, 0), time(15, 30)), Some(utc(5, 15, 30)));
    }

    #[test]
    fn exactly_at_cutoff_moves_to_next_day() {
        assert_eq!(next_rollover(&utc(4, 15, 30), time(15, 30)), Some(utc(5, 15, 30)));
    }

    /// UTC, except that 02:00 to 03:00 local on 2024-03-10 does not exist.
    #[derive(Debug, Clone, Copy)]
    struct GapZone;

    impl TimeZone for GapZone {
        type Offset = chrono::FixedOffset;

        fn from_offset(_offset: &Self::Offset) -> Self {
            GapZone
        }

        fn offset_from_local_date(&self, _local: &NaiveDate) -> chrono::LocalResult<Self::Offset> {
            chrono::LocalResult::Single(utc_offset())
        }

        fn offset_from_local_datetime(
            &self,
            local: &chrono::NaiveDateTime,
        ) -> chrono::LocalResult<Self::Offset> {
            let gap_day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
            if local.date() == gap_day && (2..3).contains(&chrono::Timelike::hour(local)) {
                chrono::LocalResult::None
            } else {
                chrono::LocalResult::Single(utc_offset())
            }
        }

        fn offset_from_utc_date(&self, _utc: &NaiveDate) -> Self::Offset {
            utc_offset()
        }

        fn offset_from_utc_datetime(&self, _utc: &chrono::NaiveDateTime) -> Self::Offset {
            utc_offset()
        }
    }

    fn utc_offset() -> chrono::FixedOffset {
        chrono::FixedOffset::east_opt(0).unwrap()
    }

    fn gap_zone(day: u32, h: u32, m: u32) -> DateTime<GapZone> {
        GapZone.from_utc_datetime(&utc(day, h, m).naive_utc())
    }

    #[test]
    fn day_with_cutoff_in_gap_is_skipped() {
        assert_eq!(
            next_rollover(&gap_zone(9, 12, 0), time(2, 30)),
            Some(gap_zone(11, 2, 30))
        );
        assert_eq!(
            next_rollover(&gap_zone(9, 12, 0), time(3, 30)),
            Some(gap_zone(10, 3, 30))
        );
    }

    #[tokio::test]
    async fn loop_exits_on_shutdown() {
        use crate::testkit::gateway::MemoryGateway;

        let engine = Arc::new(MarketDataEngine::new(Arc::new(MemoryGateway::new())));
        let (tx, rx) = watch::channel(false);
        let handle = spawn_rollover(engine, time(15, 30), rx);

        tx.send(true).unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
