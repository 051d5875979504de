//! SQLite gateway: raw passthroughs, the async job queue and write-behind.

mod harness;

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use diesel::sql_types::{BigInt, Text};
use diesel::{QueryableByName, SqliteConnection};
use harness::temp_db::TempDb;
use rust_decimal_macros::dec;
use sharecache::adapter::outbound::sqlite::database::create_pool;
use sharecache::adapter::outbound::sqlite::JobQueue;
use sharecache::application::MarketDataEngine;
use sharecache::domain::InstrumentCode;
use sharecache::error::Result;
use sharecache::port::{JobKind, JobOutput, NoRows, PersistenceGateway};
use sharecache::testkit::domain::{bar, date, profile, tick, timestamp};

const WAIT: Duration = Duration::from_secs(5);

#[derive(QueryableByName, Debug, PartialEq)]
struct CodeRow {
    #[diesel(sql_type = Text)]
    code: String,
}

#[derive(QueryableByName, Debug)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

fn seeded(name: &str) -> (TempDb, sharecache::adapter::outbound::sqlite::SqliteGateway) {
    let db = TempDb::create(name);
    let gateway = db.gateway(8);
    gateway
        .save_profile(&profile("600000", "PF Bank"))
        .expect("save profile");
    gateway
        .save_profile(&profile("000001", "PA Bank"))
        .expect("save profile");
    (db, gateway)
}

#[test]
fn read_rows_returns_caller_typed_rows() {
    let (_db, gateway) = seeded("gw-read");

    let rows: Vec<CodeRow> = gateway
        .read_rows("SELECT code FROM instruments ORDER BY code")
        .expect("read");

    assert_eq!(
        rows,
        vec![
            CodeRow { code: "000001".into() },
            CodeRow { code: "600000".into() },
        ]
    );
}

#[test]
fn write_statement_reports_affected_rows() {
    let (_db, gateway) = seeded("gw-write");

    let affected = gateway
        .write_statement("UPDATE instruments SET visit_heat = visit_heat + 1")
        .expect("write");

    assert_eq!(affected, 2);
}

#[test]
fn malformed_statement_is_an_error() {
    let (_db, gateway) = seeded("gw-bad-sql");

    assert!(gateway.write_statement("UPDATE nowhere SET x = 1").is_err());
    assert!(gateway.read_rows::<CodeRow>("SELEC code").is_err());
}

#[test]
fn execute_procedure_returns_rows() {
    let (_db, gateway) = seeded("gw-procedure");

    let rows: Vec<CountRow> = gateway
        .execute_procedure("SELECT COUNT(*) AS n FROM instruments")
        .expect("procedure");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].n, 2);
}

#[test]
fn async_jobs_invoke_callbacks_in_order() {
    let (_db, gateway) = seeded("gw-async");
    let (tx, rx) = mpsc::channel();

    let write_tx = tx.clone();
    assert!(gateway.submit_async_job::<NoRows, _>(
        "DELETE FROM instruments WHERE code = '000001'".to_string(),
        JobKind::Write,
        move |result: Result<JobOutput<NoRows>>| {
            let _ = write_tx.send(("write", result.map(|out| out.count()).ok()));
        },
    ));
    assert!(gateway.submit_async_job::<CodeRow, _>(
        "SELECT code FROM instruments".to_string(),
        JobKind::Read,
        move |result: Result<JobOutput<CodeRow>>| {
            let _ = tx.send(("read", result.map(|out| out.count()).ok()));
        },
    ));

    assert_eq!(rx.recv_timeout(WAIT).expect("write callback"), ("write", Some(1)));
    assert_eq!(rx.recv_timeout(WAIT).expect("read callback"), ("read", Some(1)));
}

#[test]
fn failing_async_job_reports_error_to_callback() {
    let (_db, gateway) = seeded("gw-async-err");
    let (tx, rx) = mpsc::channel();

    assert!(gateway.submit_async_job::<NoRows, _>(
        "INSERT INTO nowhere VALUES (1)".to_string(),
        JobKind::Write,
        move |result: Result<JobOutput<NoRows>>| {
            let _ = tx.send(result.is_err());
        },
    ));

    assert!(rx.recv_timeout(WAIT).expect("callback"));
}

#[test]
fn async_job_after_shutdown_is_rejected() {
    let (_db, gateway) = seeded("gw-shutdown");
    gateway.shutdown();

    let accepted = gateway.submit_async_job::<NoRows, _>(
        "SELECT 1".to_string(),
        JobKind::Read,
        |_result: Result<JobOutput<NoRows>>| panic!("callback must not run"),
    );

    assert!(!accepted);
}

#[test]
fn full_queue_rejects_without_blocking() {
    let db = TempDb::create("gw-full");
    let pool = create_pool(&db.url(), 2).expect("pool");
    let queue = JobQueue::start(pool, 1, 1000).expect("queue");

    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    assert!(queue.submit(Box::new(move |_conn: Result<&mut SqliteConnection>| {
        let _ = started_tx.send(());
        let _ = release_rx.recv_timeout(WAIT);
    })));
    started_rx.recv_timeout(WAIT).expect("first job started");

    assert!(queue.submit(Box::new(|_conn: Result<&mut SqliteConnection>| {})));
    assert!(!queue.submit(Box::new(|_conn: Result<&mut SqliteConnection>| {})));

    let _ = release_tx.send(());
    queue.shutdown();
}

#[test]
fn write_behind_persists_accepted_updates() {
    let (_db, gateway) = seeded("gw-write-behind");
    let engine = MarketDataEngine::new(Arc::new(gateway)).with_write_behind(true);
    engine.load_all().expect("load");
    let code = InstrumentCode::from("600000");

    engine.update_realtime(
        timestamp(0),
        vec![
            tick("600000", 0, dec!(10.05)).with_prev_close(dec!(10.00)),
            tick("UNKNOWN", 0, dec!(1)),
        ],
    );
    assert!(engine.update_historical_by_date(&code, date(2), bar(2, dec!(10.00))));
    engine.gateway().shutdown();

    let ticks = engine
        .gateway()
        .fetch_realtime_ticks(&code)
        .expect("ticks");
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0].0, timestamp(0));
    assert_eq!(ticks[0].1.price, dec!(10.05));
    assert_eq!(ticks[0].1.prev_close, dec!(10.00));

    let bars = engine
        .gateway()
        .fetch_historical_bars(&code)
        .expect("bars");
    assert_eq!(bars, vec![bar(2, dec!(10.00))]);
    assert!(engine
        .gateway()
        .fetch_realtime_ticks(&InstrumentCode::from("UNKNOWN"))
        .expect("ticks")
        .is_empty());
}

#[test]
fn concurrent_write_behind_leaves_store_matching_cache() {
    let db = TempDb::create("gw-write-order");
    let gateway = db.gateway(1024);
    gateway
        .save_profile(&profile("600000", "PF Bank"))
        .expect("save profile");
    let engine = Arc::new(MarketDataEngine::new(Arc::new(gateway)).with_write_behind(true));
    engine.load_all().expect("load");
    let code = InstrumentCode::from("600000");

    let writers: Vec<_> = (0..4i64)
        .map(|w| {
            let engine = Arc::clone(&engine);
            let code = code.clone();
            std::thread::spawn(move || {
                for i in 0..50i64 {
                    let close = rust_decimal::Decimal::new(w * 10_000 + i, 2);
                    assert!(engine.update_historical_by_date(&code, date(3), bar(3, close)));
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().expect("writer panicked");
    }
    engine.gateway().shutdown();

    let cached = engine.get_historical_by_date(&code, date(3)).expect("bar");
    let stored = engine.gateway().fetch_historical_bars(&code).expect("bars");
    assert_eq!(stored, vec![cached]);
}

#[test]
fn clearing_realtime_purges_persisted_ticks() {
    let (_db, gateway) = seeded("gw-purge");
    let engine = MarketDataEngine::new(Arc::new(gateway)).with_write_behind(true);
    engine.load_all().expect("load");
    let code = InstrumentCode::from("600000");

    engine.update_realtime(timestamp(0), vec![tick("600000", 0, dec!(10.05))]);
    assert!(engine.clear_all_realtime());
    engine.update_realtime(timestamp(5), vec![tick("600000", 5, dec!(10.07))]);
    engine.gateway().shutdown();

    let ticks = engine.gateway().fetch_realtime_ticks(&code).expect("ticks");
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0].0, timestamp(5));
}
