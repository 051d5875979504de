use std::path::{Path, PathBuf};

use diesel::prelude::*;
use sharecache::adapter::outbound::sqlite::database::{create_pool, run_migrations};
use sharecache::adapter::outbound::sqlite::SqliteGateway;
use sharecache::infrastructure::config::database::DatabaseConfig;
use sharecache::testkit::config;
use tempfile::TempDir;

/// Temporary SQLite database for integration tests.
///
/// The file lives in its own temporary directory, removed on drop.
pub struct TempDb {
    dir: TempDir,
    path: PathBuf,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(format!("{name}.db"));

        let pool = create_pool(&path.to_string_lossy(), 1).expect("create sqlite pool");
        run_migrations(&pool).expect("run migrations");

        // WAL mode lets the job worker write while tests read.
        {
            let mut conn = pool.get().expect("get sqlite connection");
            diesel::sql_query("PRAGMA journal_mode=WAL")
                .execute(&mut conn)
                .expect("enable WAL mode");
        }

        Self { dir, path }
    }

    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            pool_size: 4,
            ..config::database(&self.url())
        }
    }

    /// Gateway over this database with a job queue of `queue_capacity`.
    pub fn gateway(&self, queue_capacity: usize) -> SqliteGateway {
        SqliteGateway::connect(&self.database_config(), &config::jobs(queue_capacity))
            .expect("connect gateway")
    }

    /// Write a config file pointing at this database and return its path.
    pub fn write_config(&self, extra: &str) -> PathBuf {
        let path = self.dir.path().join("config.toml");
        let contents = format!("{}{extra}", config::toml(&self.url()));
        std::fs::write(&path, contents).expect("write config");
        path
    }
}
