use sqlx::{
    Sqlite,
    pool::PoolConnection,
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
    },
};
use tempdir::TempDir;
use tokio::sync::{RwLock, RwLockReadGuard};

use anyhow::Context;
use std::{
    fs::{self, File},
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use tar::{Archive, Builder};
use zstd::stream::{read::Decoder as ZstdDecoder, write::Encoder as ZstdEncoder};

const DB_FILE_NAME: &str = "registry.db";

pub(super) struct RegistryState {
    registry_file: PathBuf,
    working_dir: TempDir,
    pool: RwLock<SqlitePool>,
}

impl std::fmt::Debug for RegistryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryState")
            .field("registry_file", &self.registry_file)
            .field("working_dir", &self.working_dir.path())
            .finish()
    }
}

fn connect_options(db_file: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_file)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
}

fn write_empty_archive(path: &Path) -> anyhow::Result<()> {
    let out = File::create(path)
        .with_context(|| format!("Failed to create registry archive {:?}", path))?;
    let encoder = ZstdEncoder::new(out, 3)
        .with_context(|| format!("Failed to create zstd encoder for {:?}", path))?;
    let tar = Builder::new(encoder);
    let encoder = tar
        .into_inner()
        .with_context(|| format!("Failed to finalize empty tar {:?}", path))?;
    encoder
        .finish()
        .with_context(|| format!("Failed to finalize empty zstd stream {:?}", path))?;
    Ok(())
}

impl RegistryState {
    /// Acquire a pooled connection and hold the pool read lock for the entire lifetime
    /// of the returned guard.
    pub(super) async fn conn(&self) -> anyhow::Result<DbConnGuard<'_>> {
        let pool_guard = self.pool.read().await;

        // The read lock stays held inside DbConnGuard so a concurrent save
        // cannot close the pool under an in-flight query.
        let conn = pool_guard.acquire().await?;

        Ok(DbConnGuard {
            _pool_guard: pool_guard,
            conn,
        })
    }

    /// Pack the working directory into the registry archive.
    fn save_tar_zstd(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.registry_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let out = File::create(&self.registry_file).with_context(|| {
            format!("Failed to create registry archive {:?}", self.registry_file)
        })?;
        let encoder = ZstdEncoder::new(out, 3).with_context(|| {
            format!("Failed to create zstd encoder for {:?}", self.registry_file)
        })?;
        let mut tar = Builder::new(encoder);

        // WAL side files are empty after the checkpoint; only the database goes in.
        tar.append_path_with_name(self.working_dir.path().join(DB_FILE_NAME), DB_FILE_NAME)
            .with_context(|| format!("Failed to add {} to tar", DB_FILE_NAME))?;

        let encoder = tar
            .into_inner()
            .with_context(|| format!("Failed to finalize tar for {:?}", self.registry_file))?;
        encoder.finish().with_context(|| {
            format!("Failed to finalize zstd stream for {:?}", self.registry_file)
        })?;

        Ok(())
    }

    pub(super) async fn save_registry(&self) -> anyhow::Result<()> {
        self.close_and_pack(true).await
    }

    /// Exclusive close+pack: the write lock waits out in-flight queries, the
    /// WAL is folded into the database, and the pool is closed before packing.
    pub(super) async fn close_and_pack(&self, reopen: bool) -> anyhow::Result<()> {
        let mut pool_guard = self.pool.write().await;

        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE);")
            .execute(&*pool_guard)
            .await?;
        pool_guard.close().await;

        self.save_tar_zstd()?;
        tracing::debug!(registry = ?self.registry_file, "registry archive written");

        if reopen {
            let db_file = self.working_dir.path().join(DB_FILE_NAME);
            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(connect_options(&db_file))
                .await?;
            *pool_guard = pool;
        }
        Ok(())
    }

    pub(super) async fn new<P: AsRef<Path>>(registry_file: P) -> anyhow::Result<Self> {
        let registry_file = registry_file.as_ref().to_path_buf();

        if !registry_file.is_file() {
            if registry_file.parent().map(|p| p.is_dir()).unwrap_or(false)
                || registry_file.parent() == Some(Path::new(""))
            {
                write_empty_archive(&registry_file)?;
                tracing::info!(registry = ?registry_file, "created new registry archive");
            } else {
                anyhow::bail!("Registry file parent does not exist: {:?}", registry_file);
            }
        }

        let working_dir = TempDir::new("applicant_registry")?;

        {
            let f = File::open(&registry_file)
                .with_context(|| format!("Failed to open registry archive {:?}", registry_file))?;
            let decoder = ZstdDecoder::new(f)
                .with_context(|| format!("Invalid zstd stream in {:?}", registry_file))?;
            let mut archive = Archive::new(decoder);
            archive.unpack(working_dir.path()).with_context(|| {
                format!(
                    "Failed to extract archive {:?} into {:?}",
                    registry_file,
                    working_dir.path()
                )
            })?;
        }

        let db_file = working_dir.path().join(DB_FILE_NAME);
        if !db_file.is_file() {
            File::create(&db_file)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options(&db_file))
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self {
            registry_file,
            working_dir,
            pool: RwLock::new(pool),
        })
    }
}

pub(super) struct DbConnGuard<'a> {
    _pool_guard: RwLockReadGuard<'a, SqlitePool>,
    conn: PoolConnection<Sqlite>,
}

impl Deref for DbConnGuard<'_> {
    type Target = PoolConnection<Sqlite>;
    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for DbConnGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl Drop for RegistryState {
    fn drop(&mut self) {
        // Blocking on the pack is impossible from inside a runtime; callers in
        // async code must call save_registry() before dropping.
        if tokio::runtime::Handle::try_current().is_ok() {
            return;
        }
        let result = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(async { self.close_and_pack(false).await }),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to save registry on drop");
        }
    }
}
