//! The process-wide engine state and its command surface.
//!
//! Synchronous entry points run on the caller's thread and block on the
//! connection's mutex. Async entry points validate their arguments, enqueue
//! on the serialized executor and return a `Pending` that settles when the
//! host thread drains its `HostLoop`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use rusqlite::Connection;
use sqlhost_core::config::SqlHostConfig;
use sqlhost_core::constants::VERSION;
use sqlhost_core::errors::{ArgumentError, EngineError, LifecycleError, PoolError, SqlHostError};
use sqlhost_core::events::{HookHandler, HookKind};
use sqlhost_core::traits::{Cancellable, CancellationToken};
use sqlhost_core::types::{BatchCommand, BatchResult, QueryResult, ScriptResult, Value};
use sqlhost_core::SqlHostResult;
use tracing::{debug, error, info};

use crate::batch;
use crate::executor::SerialExecutor;
use crate::hooks::{HookDispatcher, StatementTap};
use crate::host::{host_channel, HostLoop, HostSender, Pending};
use crate::pool::WorkerPool;
use crate::query;
use crate::registry::ConnectionRegistry;
use crate::statement::PreparedStatement;

pub struct Runtime {
    config: SqlHostConfig,
    registry: Arc<ConnectionRegistry>,
    pool: Arc<WorkerPool>,
    executor: SerialExecutor,
    dispatcher: HookDispatcher,
    host: HostSender,
    generation: RwLock<CancellationToken>,
}

impl Runtime {
    /// Validate `config`, spawn the worker pool and open a fresh generation.
    /// The returned `HostLoop` belongs to the host thread.
    pub fn install(config: SqlHostConfig) -> SqlHostResult<(Self, HostLoop)> {
        SqlHostConfig::validate(&config)?;
        let pool = Arc::new(WorkerPool::new(config.pool.effective_workers())?);
        let (host, host_loop) = host_channel();
        let runtime = Self {
            registry: Arc::new(ConnectionRegistry::new(&config.storage)),
            executor: SerialExecutor::new(pool.clone()),
            dispatcher: HookDispatcher::new(host.clone()),
            pool,
            host,
            generation: RwLock::new(CancellationToken::new()),
            config,
        };
        info!(version = VERSION, workers = runtime.pool.size(), "sqlhost runtime installed");
        Ok((runtime, host_loop))
    }

    pub fn config(&self) -> &SqlHostConfig {
        &self.config
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Token of the current generation.
    pub fn generation(&self) -> CancellationToken {
        self.generation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_invalidated(&self) -> bool {
        self.generation().is_cancelled()
    }

    /// Teardown: invalidate the generation, close every connection,
    /// restart the pool discarding queued work, forget executor queues.
    /// Tasks already running finish their engine call but never report.
    pub fn clear_state(&self) {
        self.generation().cancel();
        let closed = self.registry.close_all();
        if let Err(err) = self.pool.restart() {
            error!(error = %err, "worker pool failed to restart");
        }
        self.executor.clear();
        info!(closed, "runtime state cleared");
    }

    /// Start a fresh generation for a new host context. Tears down first
    /// if the current generation is still live.
    pub fn reinstall(&self) {
        if !self.is_invalidated() {
            self.clear_state();
        }
        *self
            .generation
            .write()
            .unwrap_or_else(PoisonError::into_inner) = CancellationToken::new();
        info!("sqlhost runtime reinstalled");
    }

    // ---- Connections ----

    pub fn open(&self, name: &str, location: Option<&str>) -> SqlHostResult<()> {
        require_text("open", "name", name)?;
        require_location("open", location)?;
        self.live_generation()?;
        self.registry.open(name, location)?;
        Ok(())
    }

    pub fn attach(
        &self,
        name: &str,
        other_db_name: &str,
        alias: &str,
        location: Option<&str>,
    ) -> SqlHostResult<()> {
        require_text("attach", "name", name)?;
        require_text("attach", "database to attach", other_db_name)?;
        require_text("attach", "alias", alias)?;
        require_location("attach", location)?;
        self.live_generation()?;
        self.registry.attach(name, other_db_name, alias, location)
    }

    pub fn detach(&self, name: &str, alias: &str) -> SqlHostResult<()> {
        require_text("detach", "name", name)?;
        require_text("detach", "alias", alias)?;
        self.live_generation()?;
        self.registry.detach(name, alias)
    }

    pub fn close(&self, name: &str) -> SqlHostResult<()> {
        require_text("close", "name", name)?;
        self.live_generation()?;
        self.registry.close(name)
    }

    /// Close `name` if open, then delete its database file and sidecars.
    pub fn delete(&self, name: &str, location: Option<&str>) -> SqlHostResult<()> {
        require_text("delete", "name", name)?;
        require_location("delete", location)?;
        self.live_generation()?;
        self.registry.remove(name, location)
    }

    // ---- Statements ----

    pub fn execute(&self, name: &str, sql: &str, params: &[Value]) -> SqlHostResult<QueryResult> {
        require_text("execute", "name", name)?;
        require_text("execute", "sql", sql)?;
        self.run_sync(name, |conn, _| query::execute(conn, sql, params))
    }

    pub fn execute_async(
        &self,
        name: &str,
        sql: &str,
        params: Vec<Value>,
    ) -> SqlHostResult<Pending<QueryResult>> {
        require_text("execute_async", "name", name)?;
        require_text("execute_async", "sql", sql)?;
        let sql = sql.to_string();
        self.submit(name, move |conn, _| query::execute(conn, &sql, &params))
    }

    pub fn execute_batch(&self, name: &str, commands: &[BatchCommand]) -> SqlHostResult<BatchResult> {
        require_text("execute_batch", "name", name)?;
        require_commands("execute_batch", commands)?;
        self.run_sync(name, |conn, tap| {
            batch::execute_batch_with(conn, commands, |c| tap.after_statement(c))
        })
    }

    pub fn execute_batch_async(
        &self,
        name: &str,
        commands: Vec<BatchCommand>,
    ) -> SqlHostResult<Pending<BatchResult>> {
        require_text("execute_batch_async", "name", name)?;
        require_commands("execute_batch_async", &commands)?;
        self.submit(name, move |conn, tap| {
            batch::execute_batch_with(conn, &commands, |c| tap.after_statement(c))
        })
    }

    /// Read a SQL script on a worker and run its statements as one batch.
    pub fn load_file(
        &self,
        name: &str,
        path: impl AsRef<Path>,
    ) -> SqlHostResult<Pending<ScriptResult>> {
        require_text("load_file", "name", name)?;
        let path: PathBuf = path.as_ref().to_path_buf();
        if path.as_os_str().is_empty() {
            return Err(ArgumentError::new("load_file", "path must not be empty").into());
        }
        self.submit(name, move |conn, tap| {
            batch::load_script_with(conn, &path, |c| tap.after_statement(c))
        })
    }

    pub fn prepare_statement(&self, name: &str, sql: &str) -> SqlHostResult<PreparedStatement> {
        require_text("prepare_statement", "name", name)?;
        require_text("prepare_statement", "sql", sql)?;
        let generation = self.live_generation()?;
        let entry = self.registry.get(name)?;
        PreparedStatement::prepare(&entry, self.dispatcher.clone(), generation, sql)
    }

    // ---- Hooks ----

    pub fn update_hook(&self, name: &str, handler: Option<Arc<dyn HookHandler>>) -> SqlHostResult<()> {
        self.register_hook("update_hook", name, HookKind::Update, handler)
    }

    pub fn commit_hook(&self, name: &str, handler: Option<Arc<dyn HookHandler>>) -> SqlHostResult<()> {
        self.register_hook("commit_hook", name, HookKind::Commit, handler)
    }

    pub fn rollback_hook(
        &self,
        name: &str,
        handler: Option<Arc<dyn HookHandler>>,
    ) -> SqlHostResult<()> {
        self.register_hook("rollback_hook", name, HookKind::Rollback, handler)
    }

    fn register_hook(
        &self,
        command: &'static str,
        name: &str,
        kind: HookKind,
        handler: Option<Arc<dyn HookHandler>>,
    ) -> SqlHostResult<()> {
        require_text(command, "name", name)?;
        self.live_generation()?;
        let entry = self.registry.get(name)?;
        self.dispatcher.register(&entry, kind, handler)
    }

    // ---- Plumbing ----

    fn live_generation(&self) -> SqlHostResult<CancellationToken> {
        let generation = self.generation();
        if generation.is_cancelled() {
            return Err(LifecycleError::Invalidated.into());
        }
        Ok(generation)
    }

    fn run_sync<T, F>(&self, name: &str, work: F) -> SqlHostResult<T>
    where
        F: FnOnce(&Connection, &StatementTap<'_>) -> Result<T, EngineError>,
    {
        let generation = self.live_generation()?;
        let entry = self.registry.get(name)?;
        self.dispatcher.run(&entry, &generation, work)
    }

    /// Enqueue `work` for `name`. The connection is looked up when the task
    /// runs; the outcome settles the returned `Pending` on the host thread.
    fn submit<T, F>(&self, name: &str, work: F) -> SqlHostResult<Pending<T>>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &StatementTap<'_>) -> Result<T, EngineError> + Send + 'static,
    {
        let generation = self.live_generation()?;
        let (completer, pending) = Pending::channel();

        let registry = self.registry.clone();
        let dispatcher = self.dispatcher.clone();
        let task_name = name.to_string();
        let task_generation = generation.clone();
        let operation = move || -> SqlHostResult<T> {
            let entry = registry.get(&task_name)?;
            dispatcher.run(&entry, &task_generation, work)
        };

        let host = self.host.clone();
        let reply_generation = generation.clone();
        let reply_name = name.to_string();
        let continuation = move |outcome: Result<SqlHostResult<T>, PoolError>| {
            let result = outcome.map_err(SqlHostError::from).and_then(|r| r);
            if !host.post(&reply_generation, move || completer.settle(result)) {
                debug!(connection = %reply_name, "completion dropped by teardown");
            }
        };

        self.executor
            .submit(name, &generation, operation, continuation)?;
        Ok(pending)
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.generation().cancel();
        self.pool.shutdown();
        self.executor.clear();
        self.registry.close_all();
    }
}

fn require_text(command: &'static str, field: &str, value: &str) -> Result<(), ArgumentError> {
    if value.trim().is_empty() {
        return Err(ArgumentError::new(command, format!("{field} must not be empty")));
    }
    if value.contains('\0') {
        return Err(ArgumentError::new(command, format!("{field} must not contain NUL")));
    }
    Ok(())
}

fn require_location(command: &'static str, location: Option<&str>) -> Result<(), ArgumentError> {
    match location {
        Some(location) => require_text(command, "location", location),
        None => Ok(()),
    }
}

fn require_commands(command: &'static str, commands: &[BatchCommand]) -> Result<(), ArgumentError> {
    for (idx, cmd) in commands.iter().enumerate() {
        if cmd.sql.trim().is_empty() {
            return Err(ArgumentError::new(command, format!("command {idx} has empty sql")));
        }
    }
    Ok(())
}
