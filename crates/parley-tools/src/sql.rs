//! SQLite access for the data engineering team.
//!
//! [`SqlDatabase`] runs ad-hoc queries and describes the schema for prompts.
//! [`RunSqlTool`] exposes query execution as the `run_sql` tool, delivering
//! rows to a JSON results file instead of returning them inline.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use parley_core::{Arguments, Tool, ToolError, ToolResult};
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

/// Result type for database operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised by [`SqlDatabase`]
#[derive(Error, Debug)]
pub enum SqlError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Result serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write results to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Database connection lock poisoned")]
    Poisoned,
}

/// One result row, column name to JSON value
pub type Row = Map<String, Value>;

/// Thread-safe handle on a SQLite connection.
pub struct SqlDatabase {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqlDatabase {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> SqlResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "Opened SQLite database");
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> SqlResult<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn connection(&self) -> SqlResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| SqlError::Poisoned)
    }

    /// Execute one or more statements that return no rows
    pub fn execute_batch(&self, sql: &str) -> SqlResult<()> {
        self.connection()?.execute_batch(sql)?;
        Ok(())
    }

    /// Run a query and collect every row as a JSON object.
    pub fn run_sql(&self, sql: &str) -> SqlResult<Vec<Row>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut object = Map::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                object.insert(column.clone(), to_json(row.get_ref(index)?));
            }
            out.push(object);
        }

        debug!(rows = out.len(), "Query returned");
        Ok(out)
    }

    /// Run a query and render the rows as a pretty JSON array
    pub fn run_sql_json(&self, sql: &str) -> SqlResult<String> {
        let rows = self.run_sql(sql)?;
        Ok(serde_json::to_string_pretty(&rows)?)
    }

    /// Names of all user tables, sorted
    pub fn table_names(&self) -> SqlResult<Vec<String>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// `(table name, CREATE TABLE statement)` for every user table, sorted by
    /// name
    pub fn table_definitions(&self) -> SqlResult<Vec<(String, String)>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT name, sql FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let definitions = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)? + ";"))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(definitions)
    }

    /// Every table definition, separated by blank lines
    pub fn table_definitions_for_prompt(&self) -> SqlResult<String> {
        Ok(self
            .table_definitions()?
            .into_iter()
            .map(|(_, definition)| definition)
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

impl std::fmt::Debug for SqlDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlDatabase")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => {
            Value::String(bytes.iter().map(|b| format!("{b:02x}")).collect())
        }
    }
}

/// Status returned by `run_sql` on success
pub const RUN_SQL_SUCCESS: &str = "Successfully delivered results to json file";

/// The `run_sql` tool.
///
/// Takes a single `sql` argument, runs it, and overwrites the results file
/// with the rows.
#[derive(Debug, Clone)]
pub struct RunSqlTool {
    db: Arc<SqlDatabase>,
    results_path: PathBuf,
}

impl RunSqlTool {
    pub const NAME: &'static str = "run_sql";

    pub fn new(db: Arc<SqlDatabase>, results_path: impl Into<PathBuf>) -> Self {
        Self {
            db,
            results_path: results_path.into(),
        }
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }
}

impl Tool for RunSqlTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Run a SQL query against the database"
    }

    fn input_schema(&self) -> Option<Value> {
        Some(serde_json::json!({
            "type": "object",
            "properties": {
                "sql": {
                    "type": "string",
                    "description": "The SQL query to run"
                }
            },
            "required": ["sql"]
        }))
    }

    fn invoke(&self, arguments: &Arguments) -> ToolResult<String> {
        let sql = arguments
            .get("sql")
            .ok_or_else(|| ToolError::missing_argument(Self::NAME, "sql"))?;

        let json = self
            .db
            .run_sql_json(sql)
            .map_err(|e| ToolError::execution_failed(Self::NAME, e.to_string()))?;

        std::fs::write(&self.results_path, json).map_err(|e| ToolError::io(Self::NAME, e))?;
        info!(path = %self.results_path.display(), "Delivered query results");

        Ok(RUN_SQL_SUCCESS.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqlDatabase {
        let db = SqlDatabase::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, score REAL);
             CREATE TABLE jobs (id INTEGER PRIMARY KEY, title TEXT);
             INSERT INTO users (name, score) VALUES ('ada', 9.5), ('linus', NULL);",
        )
        .unwrap();
        db
    }

    #[test]
    fn rows_become_json_objects() {
        let rows = seeded().run_sql("SELECT name, score FROM users ORDER BY id").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "ada");
        assert_eq!(rows[0]["score"], 9.5);
        assert_eq!(rows[1]["score"], Value::Null);
    }

    #[test]
    fn table_definitions_are_sorted_create_statements() {
        let db = seeded();
        assert_eq!(db.table_names().unwrap(), vec!["jobs", "users"]);

        let prompt = db.table_definitions_for_prompt().unwrap();
        let parts: Vec<&str> = prompt.split("\n\n").collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with("CREATE TABLE jobs"));
        assert!(parts[1].starts_with("CREATE TABLE users"));
        assert!(parts[1].ends_with(';'));
    }

    #[test]
    fn run_sql_tool_writes_results_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_sql_results.json");
        let tool = RunSqlTool::new(Arc::new(seeded()), &path);

        let mut args = Arguments::new();
        args.insert("sql".into(), "SELECT COUNT(*) AS total FROM users".into());

        assert_eq!(tool.invoke(&args).unwrap(), RUN_SQL_SUCCESS);
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!([{ "total": 2 }]));
    }

    #[test]
    fn run_sql_tool_requires_sql() {
        let dir = tempfile::tempdir().unwrap();
        let tool = RunSqlTool::new(Arc::new(seeded()), dir.path().join("out.json"));
        let err = tool.invoke(&Arguments::new()).unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument { .. }));
    }

    #[test]
    fn run_sql_tool_propagates_query_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let tool = RunSqlTool::new(Arc::new(seeded()), &path);

        let mut args = Arguments::new();
        args.insert("sql".into(), "SELECT * FROM missing_table".into());

        let err = tool.invoke(&args).unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
        assert!(!path.exists());
    }
}
