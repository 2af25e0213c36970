//! # Parley Tools
//!
//! Concrete tools exposed by team members, plus the session instruments and
//! validators that surround a conversation.
//!
//! ## Available Tools
//!
//! - **run_sql**: run a query against SQLite, deliver rows to a JSON file
//! - **write_file**: write text verbatim
//! - **write_json_file**: parse and pretty-print JSON
//! - **write_yml_file**: parse and re-emit YAML
//! - **write_innovation_file**: write numbered JSON files

pub mod files;
pub mod session;
pub mod sql;
pub mod validators;

pub use files::{InnovationFileTool, WriteFileTool, WriteJsonFileTool, WriteYamlFileTool};
pub use session::{RUN_SQL_RESULTS_FILE, Session, session_id};
pub use sql::{RUN_SQL_SUCCESS, RunSqlTool, SqlDatabase, SqlError, SqlResult};
pub use validators::{
    innovation_file_count, validate_innovation_dir, validate_innovation_files,
    validate_report_files, validate_run_sql,
};
