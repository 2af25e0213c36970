//! Per-conversation output directory and file naming.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveTime, Timelike};
use tracing::debug;

/// Maximum number of prompt characters kept in a session id
pub const SESSION_PROMPT_CHARS: usize = 30;

/// File the `run_sql` tool delivers its rows to
pub const RUN_SQL_RESULTS_FILE: &str = "run_sql_results.json";

/// Build a session id from a prompt and a wall-clock time.
///
/// The prompt is lower-cased, spaces become underscores, single quotes are
/// dropped, and the result is cut to [`SESSION_PROMPT_CHARS`] characters
/// before `__HH_MM_SS` is appended.
///
/// ```rust
/// use chrono::NaiveTime;
/// use parley_tools::session::session_id;
///
/// let at = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
/// assert_eq!(session_id("Count the users", at), "count_the_users__09_05_07");
/// ```
pub fn session_id(prompt: &str, at: NaiveTime) -> String {
    let slug: String = prompt
        .to_lowercase()
        .replace(' ', "_")
        .replace('\'', "")
        .chars()
        .take(SESSION_PROMPT_CHARS)
        .collect();
    format!(
        "{slug}__{:02}_{:02}_{:02}",
        at.hour(),
        at.minute(),
        at.second()
    )
}

/// Output directory for one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    root_dir: PathBuf,
}

impl Session {
    /// Session for `prompt` under `base_dir`, stamped with the local time
    pub fn new(base_dir: impl AsRef<Path>, prompt: &str) -> Self {
        Self::with_id(base_dir, session_id(prompt, Local::now().time()))
    }

    pub fn with_id(base_dir: impl AsRef<Path>, id: impl Into<String>) -> Self {
        let id = id.into();
        let root_dir = base_dir.as_ref().join(&id);
        Self { id, root_dir }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Create the root directory if needed and remove every file in it.
    pub fn reset_files(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root_dir)?;
        for entry in std::fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            if path.is_file() {
                std::fs::remove_file(&path)?;
            }
        }
        debug!(root = %self.root_dir.display(), "Reset session files");
        Ok(())
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    /// Chat log file for `team`
    pub fn agent_chat_file(&self, team: &str) -> PathBuf {
        self.file_path(&format!("agents_chat_{team}.json"))
    }

    /// Conversation result file for `team`
    pub fn agent_cost_file(&self, team: &str) -> PathBuf {
        self.file_path(&format!("agents_cost_{team}.json"))
    }

    pub fn run_sql_results_file(&self) -> PathBuf {
        self.file_path(RUN_SQL_RESULTS_FILE)
    }
}
