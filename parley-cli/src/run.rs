//! The `run` and `tables` commands.

use std::path::PathBuf;
use std::sync::Arc;

use parley::context::{
    CombinedSelector, ContextError, ContextSelector, Corpus, WordMatchSelector, database_prompt,
};
use parley::core::CoreError;
use parley::llm::{ChatBackend, ChatCompletionsClient, EmbeddingsClient, LlmError};
use parley::orchestrator::{
    ConversationError, ConversationResult, CostEstimator, HeuristicTokenizer, JsonFileSink,
    Orchestrator, Protocol, Tokenizer, TokenizerError,
};
use parley::tools::{Session, SqlDatabase, SqlError};
use tracing::{info, warn};

use crate::config::{ConfigError, ParleyConfig};
use crate::teams::Team;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sql(#[from] SqlError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize conversation result: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What a finished `run` leaves behind
#[derive(Debug)]
pub struct RunOutcome {
    pub session: Session,
    pub result: ConversationResult,
    pub cost_file: PathBuf,
}

/// Run one conversation against the configured model backend.
pub fn run(
    config: &ParleyConfig,
    prompt: &str,
    team: Team,
    protocol: Option<Protocol>,
) -> Result<RunOutcome, CliError> {
    let backend: Arc<dyn ChatBackend> = Arc::new(ChatCompletionsClient::new(config.llm.clone())?);
    let selector = selector(config)?;
    run_with(config, prompt, team, protocol, backend, &selector)
}

/// Run one conversation with an explicit backend and context selector.
pub fn run_with(
    config: &ParleyConfig,
    prompt: &str,
    team: Team,
    protocol: Option<Protocol>,
    backend: Arc<dyn ChatBackend>,
    selector: &dyn ContextSelector,
) -> Result<RunOutcome, CliError> {
    let session = Session::new(&config.base_dir, prompt);
    session.reset_files().map_err(|source| CliError::Io {
        path: session.root_dir().display().to_string(),
        source,
    })?;

    let db = Arc::new(SqlDatabase::open(&config.database_path)?);
    let corpus: Corpus = db.table_definitions()?.into_iter().collect();
    let tables = match selector.select(prompt, &corpus) {
        Ok(tables) => tables,
        Err(e) => {
            warn!(error = %e, "Context selection failed, falling back to word match");
            WordMatchSelector.select(prompt, &corpus)?
        }
    };
    info!(?tables, session = session.id(), "Selected table context");
    let seed = database_prompt(prompt, &corpus.definitions_for(&tables));

    let orchestrator = Orchestrator::new(
        team.orchestrator_name(),
        team.build(&session, db, backend)?,
    )?
    .with_audit_sink(Box::new(JsonFileSink::new(
        session.agent_chat_file(team.as_str()),
    )))
    .with_cost_estimator(cost_estimator(config)?);

    let protocol = protocol.unwrap_or_else(|| team.default_protocol());
    let validate = || team.validate(&session);
    let result = match protocol {
        Protocol::Sequential => orchestrator.sequential_conversation(seed, validate)?,
        Protocol::Broadcast => orchestrator.broadcast_conversation(seed, validate)?,
    };

    let cost_file = session.agent_cost_file(team.as_str());
    std::fs::write(&cost_file, serde_json::to_string_pretty(&result)?).map_err(|source| {
        CliError::Io {
            path: cost_file.display().to_string(),
            source,
        }
    })?;

    Ok(RunOutcome {
        session,
        result,
        cost_file,
    })
}

/// Table definitions of the configured database, ready for a prompt
pub fn tables(config: &ParleyConfig) -> Result<String, CliError> {
    Ok(SqlDatabase::open(&config.database_path)?.table_definitions_for_prompt()?)
}

fn selector(config: &ParleyConfig) -> Result<CombinedSelector, CliError> {
    if config.use_embeddings && config.llm.api_key.is_some() {
        let embedder = EmbeddingsClient::new(config.llm.clone())?;
        Ok(CombinedSelector::embedding_then_word_match(
            embedder,
            config.context_top_n,
        ))
    } else {
        Ok(CombinedSelector::new().with_selector(WordMatchSelector))
    }
}

fn cost_estimator(config: &ParleyConfig) -> Result<CostEstimator, CliError> {
    let Some(path) = &config.tokenizer_path else {
        warn!("No tokenizer_path configured, counting tokens by characters");
        return Ok(CostEstimator::new(
            Box::new(HeuristicTokenizer),
            config.token_rate,
        ));
    };

    #[cfg(feature = "hf-tokenizer")]
    let tokenizer: Box<dyn Tokenizer> = {
        let tokenizer = parley::orchestrator::HfTokenizer::from_file(path)?;
        info!(path = %path.display(), "Loaded tokenizer");
        Box::new(tokenizer)
    };

    #[cfg(not(feature = "hf-tokenizer"))]
    let tokenizer: Box<dyn Tokenizer> = {
        warn!(
            path = %path.display(),
            "tokenizer_path is set but the hf-tokenizer feature is disabled, counting tokens by characters"
        );
        Box::new(HeuristicTokenizer)
    };

    Ok(CostEstimator::new(tokenizer, config.token_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley::core::{Arguments, Message};
    use parley::llm::{ChatMessage, FunctionDefinition, LlmResult, Role};

    /// Answers by role: tool-equipped participants call their first function
    /// until they see its result, everyone else replies with fixed text.
    struct RoleBackend {
        sql: String,
    }

    impl ChatBackend for RoleBackend {
        fn complete(
            &self,
            messages: &[ChatMessage],
            functions: &[FunctionDefinition],
        ) -> LlmResult<Message> {
            if messages.last().is_some_and(|m| m.role == Role::Function) {
                return Ok(Message::plain("Report delivered"));
            }
            let mut arguments = Arguments::new();
            Ok(match functions.first().map(|f| f.name.as_str()) {
                Some("run_sql") => {
                    arguments.insert("sql".into(), self.sql.clone());
                    Message::tool_request("run_sql", arguments)
                }
                Some("write_file") => {
                    arguments.insert("content".into(), "3 users".into());
                    Message::tool_request("write_file", arguments)
                }
                Some("write_json_file") => {
                    arguments.insert("json_str".into(), "{'users': 3}".into());
                    Message::tool_request("write_json_file", arguments)
                }
                Some("write_yml_file") => {
                    arguments.insert("json_str".into(), "{'users': 3}".into());
                    Message::tool_request("write_yml_file", arguments)
                }
                Some("write_innovation_file") => {
                    arguments.insert("content".into(), "Reward the top 3 users".into());
                    Message::tool_request("write_innovation_file", arguments)
                }
                _ => Message::plain("SELECT COUNT(*) AS total FROM users; APPROVED"),
            })
        }
    }

    fn config(dir: &std::path::Path) -> ParleyConfig {
        let database_path = dir.join("shop.db");
        let db = SqlDatabase::open(&database_path).unwrap();
        db.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE jobs (id INTEGER PRIMARY KEY, title TEXT);
             INSERT INTO users (name) VALUES ('ada'), ('grace'), ('linus');",
        )
        .unwrap();

        ParleyConfig {
            database_path,
            base_dir: dir.join("agent_results"),
            use_embeddings: false,
            ..ParleyConfig::default()
        }
    }

    fn backend() -> Arc<RoleBackend> {
        Arc::new(RoleBackend {
            sql: "SELECT COUNT(*) AS total FROM users".into(),
        })
    }

    #[test]
    fn data_engineering_run_delivers_validated_results() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let outcome = run_with(
            &config,
            "How many users",
            Team::DataEngr,
            None,
            backend(),
            &WordMatchSelector,
        )
        .unwrap();

        assert!(outcome.result.success(), "{}", outcome.result.error_message());
        assert!(outcome.result.skipped_steps().is_empty());

        let rows = std::fs::read_to_string(outcome.session.run_sql_results_file()).unwrap();
        assert!(rows.contains("\"total\": 3"));

        let seed = outcome.result.transcript()[0].render().into_owned();
        assert!(seed.starts_with("Fulfill this database query: How many users"));
        assert!(seed.contains("CREATE TABLE users"));
        assert!(!seed.contains("CREATE TABLE jobs"));

        let chat: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(outcome.session.agent_chat_file("data_engr")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            chat.as_array().unwrap().len(),
            outcome.result.chat_log().len()
        );

        let cost: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&outcome.cost_file).unwrap()).unwrap();
        assert_eq!(cost["success"], true);
        assert_eq!(cost["tokens"], outcome.result.tokens());
    }

    #[test]
    fn data_report_run_writes_every_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let outcome = run_with(
            &config,
            "Summarize users",
            Team::DataReport,
            None,
            backend(),
            &WordMatchSelector,
        )
        .unwrap();

        assert!(outcome.result.success(), "{}", outcome.result.error_message());
        let root = outcome.session.root_dir();
        assert_eq!(
            std::fs::read_to_string(root.join("write_file.txt")).unwrap(),
            "3 users"
        );
        assert!(root.join("write_json_file.json").is_file());
        assert!(root.join("write_yml_file.yml").is_file());
    }

    #[test]
    fn innovation_run_numbers_each_idea() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let outcome = run_with(
            &config,
            "Ideas for users",
            Team::Innovation,
            None,
            backend(),
            &WordMatchSelector,
        )
        .unwrap();

        assert!(outcome.result.success(), "{}", outcome.result.error_message());
        let root = outcome.session.root_dir();
        assert_eq!(parley::tools::innovation_file_count(root), 2);
        assert_eq!(
            std::fs::read_to_string(root.join("1_innovation_file.json")).unwrap(),
            "Reward the top 3 users"
        );
    }

    #[test]
    fn failed_query_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let backend = Arc::new(RoleBackend {
            sql: "SELECT * FROM missing_table".into(),
        });

        let err = run_with(
            &config,
            "How many users",
            Team::DataEngr,
            None,
            backend,
            &WordMatchSelector,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Conversation(ConversationError::Tool(_))
        ));
    }

    #[cfg(feature = "hf-tokenizer")]
    #[test]
    fn unreadable_tokenizer_file_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = ParleyConfig {
            tokenizer_path: Some(dir.path().join("missing_tokenizer.json")),
            ..config(dir.path())
        };

        let err = run_with(
            &config,
            "How many users",
            Team::DataEngr,
            None,
            backend(),
            &WordMatchSelector,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Tokenizer(TokenizerError::Load { .. })));
    }

    #[test]
    fn tables_lists_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let definitions = tables(&config(dir.path())).unwrap();
        assert!(definitions.contains("CREATE TABLE jobs"));
        assert!(definitions.contains("CREATE TABLE users"));
    }
}
