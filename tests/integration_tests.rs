//! Integration tests across core, orchestrator, tools and context.
//!
//! Participants are scripted; tools, sinks and validators are the real ones
//! writing into temporary session directories.

use std::sync::Arc;

use parley::context::{ContextSelector, Corpus, WordMatchSelector, database_prompt};
use parley::core::{Arguments, ChatRecord, Message, Participant, ToolError};
use parley::orchestrator::{ConversationError, JsonFileSink, MemorySink, Orchestrator};
use parley::tools::{
    RUN_SQL_SUCCESS, RunSqlTool, Session, SqlDatabase, WriteFileTool, WriteJsonFileTool,
    WriteYamlFileTool, validate_report_files, validate_run_sql,
};
use parley_testing::{RecordingValidator, ScriptedParticipant};

fn boxed(p: ScriptedParticipant) -> Box<dyn Participant> {
    Box::new(p)
}

fn args(pairs: &[(&str, &str)]) -> Arguments {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn shop_db(session: &Session) -> Arc<SqlDatabase> {
    let db = SqlDatabase::open(session.file_path("shop.db")).unwrap();
    db.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, city TEXT);
         CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER, total REAL);
         INSERT INTO users (name, city) VALUES ('ada', 'LA'), ('grace', 'NY');",
    )
    .unwrap();
    Arc::new(db)
}

fn session() -> (tempfile::TempDir, Session) {
    let base = tempfile::tempdir().unwrap();
    let session = Session::with_id(base.path(), "users_in_la__10_00_00");
    session.reset_files().unwrap();
    (base, session)
}

fn data_engineering_team(
    session: &Session,
    db: Arc<SqlDatabase>,
    sql: &str,
) -> Vec<Box<dyn Participant>> {
    vec![
        boxed(ScriptedParticipant::new("Admin")),
        boxed(ScriptedParticipant::new("Engineer").replying(sql)),
        boxed(
            ScriptedParticipant::new("Sr_Data_Analyst")
                .replying_with(Message::tool_request("run_sql", args(&[("sql", sql)])))
                .with_tool(RunSqlTool::new(db, session.run_sql_results_file())),
        ),
        boxed(ScriptedParticipant::new("Product_Manager").replying("APPROVED")),
    ]
}

#[test]
fn sequential_sql_conversation_delivers_and_audits() {
    let (_base, session) = session();
    let db = shop_db(&session);
    let sql = "SELECT name FROM users WHERE city = 'LA'";
    let chat_file = session.agent_chat_file("data_engr");

    let result = Orchestrator::new("data_engr", data_engineering_team(&session, db, sql))
        .unwrap()
        .with_audit_sink(Box::new(JsonFileSink::new(&chat_file)))
        .sequential_conversation("users in LA", || {
            validate_run_sql(&session.run_sql_results_file())
        })
        .unwrap();

    assert!(result.success());
    assert_eq!(result.last_message_text(), "APPROVED");
    assert!(result.transcript().contains(&Message::tool_result("run_sql", RUN_SQL_SUCCESS)));

    let rows: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(session.run_sql_results_file()).unwrap(),
    )
    .unwrap();
    assert_eq!(rows, serde_json::json!([{ "name": "ada" }]));

    let persisted: Vec<ChatRecord> =
        serde_json::from_str(&std::fs::read_to_string(&chat_file).unwrap()).unwrap();
    assert_eq!(persisted, result.chat_log());
}

#[test]
fn failing_query_aborts_after_persisting_prior_exchanges() {
    let (_base, session) = session();
    let db = shop_db(&session);
    let sink = MemorySink::new();
    let validator = RecordingValidator::passing();

    let err = Orchestrator::new(
        "data_engr",
        data_engineering_team(&session, db, "SELECT * FROM nowhere"),
    )
    .unwrap()
    .with_audit_sink(Box::new(sink.clone()))
    .sequential_conversation("broken", validator.as_fn())
    .unwrap_err();

    assert!(matches!(
        err,
        ConversationError::Tool(ToolError::ExecutionFailed { ref tool, .. }) if tool == "run_sql"
    ));
    assert_eq!(validator.calls(), 0);
    // Two basic exchanges made it to the sink before the tool failed
    assert_eq!(sink.records().len(), 4);
    assert!(!session.run_sql_results_file().exists());
}

#[test]
fn broadcast_report_team_writes_every_format() {
    let (_base, session) = session();
    let dir = session.root_dir();

    let text = ScriptedParticipant::new("Text_Report_Analyst")
        .replying_with(Message::tool_request(
            "write_file",
            args(&[("content", "Two users, one in LA.")]),
        ))
        .with_tool(WriteFileTool::new(dir));
    let json = ScriptedParticipant::new("JSON_Report_Analyst")
        .replying_with(Message::tool_request(
            "write_json_file",
            args(&[("fname", "report.json"), ("json_str", "{'users': 2}")]),
        ))
        .with_tool(WriteJsonFileTool::new(dir));
    let yml = ScriptedParticipant::new("YML_Report_Analyst")
        .replying_with(Message::tool_request(
            "write_yml_file",
            args(&[("json_str", "{'users': 2}")]),
        ))
        .with_tool(WriteYamlFileTool::new(dir));
    let memories = [text.memories(), json.memories(), yml.memories()];

    let result = Orchestrator::new(
        "data_report",
        vec![
            boxed(ScriptedParticipant::new("Admin")),
            boxed(text),
            boxed(json),
            boxed(yml),
        ],
    )
    .unwrap()
    .broadcast_conversation("Summarize the users", || validate_report_files(dir))
    .unwrap();

    assert!(result.success(), "{}", result.error_message());
    assert!(result.skipped_steps().is_empty());
    for memory in &memories {
        assert_eq!(memory.len(), 1);
    }

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("report.json")).unwrap()).unwrap();
    assert_eq!(report, serde_json::json!({ "users": 2 }));
    assert_eq!(
        std::fs::read_to_string(dir.join("write_yml_file.yml")).unwrap(),
        "users: 2\n"
    );
}

#[test]
fn seed_prompt_carries_only_matching_tables() {
    let (_base, session) = session();
    let db = shop_db(&session);
    let corpus: Corpus = db.table_definitions().unwrap().into_iter().collect();

    let request = "Which users spent the most on orders";
    let tables = WordMatchSelector.select(request, &corpus).unwrap();
    assert_eq!(tables, vec!["orders", "users"]);

    let prompt = database_prompt(request, &corpus.definitions_for(&tables));
    assert!(prompt.starts_with("Fulfill this database query: Which users spent"));
    let orders_at = prompt.find("CREATE TABLE orders").unwrap();
    let users_at = prompt.find("CREATE TABLE users").unwrap();
    assert!(orders_at < users_at);
}
