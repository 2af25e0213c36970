//! Team definitions
//!
//! A team is built fresh for every conversation. Participants own their
//! histories, so no two conversations share a participant.

use std::sync::Arc;

use clap::ValueEnum;
use parley::core::{
    CoreError, CoreResult, Participant, ParticipantId, ProxyParticipant, Tool, ToolTable, ValidationResult,
};
use parley::llm::{ChatBackend, LlmParticipant};
use parley::orchestrator::Protocol;
use parley::tools::{
    InnovationFileTool, RunSqlTool, Session, SqlDatabase, WriteFileTool, WriteJsonFileTool,
    WriteYamlFileTool, validate_innovation_dir, validate_report_files, validate_run_sql,
};

pub const COMPLETION_PROMPT: &str = "If everything looks good, respond with APPROVED";

pub const DATA_ENGINEER_PROMPT: &str = "A Data Engineer. You follow an approved plan. Generate the initial SQL based on the requirements provided. Send it to the Sr Data Analyst to be executed.";

pub const SR_DATA_ANALYST_PROMPT: &str = "Sr Data Analyst. You follow an approved plan. You run the SQL query, generate the response and send it to the product manager for final review";

pub const PRODUCT_MANAGER_PROMPT: &str =
    "Product Manager. Validate the response to make sure it is correct.";

pub const TEXT_REPORT_ANALYST_PROMPT: &str =
    "Text File Report Analyst. You exclusively use the write_file function on a summarized report.";

pub const JSON_REPORT_ANALYST_PROMPT: &str =
    "JSON Report Analyst. You exclusively use the write_json_file function on the report.";

pub const YML_REPORT_ANALYST_PROMPT: &str =
    "YAML Report Analyst. You exclusively use the write_yml_file function on the report.";

pub const PRODUCT_INNOVATION_ANALYST_PROMPT: &str = "Product Innovation Analyst. You propose one new product idea backed by the data and save it with the write_innovation_file function.";

pub const DATA_INNOVATION_ANALYST_PROMPT: &str = "Data Innovation Analyst. You propose one new way to use the data and save it with the write_innovation_file function.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Team {
    /// Admin, Engineer, Sr_Data_Analyst (run_sql), Product_Manager
    DataEngr,
    /// Admin plus text, JSON and YAML report analysts
    DataReport,
    /// Admin plus two analysts sharing one numbered innovation file writer
    Innovation,
}

impl Team {
    /// Key used in session file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::DataEngr => "data_engr",
            Team::DataReport => "data_report",
            Team::Innovation => "innovation",
        }
    }

    pub fn orchestrator_name(&self) -> &'static str {
        match self {
            Team::DataEngr => "Postgres Data Analytics Multi-Agent ::: Data Engineering Team",
            Team::DataReport => "Postgres Data Analytics Multi-Agent ::: Data Report Team",
            Team::Innovation => "Postgres Data Analytics Multi-Agent ::: Innovation Team",
        }
    }

    pub fn default_protocol(&self) -> Protocol {
        match self {
            Team::DataEngr => Protocol::Sequential,
            Team::DataReport | Team::Innovation => Protocol::Broadcast,
        }
    }

    /// Check the files this team was asked to produce
    pub fn validate(&self, session: &Session) -> ValidationResult {
        match self {
            Team::DataEngr => validate_run_sql(&session.run_sql_results_file()),
            Team::DataReport => validate_report_files(session.root_dir()),
            Team::Innovation => validate_innovation_dir(session.root_dir()),
        }
    }

    /// Build the participants, in conversation order.
    pub fn build(
        &self,
        session: &Session,
        db: Arc<SqlDatabase>,
        backend: Arc<dyn ChatBackend>,
    ) -> CoreResult<Vec<Box<dyn Participant>>> {
        let admin = boxed(ProxyParticipant::new(ParticipantId::parse("Admin")?));

        let team: Vec<Box<dyn Participant>> = match self {
            Team::DataEngr => vec![
                admin,
                boxed(assistant("Engineer", DATA_ENGINEER_PROMPT, &backend)?),
                boxed(
                    assistant("Sr_Data_Analyst", SR_DATA_ANALYST_PROMPT, &backend)?.with_tools(
                        tools(RunSqlTool::new(db, session.run_sql_results_file()))?,
                    ),
                ),
                boxed(assistant(
                    "Product_Manager",
                    &format!("{PRODUCT_MANAGER_PROMPT}{COMPLETION_PROMPT}"),
                    &backend,
                )?),
            ],
            Team::DataReport => vec![
                admin,
                boxed(
                    assistant("Text_Report_Analyst", TEXT_REPORT_ANALYST_PROMPT, &backend)?
                        .with_tools(tools(WriteFileTool::new(session.root_dir()))?),
                ),
                boxed(
                    assistant("JSON_Report_Analyst", JSON_REPORT_ANALYST_PROMPT, &backend)?
                        .with_tools(tools(WriteJsonFileTool::new(session.root_dir()))?),
                ),
                boxed(
                    assistant("YML_Report_Analyst", YML_REPORT_ANALYST_PROMPT, &backend)?
                        .with_tools(tools(WriteYamlFileTool::new(session.root_dir()))?),
                ),
            ],
            Team::Innovation => {
                // Clones share the file counter, so indices never collide
                let writer = InnovationFileTool::new(session.root_dir());
                vec![
                    admin,
                    boxed(
                        assistant(
                            "Product_Innovation_Analyst",
                            PRODUCT_INNOVATION_ANALYST_PROMPT,
                            &backend,
                        )?
                        .with_tools(tools(writer.clone())?),
                    ),
                    boxed(
                        assistant(
                            "Data_Innovation_Analyst",
                            DATA_INNOVATION_ANALYST_PROMPT,
                            &backend,
                        )?
                        .with_tools(tools(writer)?),
                    ),
                ]
            }
        };
        Ok(team)
    }
}

fn boxed(participant: impl Participant + 'static) -> Box<dyn Participant> {
    Box::new(participant)
}

fn assistant(
    name: &str,
    system_message: &str,
    backend: &Arc<dyn ChatBackend>,
) -> CoreResult<LlmParticipant> {
    Ok(LlmParticipant::new(
        ParticipantId::parse(name)?,
        system_message,
        Arc::clone(backend),
    ))
}

fn tools(tool: impl Tool + 'static) -> CoreResult<ToolTable> {
    ToolTable::new()
        .try_with_tool(Arc::new(tool))
        .map_err(CoreError::from)
}
