//! Prompt assembly with capital references.
//!
//! A capital reference is an upper-case label (for example
//! `TABLE_DEFINITIONS`) that the prompt text points at and that precedes the
//! block it names.

/// Label for the table definitions block
pub const TABLE_DEFINITIONS_CAP_REF: &str = "TABLE_DEFINITIONS";

/// Label for the expected response format block
pub const RESPONSE_FORMAT_CAP_REF: &str = "RESPONSE_FORMAT";

/// Append `suffix` to `prompt`, then a `cap_ref` labelled block of `content`.
///
/// ```rust
/// use parley_context::add_cap_ref;
///
/// let prompt = add_cap_ref(
///     "Fulfill this database query: count users.",
///     "Use these TABLE_DEFINITIONS to satisfy the database query.",
///     "TABLE_DEFINITIONS",
///     "CREATE TABLE users (id INTEGER);",
/// );
/// assert_eq!(
///     prompt,
///     "Fulfill this database query: count users. Use these TABLE_DEFINITIONS to satisfy the database query.\n\nTABLE_DEFINITIONS\n\nCREATE TABLE users (id INTEGER);"
/// );
/// ```
pub fn add_cap_ref(prompt: &str, suffix: &str, cap_ref: &str, content: &str) -> String {
    format!("{prompt} {suffix}\n\n{cap_ref}\n\n{content}")
}

/// Seed prompt for a database request with the selected table definitions.
pub fn database_prompt(request: &str, table_definitions: &str) -> String {
    add_cap_ref(
        &format!("Fulfill this database query: {request}"),
        &format!("Use these {TABLE_DEFINITIONS_CAP_REF} to satisfy the database query."),
        TABLE_DEFINITIONS_CAP_REF,
        table_definitions,
    )
}
