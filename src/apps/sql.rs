//! Natural-language questions over the `employees` SQLite table.

use crate::config::{vars, Prompts};
use crate::error::{KioskError, Result};
use crate::llm::{ChatModel, CompletionRequest};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Rows inserted by [`setup_database`].
pub const SEED_EMPLOYEES: [(&str, &str, i64); 6] = [
    ("Alice", "Engineering", 85000),
    ("Bob", "HR", 60000),
    ("Charlie", "Marketing", 75000),
    ("Diana", "Engineering", 95000),
    ("Evan", "Finance", 72000),
    ("Fiona", "Marketing", 68000),
];

/// Create the `employees` table if missing and seed it when empty.
///
/// Returns the number of rows inserted.
#[instrument]
pub fn setup_database(path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut conn = Connection::open(path)?;
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            department TEXT,
            salary INTEGER
        );
        "#,
    )?;

    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
    if existing > 0 {
        info!("employees already holds {} rows, not seeding", existing);
        return Ok(0);
    }

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare("INSERT INTO employees (name, department, salary) VALUES (?1, ?2, ?3)")?;
        for (name, department, salary) in SEED_EMPLOYEES {
            stmt.execute(rusqlite::params![name, department, salary])?;
        }
    }
    tx.commit()?;

    info!("Seeded {} employees", SEED_EMPLOYEES.len());
    Ok(SEED_EMPLOYEES.len())
}

/// Remove surrounding backticks and a leading `sql` fence tag from a model reply.
pub fn clean_sql(response: &str) -> String {
    let stripped = response.trim().trim_matches('`').trim();
    let without_tag = match stripped.get(..3) {
        Some(tag) if tag.eq_ignore_ascii_case("sql") => {
            let rest = &stripped[3..];
            if rest.starts_with(char::is_whitespace) {
                rest
            } else {
                stripped
            }
        }
        _ => stripped,
    };
    without_tag.trim().to_string()
}

/// Columns and stringified rows of an executed statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows changed, for statements that return no result set.
    pub affected: Option<usize>,
}

impl QueryResult {
    pub fn has_result_set(&self) -> bool {
        !self.columns.is_empty()
    }
}

/// Execute one statement against the database at `path`.
#[instrument(skip(sql))]
pub fn run_query(path: &Path, sql: &str) -> Result<QueryResult> {
    if !path.exists() {
        return Err(KioskError::Config(format!(
            "Database not found at {}. Run `kiosk sql-setup` first.",
            path.display()
        )));
    }

    let conn = Connection::open(path)?;
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();

    if columns.is_empty() {
        let affected = stmt.execute([])?;
        debug!("Statement changed {} rows", affected);
        return Ok(QueryResult {
            columns,
            rows: Vec::new(),
            affected: Some(affected),
        });
    }

    let width = columns.len();
    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            values.push(display_value(row.get_ref(i)?));
        }
        rows.push(values);
    }

    debug!("Query returned {} rows", rows.len());
    Ok(QueryResult {
        columns,
        rows,
        affected: None,
    })
}

fn display_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Generated SQL and what running it produced.
#[derive(Debug, Clone, Serialize)]
pub struct SqlAnswer {
    pub sql: String,
    pub result: QueryResult,
}

/// Turns questions into SQL with a chat model and runs them.
pub struct SqlAssistant {
    model: Arc<dyn ChatModel>,
    prompts: Prompts,
    db_path: PathBuf,
}

impl SqlAssistant {
    pub fn new(model: Arc<dyn ChatModel>, prompts: Prompts, db_path: PathBuf) -> Self {
        Self {
            model,
            prompts,
            db_path,
        }
    }

    /// Ask the model for a query answering `question`.
    #[instrument(skip(self))]
    pub async fn generate(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(KioskError::InvalidInput("Question is empty".to_string()));
        }

        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.sql.generate, &vars([("question", question)]));
        let response = self.model.complete(&CompletionRequest::prompt(prompt)).await?;

        let sql = clean_sql(&response);
        if sql.is_empty() {
            return Err(KioskError::EmptyResult("The model returned no SQL".to_string()));
        }
        info!("Generated SQL: {}", sql);
        Ok(sql)
    }

    /// Generate and execute.
    pub async fn ask(&self, question: &str) -> Result<SqlAnswer> {
        let sql = self.generate(question).await?;
        let result = run_query(&self.db_path, &sql)?;
        Ok(SqlAnswer { sql, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedModel;

    fn seeded_db() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("company.db");
        setup_database(&path).unwrap();
        (dir, path)
    }

    #[test]
    fn test_setup_seeds_once() {
        let (_dir, path) = seeded_db();
        assert_eq!(setup_database(&path).unwrap(), 0);

        let result = run_query(&path, "SELECT COUNT(*) AS n FROM employees").unwrap();
        assert_eq!(result.columns, vec!["n"]);
        assert_eq!(result.rows, vec![vec!["6"]]);
    }

    #[test]
    fn test_clean_sql() {
        assert_eq!(clean_sql("```sql\nSELECT 1;\n```"), "SELECT 1;");
        assert_eq!(clean_sql("`SELECT name FROM employees`"), "SELECT name FROM employees");
        assert_eq!(clean_sql("  SELECT 1  "), "SELECT 1");
        assert_eq!(clean_sql("```SQL SELECT 2```"), "SELECT 2");
    }

    #[test]
    fn test_run_query_renders_rows() {
        let (_dir, path) = seeded_db();
        let result = run_query(
            &path,
            "SELECT name, salary FROM employees WHERE department = 'Engineering' ORDER BY salary DESC",
        )
        .unwrap();

        assert!(result.has_result_set());
        assert_eq!(result.columns, vec!["name", "salary"]);
        assert_eq!(result.rows, vec![vec!["Diana", "95000"], vec!["Alice", "85000"]]);
    }

    #[test]
    fn test_statement_without_columns_has_no_result_set() {
        let (_dir, path) = seeded_db();
        let result = run_query(&path, "UPDATE employees SET salary = salary + 1 WHERE name = 'Bob'").unwrap();
        assert!(!result.has_result_set());
        assert_eq!(result.affected, Some(1));
    }

    #[test]
    fn test_bad_sql_is_database_error() {
        let (_dir, path) = seeded_db();
        let err = run_query(&path, "SELEC nonsense").unwrap_err();
        assert!(matches!(err, KioskError::Database(_)));
    }

    #[test]
    fn test_missing_database_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_query(&dir.path().join("none.db"), "SELECT 1").unwrap_err();
        assert!(err.to_string().contains("kiosk sql-setup"));
    }

    #[tokio::test]
    async fn test_assistant_generates_and_runs() {
        let (_dir, path) = seeded_db();
        let model = Arc::new(ScriptedModel::with_replies(&[
            "```sql\nSELECT department, AVG(salary) AS avg_salary FROM employees GROUP BY department ORDER BY department;\n```",
        ]));
        let assistant = SqlAssistant::new(model.clone(), Prompts::default(), path);

        let answer = assistant.ask("Average salary per department?").await.unwrap();

        assert!(answer.sql.starts_with("SELECT department"));
        assert_eq!(answer.result.columns, vec!["department", "avg_salary"]);
        assert_eq!(answer.result.rows[0], vec!["Engineering", "90000"]);
        assert!(model.last_prompt(0).contains("Question: Average salary per department?"));
    }
}
