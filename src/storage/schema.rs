//! Database schema definitions

/// SQL to create the repositories table
pub const CREATE_REPOSITORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS repositories (
    external_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    url TEXT NOT NULL,
    created TEXT NOT NULL,
    pushed TEXT NOT NULL,
    stars INTEGER NOT NULL
)
"#;

pub const DROP_REPOSITORIES_TABLE: &str = "DROP TABLE IF EXISTS repositories";

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_repositories_stars ON repositories(stars)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_REPOSITORIES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
