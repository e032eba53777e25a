//! Database module for SQLite persistence using SeaORM

pub mod entities;

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Connect to `db_url` and create all tables if they don't exist
pub async fn connect(db_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    tracing::info!("Connecting to database: {}", db_url);

    let mut options = ConnectOptions::new(db_url.to_owned());
    options
        .max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    create_tables(&db).await?;

    Ok(db)
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(db.get_database_backend(), sql.to_string()))
        .await
        .map(|_| ())
}

/// Create all tables if they don't exist
async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS sections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            kind TEXT
        )
        "#,
    )
    .await?;

    // Boundary points, ordered by id within a section
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS points (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            section_id INTEGER NOT NULL,
            FOREIGN KEY (section_id) REFERENCES sections(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;
    execute(db, r#"CREATE INDEX IF NOT EXISTS idx_points_section ON points(section_id)"#).await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS precincts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            section_id INTEGER,
            FOREIGN KEY (section_id) REFERENCES sections(id) ON DELETE SET NULL
        )
        "#,
    )
    .await?;
    execute(db, r#"CREATE INDEX IF NOT EXISTS idx_precincts_section ON precincts(section_id)"#).await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS elections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            date TEXT NOT NULL,
            section_id INTEGER NOT NULL,
            FOREIGN KEY (section_id) REFERENCES sections(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS positions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            section_id INTEGER NOT NULL,
            FOREIGN KEY (section_id) REFERENCES sections(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS candidacies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            party TEXT NOT NULL,
            acronym TEXT NOT NULL,
            candidate_id INTEGER,
            color TEXT NOT NULL,
            position_id INTEGER NOT NULL,
            election_id INTEGER NOT NULL,
            FOREIGN KEY (position_id) REFERENCES positions(id) ON DELETE CASCADE,
            FOREIGN KEY (election_id) REFERENCES elections(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;
    execute(
        db,
        r#"CREATE INDEX IF NOT EXISTS idx_candidacies_ballot ON candidacies(position_id, election_id)"#,
    )
    .await?;

    // Polling tables; election_id is NULL for tables provisioned ahead of an election
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS polling_tables (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            number INTEGER NOT NULL,
            capacity INTEGER NOT NULL DEFAULT 0,
            chair_id INTEGER,
            precinct_id INTEGER NOT NULL,
            election_id INTEGER,
            FOREIGN KEY (precinct_id) REFERENCES precincts(id) ON DELETE CASCADE,
            FOREIGN KEY (election_id) REFERENCES elections(id) ON DELETE CASCADE,
            UNIQUE(number, precinct_id, election_id)
        )
        "#,
    )
    .await?;
    execute(
        db,
        r#"CREATE INDEX IF NOT EXISTS idx_polling_tables_election ON polling_tables(election_id)"#,
    )
    .await?;
    execute(
        db,
        r#"CREATE INDEX IF NOT EXISTS idx_polling_tables_precinct ON polling_tables(precinct_id)"#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS voters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            voter_id INTEGER NOT NULL,
            has_voted INTEGER NOT NULL DEFAULT 0,
            election_id INTEGER,
            table_id INTEGER NOT NULL,
            FOREIGN KEY (election_id) REFERENCES elections(id) ON DELETE CASCADE,
            FOREIGN KEY (table_id) REFERENCES polling_tables(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;
    execute(db, r#"CREATE INDEX IF NOT EXISTS idx_voters_table ON voters(table_id)"#).await?;
    execute(db, r#"CREATE INDEX IF NOT EXISTS idx_voters_election ON voters(election_id)"#).await?;

    // Votes reference ids owned by the voting service, so no foreign keys here
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            table_id INTEGER NOT NULL,
            voter_id INTEGER NOT NULL,
            candidacy_id INTEGER NOT NULL,
            election_id INTEGER NOT NULL,
            position_id INTEGER
        )
        "#,
    )
    .await?;
    execute(
        db,
        r#"CREATE INDEX IF NOT EXISTS idx_votes_ballot ON votes(position_id, election_id)"#,
    )
    .await?;
    execute(
        db,
        r#"CREATE INDEX IF NOT EXISTS idx_votes_voter ON votes(election_id, voter_id)"#,
    )
    .await?;

    tracing::info!("Database tables initialized");
    Ok(())
}

/// Single-connection in-memory store for tests
#[cfg(test)]
pub async fn test_database() -> DatabaseConnection {
    connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityTrait;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_connect_creates_file_and_schema() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("electoral.db");
        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let db = connect(&db_url, 1).await.unwrap();
        assert!(db_path.exists());

        let sections = entities::Section::find().all(&db).await.unwrap();
        assert!(sections.is_empty());
    }

    #[tokio::test]
    async fn test_schema_bootstrap_is_repeatable() {
        let db = test_database().await;
        create_tables(&db).await.unwrap();
        create_tables(&db).await.unwrap();
    }
}
