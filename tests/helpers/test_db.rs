use enquiry_desk::domain::entities::{EnquiryRecord, NewEnquiry};
use enquiry_desk::domain::ports::enquiry_repository::EnquiryRepository;
use enquiry_desk::infrastructure::persistence::{Database, DatabaseGateway};
use std::path::PathBuf;
use std::sync::Arc;
use time::macros::datetime;
use uuid::Uuid;

pub struct TestDatabase {
    gateway: Arc<DatabaseGateway>,
    path: PathBuf,
}

impl TestDatabase {
    pub fn gateway(&self) -> Arc<DatabaseGateway> {
        self.gateway.clone()
    }
}

pub async fn setup_test_db() -> TestDatabase {
    // File-based SQLite, unique per test so tests can run in parallel
    let path = std::env::temp_dir().join(format!("enquiries_test_{}.db", Uuid::new_v4()));
    let db_url = format!("sqlite://{}?mode=rwc", path.display());

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    db.run_migrations()
        .await
        .expect("Failed to run migrations on test database");

    TestDatabase {
        gateway: Arc::new(DatabaseGateway::from_database(db)),
        path,
    }
}

pub async fn teardown_test_db(test_db: TestDatabase) {
    if let Ok(db) = test_db.gateway.database().await {
        db.pool().close().await;
    }

    for suffix in ["", "-wal", "-shm"] {
        let mut file = test_db.path.clone().into_os_string();
        file.push(suffix);
        std::fs::remove_file(file).ok();
    }
}

/// Gateway pointing at a location SQLite cannot open.
pub fn unreachable_gateway() -> Arc<DatabaseGateway> {
    Arc::new(DatabaseGateway::new(format!(
        "sqlite:///nonexistent-{}/enquiries.db?mode=rwc",
        Uuid::new_v4()
    )))
}

/// A, B active (created 2024-01-01 and 2024-02-01), C inactive and newest.
pub struct Scenario {
    pub a: EnquiryRecord,
    pub b: EnquiryRecord,
    pub c: EnquiryRecord,
}

pub async fn seed_scenario(repo: &dyn EnquiryRepository) -> Scenario {
    let a = repo
        .insert(
            &NewEnquiry::new(
                "Alice",
                "alice@example.com",
                "555-0101",
                "Pricing",
                "How much for a site?",
            )
            .created_at(datetime!(2024-01-01 00:00:00 UTC)),
        )
        .await
        .expect("Failed to seed enquiry A");

    let b = repo
        .insert(
            &NewEnquiry::new(
                "Bob",
                "bob@example.com",
                "555-0102",
                "Partnership",
                "Let's talk",
            )
            .created_at(datetime!(2024-02-01 00:00:00 UTC)),
        )
        .await
        .expect("Failed to seed enquiry B");

    let c = repo
        .insert(
            &NewEnquiry::new(
                "Carol",
                "carol@example.com",
                "555-0103",
                "Old question",
                "Already handled",
            )
            .created_at(datetime!(2024-03-01 00:00:00 UTC))
            .inactive(),
        )
        .await
        .expect("Failed to seed enquiry C");

    Scenario { a, b, c }
}
