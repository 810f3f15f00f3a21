//! Test builders — ergonomic constructors for raw log lines and fake inserters.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::sync::Mutex;

use mart_core::Table;
use mart_loader::{BatchInserter, LoadError, TableBatch};

// ---------------------------------------------------------------------------
// LogLineBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for raw enrollment log lines.
///
/// Starts from a valid line (Alice enrolling in C1 at 100, no promo code);
/// each setter replaces one part.
///
/// ```rust
/// let line = LogLineBuilder::new()
///     .user(2, "Bob", "SF")
///     .course("C2", "SQL", "Data")
///     .promo("SAVE10")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct LogLineBuilder {
    ts: String,
    reserved: String,
    user: String,
    course: String,
    price: String,
}

impl Default for LogLineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogLineBuilder {
    pub fn new() -> Self {
        Self {
            ts: "2024-01-15T10:00:00Z".to_string(),
            reserved: "web".to_string(),
            user: "user_id=1;user_name=Alice;user_city=NYC".to_string(),
            course: "course_id=C1;course_name=Rust;category=Programming".to_string(),
            price: "price=100;promo_code=NULL".to_string(),
        }
    }

    pub fn ts(mut self, ts: impl Into<String>) -> Self {
        self.ts = ts.into();
        self
    }

    pub fn reserved(mut self, reserved: impl Into<String>) -> Self {
        self.reserved = reserved.into();
        self
    }

    pub fn user(mut self, id: i64, name: &str, city: &str) -> Self {
        self.user = format!("user_id={id};user_name={name};user_city={city}");
        self
    }

    pub fn course(mut self, id: &str, name: &str, category: &str) -> Self {
        self.course = format!("course_id={id};course_name={name};category={category}");
        self
    }

    pub fn price(mut self, price: i64) -> Self {
        let promo = self.promo_part();
        self.price = format!("price={price};{promo}");
        self
    }

    pub fn promo(mut self, code: &str) -> Self {
        let price = self.price_part();
        self.price = format!("{price};promo_code={code}");
        self
    }

    pub fn no_promo(self) -> Self {
        self.promo("NULL")
    }

    /// Replace a whole key=value block verbatim.
    pub fn raw_user(mut self, block: impl Into<String>) -> Self {
        self.user = block.into();
        self
    }

    pub fn raw_course(mut self, block: impl Into<String>) -> Self {
        self.course = block.into();
        self
    }

    pub fn raw_price(mut self, block: impl Into<String>) -> Self {
        self.price = block.into();
        self
    }

    pub fn build(&self) -> String {
        [
            self.ts.as_str(),
            self.reserved.as_str(),
            self.user.as_str(),
            self.course.as_str(),
            self.price.as_str(),
        ]
        .join(" | ")
    }

    fn price_part(&self) -> String {
        self.price
            .split(';')
            .find(|p| p.starts_with("price="))
            .unwrap_or("price=100")
            .to_string()
    }

    fn promo_part(&self) -> String {
        self.price
            .split(';')
            .find(|p| p.starts_with("promo_code="))
            .unwrap_or("promo_code=NULL")
            .to_string()
    }
}

// ---------------------------------------------------------------------------
// RecordingInserter
// ---------------------------------------------------------------------------

/// In-memory [`BatchInserter`] that records every batch it receives.
///
/// `unreachable()` fails the ping; `failing_on(table)` fails inserts into
/// that one table.
#[derive(Default)]
pub struct RecordingInserter {
    pub batches: Mutex<Vec<TableBatch>>,
    pub pings: Mutex<usize>,
    fail_on: Option<Table>,
    down: bool,
}

impl RecordingInserter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }

    pub fn failing_on(table: Table) -> Self {
        Self {
            fail_on: Some(table),
            ..Self::default()
        }
    }

    pub fn tables_received(&self) -> Vec<Table> {
        self.batches.lock().unwrap().iter().map(TableBatch::table).collect()
    }

    pub fn ping_count(&self) -> usize {
        *self.pings.lock().unwrap()
    }
}

impl BatchInserter for &RecordingInserter {
    async fn ping(&self) -> Result<(), LoadError> {
        *self.pings.lock().unwrap() += 1;
        if self.down {
            return Err(LoadError::Connection {
                url: "http://127.0.0.1:1".to_string(),
                source: "connection refused".into(),
            });
        }
        Ok(())
    }

    async fn insert(&self, batch: &TableBatch) -> Result<(), LoadError> {
        if self.fail_on == Some(batch.table()) {
            return Err(LoadError::Insert {
                table: batch.table().name().to_string(),
                source: "Code: 60. Table does not exist".into(),
            });
        }
        self.batches.lock().unwrap().push(batch.clone());
        Ok(())
    }
}
