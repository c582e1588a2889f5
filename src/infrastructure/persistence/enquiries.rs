use crate::domain::entities::{EnquiryRecord, NewEnquiry, SoftDeleteOutcome};
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::ports::enquiry_repository::EnquiryRepository;
use crate::infrastructure::persistence::DatabaseGateway;
use async_trait::async_trait;
use sqlx::{any::AnyRow, Row};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use uuid::Uuid;

// Fixed width so that ORDER BY on the text column is chronological
const STORED_TIMESTAMP: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

const ENQUIRY_COLUMNS: &str = "id, name, email, phone, subject, message, status, priority, source,
     assigned_to, created_at, updated_at, is_active";

fn format_timestamp(timestamp: OffsetDateTime) -> StoreResult<String> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(STORED_TIMESTAMP)
        .map_err(|e| StoreError::Operation(format!("Invalid timestamp: {}", e)))
}

fn parse_timestamp(value: &str) -> StoreResult<OffsetDateTime> {
    PrimitiveDateTime::parse(value, STORED_TIMESTAMP)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| StoreError::Operation(format!("Invalid stored timestamp '{}': {}", value, e)))
}

fn map_enquiry_row(row: &AnyRow) -> StoreResult<EnquiryRecord> {
    let status: String = row.try_get("status")?;
    let priority: String = row.try_get("priority")?;
    let source: String = row.try_get("source")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    let is_active: i64 = row.try_get("is_active")?;

    Ok(EnquiryRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        status: status.parse().map_err(StoreError::Operation)?,
        priority: priority.parse().map_err(StoreError::Operation)?,
        source: source.parse().map_err(StoreError::Operation)?,
        // The Any driver reports NULL as a type mismatch
        assigned_to: row.try_get::<Option<String>, _>("assigned_to").ok().flatten(),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        is_active: is_active != 0,
    })
}

#[async_trait]
impl EnquiryRepository for DatabaseGateway {
    async fn connect(&self) -> StoreResult<()> {
        self.database().await.map(|_| ())
    }

    async fn list_active(&self) -> StoreResult<Vec<EnquiryRecord>> {
        let db = self.database().await?;

        let rows = sqlx::query(&format!(
            "SELECT {}
             FROM enquiries
             WHERE is_active = 1
             ORDER BY created_at DESC",
            ENQUIRY_COLUMNS
        ))
        .fetch_all(db.pool())
        .await?;

        rows.iter().map(map_enquiry_row).collect()
    }

    async fn soft_delete(&self, id: &str) -> StoreResult<SoftDeleteOutcome> {
        let db = self.database().await?;
        let updated_at = format_timestamp(OffsetDateTime::now_utc())?;

        let mut tx = db.pool().begin().await?;

        let result = sqlx::query(
            "UPDATE enquiries
             SET is_active = 0, updated_at = ?
             WHERE id = ? AND is_active = 1",
        )
        .bind(&updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(SoftDeleteOutcome::NotFound);
        }

        let row = sqlx::query(&format!(
            "SELECT {} FROM enquiries WHERE id = ?",
            ENQUIRY_COLUMNS
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SoftDeleteOutcome::Updated(map_enquiry_row(&row)?))
    }

    async fn insert(&self, enquiry: &NewEnquiry) -> StoreResult<EnquiryRecord> {
        let db = self.database().await?;
        let id = Uuid::new_v4().to_string();
        let created_at = format_timestamp(enquiry.created_at.unwrap_or_else(OffsetDateTime::now_utc))?;

        sqlx::query(
            "INSERT INTO enquiries (id, name, email, phone, subject, message, status, priority,
                                    source, assigned_to, created_at, updated_at, is_active)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&enquiry.name)
        .bind(&enquiry.email)
        .bind(&enquiry.phone)
        .bind(&enquiry.subject)
        .bind(&enquiry.message)
        .bind(enquiry.status.as_str())
        .bind(enquiry.priority.as_str())
        .bind(enquiry.source.as_str())
        .bind(enquiry.assigned_to.as_deref())
        .bind(&created_at)
        .bind(&created_at)
        .bind(i64::from(enquiry.is_active))
        .execute(db.pool())
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| StoreError::Operation(format!("Enquiry {} vanished after insert", id)))
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<EnquiryRecord>> {
        let db = self.database().await?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM enquiries WHERE id = ?",
            ENQUIRY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db.pool())
        .await?;

        row.as_ref().map(map_enquiry_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_stored_timestamps_sort_chronologically() {
        let earlier = format_timestamp(datetime!(2024-01-01 00:00:00.5 UTC)).unwrap();
        let later = format_timestamp(datetime!(2024-01-01 00:00:01 UTC)).unwrap();

        assert_eq!(earlier, "2024-01-01T00:00:00.500000Z");
        assert!(earlier < later);
    }

    #[test]
    fn test_offsets_are_normalized_to_utc() {
        let stored = format_timestamp(datetime!(2024-02-01 10:00:00 +02:00)).unwrap();
        assert_eq!(stored, "2024-02-01T08:00:00.000000Z");
        assert_eq!(
            parse_timestamp(&stored).unwrap(),
            datetime!(2024-02-01 08:00:00 UTC)
        );
    }

    #[test]
    fn test_malformed_stored_timestamp_is_an_operation_error() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(StoreError::Operation(_))
        ));
    }
}
