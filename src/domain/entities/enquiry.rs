use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnquiryStatus {
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl EnquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryStatus::Pending => "pending",
            EnquiryStatus::InProgress => "in-progress",
            EnquiryStatus::Resolved => "resolved",
            EnquiryStatus::Closed => "closed",
        }
    }
}

impl Default for EnquiryStatus {
    fn default() -> Self {
        EnquiryStatus::Pending
    }
}

impl std::fmt::Display for EnquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EnquiryStatus::Pending),
            "in-progress" => Ok(EnquiryStatus::InProgress),
            "resolved" => Ok(EnquiryStatus::Resolved),
            "closed" => Ok(EnquiryStatus::Closed),
            _ => Err(format!("Invalid enquiry status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl EnquiryPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryPriority::Low => "low",
            EnquiryPriority::Medium => "medium",
            EnquiryPriority::High => "high",
            EnquiryPriority::Urgent => "urgent",
        }
    }
}

impl Default for EnquiryPriority {
    fn default() -> Self {
        EnquiryPriority::Medium
    }
}

impl std::fmt::Display for EnquiryPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnquiryPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(EnquiryPriority::Low),
            "medium" => Ok(EnquiryPriority::Medium),
            "high" => Ok(EnquiryPriority::High),
            "urgent" => Ok(EnquiryPriority::Urgent),
            _ => Err(format!("Invalid enquiry priority: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnquirySource {
    ContactForm,
    Website,
    Email,
    Phone,
    Other,
}

impl EnquirySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnquirySource::ContactForm => "contact-form",
            EnquirySource::Website => "website",
            EnquirySource::Email => "email",
            EnquirySource::Phone => "phone",
            EnquirySource::Other => "other",
        }
    }
}

impl Default for EnquirySource {
    fn default() -> Self {
        EnquirySource::ContactForm
    }
}

impl std::fmt::Display for EnquirySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnquirySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contact-form" => Ok(EnquirySource::ContactForm),
            "website" => Ok(EnquirySource::Website),
            "email" => Ok(EnquirySource::Email),
            "phone" => Ok(EnquirySource::Phone),
            "other" => Ok(EnquirySource::Other),
            _ => Err(format!("Invalid enquiry source: {}", s)),
        }
    }
}

/// An enquiry as persisted in the `enquiries` table.
#[derive(Debug, Clone, PartialEq)]
pub struct EnquiryRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: EnquiryStatus,
    pub priority: EnquiryPriority,
    pub source: EnquirySource,
    pub assigned_to: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub is_active: bool,
}

/// An enquiry as served to admin clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: EnquiryStatus,
    pub priority: EnquiryPriority,
    pub source: EnquirySource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<EnquiryRecord> for Enquiry {
    fn from(record: EnquiryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            subject: record.subject,
            message: record.message,
            status: record.status,
            priority: record.priority,
            source: record.source,
            assigned_to: record.assigned_to,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Input for seeding an enquiry into the store.
#[derive(Debug, Clone)]
pub struct NewEnquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: EnquiryStatus,
    pub priority: EnquiryPriority,
    pub source: EnquirySource,
    pub assigned_to: Option<String>,
    /// Defaults to the insertion time.
    pub created_at: Option<OffsetDateTime>,
    pub is_active: bool,
}

impl NewEnquiry {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            subject: subject.into(),
            message: message.into(),
            status: EnquiryStatus::default(),
            priority: EnquiryPriority::default(),
            source: EnquirySource::default(),
            assigned_to: None,
            created_at: None,
            is_active: true,
        }
    }

    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Result of a soft delete: the updated record, or nothing matched.
#[derive(Debug, Clone, PartialEq)]
pub enum SoftDeleteOutcome {
    Updated(EnquiryRecord),
    NotFound,
}
