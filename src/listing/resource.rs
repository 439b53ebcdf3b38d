use chrono::{DateTime, Utc};
use fake::Dummy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Read access to the fields the filter engine searches, filters and sorts
/// on. Implemented by every list item type the portal renders.
///
pub trait Listing: Clone {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    /// Rich text body, searched as plain text.
    fn body(&self) -> &str;
    fn category(&self) -> &str;
    fn unit(&self) -> &str;
    fn published_at(&self) -> DateTime<Utc>;

    /// Category codes this item type can carry. An empty slice means the
    /// set is open and any code is accepted.
    fn known_categories() -> &'static [&'static str] {
        &[]
    }
}

/// Accept identifiers sent either as JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Defines the announcement categories the portal publishes.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Hash)]
pub enum AnnouncementCategory {
    General,
    Enrollment,
    Event,
    Suspension,
    Emergency,
    Scholarship,
    Achievement,
    Other,
}

impl AnnouncementCategory {
    pub const CODES: [&'static str; 8] = [
        "GENERAL",
        "ENROLLMENT",
        "EVENT",
        "SUSPENSION",
        "EMERGENCY",
        "SCHOLARSHIP",
        "ACHIEVEMENT",
        "OTHER",
    ];

    /// Wire code of the category.
    pub fn code(&self) -> &'static str {
        match self {
            AnnouncementCategory::General => "GENERAL",
            AnnouncementCategory::Enrollment => "ENROLLMENT",
            AnnouncementCategory::Event => "EVENT",
            AnnouncementCategory::Suspension => "SUSPENSION",
            AnnouncementCategory::Emergency => "EMERGENCY",
            AnnouncementCategory::Scholarship => "SCHOLARSHIP",
            AnnouncementCategory::Achievement => "ACHIEVEMENT",
            AnnouncementCategory::Other => "OTHER",
        }
    }

    /// Human readable label for category tags.
    pub fn label(&self) -> &'static str {
        match self {
            AnnouncementCategory::General => "General",
            AnnouncementCategory::Enrollment => "Enrollment",
            AnnouncementCategory::Event => "Event",
            AnnouncementCategory::Suspension => "Class Suspension",
            AnnouncementCategory::Emergency => "Emergency",
            AnnouncementCategory::Scholarship => "Scholarship",
            AnnouncementCategory::Achievement => "Achievement",
            AnnouncementCategory::Other => "Other",
        }
    }

    /// Parse a category code case-insensitively; unknown codes map to
    /// `Other` so a new server category does not break the list.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "GENERAL" => AnnouncementCategory::General,
            "ENROLLMENT" => AnnouncementCategory::Enrollment,
            "EVENT" => AnnouncementCategory::Event,
            "SUSPENSION" => AnnouncementCategory::Suspension,
            "EMERGENCY" => AnnouncementCategory::Emergency,
            "SCHOLARSHIP" => AnnouncementCategory::Scholarship,
            "ACHIEVEMENT" => AnnouncementCategory::Achievement,
            _ => AnnouncementCategory::Other,
        }
    }
}

impl Serialize for AnnouncementCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for AnnouncementCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(AnnouncementCategory::from_code(&code))
    }
}

/// Defines announcement data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category: AnnouncementCategory,
    #[serde(default)]
    pub author_unit: String,
    #[serde(default)]
    pub author_name: Option<String>,
    pub publish_date: DateTime<Utc>,
    // Enrollment period, event schedule or suspension range
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub affected_levels: Option<String>,
    #[serde(default)]
    pub external_link: Option<String>,
    #[serde(default)]
    pub lead_image: Option<String>,
}

impl Listing for Announcement {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.content
    }

    fn category(&self) -> &str {
        self.category.code()
    }

    fn unit(&self) -> &str {
        &self.author_unit
    }

    fn published_at(&self) -> DateTime<Utc> {
        self.publish_date
    }

    fn known_categories() -> &'static [&'static str] {
        &AnnouncementCategory::CODES
    }
}

/// Defines downloadable file data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Downloadable {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String, // FORMS, MEMOS, REPORTS, ...
    #[serde(default)]
    pub author_unit: String,
    pub publish_date: DateTime<Utc>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>, // bytes
}

impl Listing for Downloadable {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn unit(&self) -> &str {
        &self.author_unit
    }

    fn published_at(&self) -> DateTime<Utc> {
        self.publish_date
    }
}
