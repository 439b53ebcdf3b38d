use super::{detail_list, or_placeholder, safe_href, slug, NOT_SPECIFIED, TO_BE_ANNOUNCED};
use crate::listing::{Announcement, AnnouncementCategory};
use crate::ui::{Card, RenderContext};
use crate::utils::clock::{format_date, format_datetime, relative_age};
use crate::utils::text_processing::{html_escape, truncate_markup};
use chrono::{DateTime, Utc};

impl Card for Announcement {
    const EMPTY_MESSAGE: &'static str = "No announcements found";

    fn card(&self, ctx: &RenderContext) -> String {
        let author = self
            .author_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.author_unit);

        let image = self
            .lead_image
            .as_deref()
            .and_then(safe_href)
            .map(|src| {
                format!(
                    "  <img class=\"card-image\" src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
                    src,
                    html_escape(&self.title)
                )
            })
            .unwrap_or_default();

        let link = self
            .external_link
            .as_deref()
            .and_then(safe_href)
            .map(|href| {
                format!(
                    "  <a class=\"card-link\" href=\"{}\" target=\"_blank\" rel=\"noopener\">Read more</a>\n",
                    href
                )
            })
            .unwrap_or_default();

        format!(
            r#"<article class="announcement-card" data-id="{id}" data-category="{category}">
{image}  <div class="card-header">
    <span class="category-tag category-{slug}">{label}</span>
    <time datetime="{iso}" title="{age}">{date}</time>
  </div>
  <h3 class="card-title">{title}</h3>
  <p class="card-author">{author}</p>
  <div class="card-excerpt">{excerpt}</div>
{details}{link}</article>"#,
            id = html_escape(&self.id),
            category = self.category.code(),
            image = image,
            slug = slug(self.category.code()),
            label = self.category.label(),
            iso = self.publish_date.to_rfc3339(),
            age = relative_age(self.publish_date, ctx.now),
            date = format_datetime(self.publish_date),
            title = html_escape(&self.title),
            author = or_placeholder(Some(author), NOT_SPECIFIED),
            excerpt = truncate_markup(&self.content, ctx.excerpt_words),
            details = detail_list(&details(self, ctx.now)),
            link = link,
        )
    }
}

/// Category specific rows of an announcement card.
fn details(announcement: &Announcement, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
    let contact = || or_placeholder(announcement.contact_info.as_deref(), NOT_SPECIFIED);
    let period = || date_range(announcement.start_date, announcement.end_date);

    match announcement.category {
        AnnouncementCategory::Enrollment => {
            vec![("Enrollment Period", period()), ("Contact", contact())]
        }
        AnnouncementCategory::Event => vec![
            ("Schedule", period()),
            (
                "Location",
                or_placeholder(announcement.location.as_deref(), NOT_SPECIFIED),
            ),
            ("Status", event_status(announcement, now).to_string()),
        ],
        AnnouncementCategory::Suspension => vec![
            ("Suspension Dates", period()),
            (
                "Affected Levels",
                or_placeholder(announcement.affected_levels.as_deref(), NOT_SPECIFIED),
            ),
        ],
        AnnouncementCategory::Emergency => vec![("Emergency Contact", contact())],
        AnnouncementCategory::Scholarship => vec![
            (
                "Application Deadline",
                announcement
                    .end_date
                    .map(format_date)
                    .unwrap_or_else(|| TO_BE_ANNOUNCED.to_string()),
            ),
            ("Contact", contact()),
        ],
        AnnouncementCategory::General
        | AnnouncementCategory::Achievement
        | AnnouncementCategory::Other => vec![],
    }
}

fn date_range(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    match (start, end) {
        (Some(start), Some(end)) if start.date_naive() == end.date_naive() => format_date(start),
        (Some(start), Some(end)) => format!("{} to {}", format_date(start), format_date(end)),
        (Some(start), None) => format!("Starting {}", format_date(start)),
        (None, Some(end)) => format!("Until {}", format_date(end)),
        (None, None) => TO_BE_ANNOUNCED.to_string(),
    }
}

/// Where an event stands relative to `now`. An event without an end date
/// runs until the end of its start day.
///
pub fn event_status(announcement: &Announcement, now: DateTime<Utc>) -> &'static str {
    let start = match announcement.start_date {
        Some(start) => start,
        None => return TO_BE_ANNOUNCED,
    };
    let ends_after = |now: DateTime<Utc>| match announcement.end_date {
        Some(end) => now <= end,
        None => now.date_naive() == start.date_naive(),
    };

    if now < start {
        "Upcoming"
    } else if ends_after(now) {
        "Ongoing"
    } else {
        "Concluded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use fake::{Fake, Faker};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap()
    }

    fn ctx() -> RenderContext {
        RenderContext {
            now: now(),
            excerpt_words: 3,
        }
    }

    fn announcement(category: AnnouncementCategory) -> Announcement {
        Announcement {
            id: "17".to_string(),
            title: "Founders <Day>".to_string(),
            content: "<p>one two three four five</p>".to_string(),
            category,
            author_unit: "student-affairs".to_string(),
            author_name: None,
            publish_date: now() - Duration::days(2),
            start_date: None,
            end_date: None,
            location: None,
            contact_info: None,
            affected_levels: None,
            external_link: None,
            lead_image: None,
        }
    }

    #[test]
    fn card_shows_common_fields() {
        let html = announcement(AnnouncementCategory::General).card(&ctx());
        assert!(html.contains("data-id=\"17\""));
        assert!(html.contains("Founders &lt;Day&gt;"));
        assert!(html.contains("<p class=\"card-author\">student-affairs</p>"));
        assert!(html.contains("<p>one two three...</p>"));
        assert!(html.contains("category-general"));
        assert!(html.contains("June 13, 2024 at 10:00 AM"));
        assert!(html.contains("2 days ago"));
        assert!(!html.contains("card-details"));
        assert!(!html.contains("card-link"));
    }

    #[test]
    fn author_name_takes_precedence() {
        let mut item = announcement(AnnouncementCategory::General);
        item.author_name = Some("Office of the Registrar".to_string());
        assert!(item
            .card(&ctx())
            .contains("<p class=\"card-author\">Office of the Registrar</p>"));
    }

    #[test]
    fn event_card_shows_placeholders_for_missing_fields() {
        let html = announcement(AnnouncementCategory::Event).card(&ctx());
        assert!(html.contains("<dt>Schedule</dt><dd>To be announced</dd>"));
        assert!(html.contains("<dt>Location</dt><dd>Not specified</dd>"));
        assert!(html.contains("<dt>Status</dt><dd>To be announced</dd>"));
        assert!(!html.contains("undefined"));
    }

    #[test]
    fn enrollment_card_shows_period_and_contact() {
        let mut item = announcement(AnnouncementCategory::Enrollment);
        item.start_date = Some(Utc.with_ymd_and_hms(2024, 6, 17, 0, 0, 0).unwrap());
        item.end_date = Some(Utc.with_ymd_and_hms(2024, 6, 28, 0, 0, 0).unwrap());
        item.contact_info = Some("registrar@example.edu".to_string());

        let html = item.card(&ctx());
        assert!(html.contains("<dd>June 17, 2024 to June 28, 2024</dd>"));
        assert!(html.contains("<dd>registrar@example.edu</dd>"));
    }

    #[test]
    fn suspension_and_emergency_details() {
        let mut item = announcement(AnnouncementCategory::Suspension);
        item.affected_levels = Some("All levels".to_string());
        let html = item.card(&ctx());
        assert!(html.contains("<dt>Affected Levels</dt><dd>All levels</dd>"));

        let html = announcement(AnnouncementCategory::Emergency).card(&ctx());
        assert!(html.contains("<dt>Emergency Contact</dt><dd>Not specified</dd>"));
    }

    #[test]
    fn unsafe_links_are_dropped() {
        let mut item = announcement(AnnouncementCategory::General);
        item.external_link = Some("javascript:alert(1)".to_string());
        item.lead_image = Some("https://cdn.example.edu/banner.jpg".to_string());
        let html = item.card(&ctx());
        assert!(!html.contains("card-link"));
        assert!(html.contains("src=\"https://cdn.example.edu/banner.jpg\""));
    }

    #[test]
    fn event_status_follows_clock() {
        let mut item: Announcement = Faker.fake();
        item.start_date = Some(now() + Duration::days(1));
        item.end_date = None;
        assert_eq!(event_status(&item, now()), "Upcoming");

        item.start_date = Some(now() - Duration::hours(1));
        assert_eq!(event_status(&item, now()), "Ongoing");

        item.start_date = Some(now() - Duration::days(3));
        item.end_date = Some(now() - Duration::days(1));
        assert_eq!(event_status(&item, now()), "Concluded");

        item.start_date = None;
        assert_eq!(event_status(&item, now()), TO_BE_ANNOUNCED);
    }
}
