use super::{detail_list, or_placeholder, safe_href, slug, NOT_SPECIFIED};
use crate::listing::Downloadable;
use crate::ui::{Card, RenderContext};
use crate::utils::clock::{format_date, relative_age};
use crate::utils::text_processing::{html_escape, truncate_markup};

impl Card for Downloadable {
    const EMPTY_MESSAGE: &'static str = "No downloadable files found";

    fn card(&self, ctx: &RenderContext) -> String {
        let download = match self.file_url.as_deref().and_then(safe_href) {
            Some(href) => format!(
                "  <a class=\"download-link\" href=\"{}\" download>Download</a>\n",
                href
            ),
            None => "  <span class=\"download-link unavailable\">Unavailable</span>\n".to_string(),
        };

        let rows = vec![
            ("File", or_placeholder(self.file_name.as_deref(), NOT_SPECIFIED)),
            (
                "Size",
                self.file_size
                    .map(human_size)
                    .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            ),
        ];

        format!(
            r#"<article class="download-card" data-id="{id}" data-category="{category}">
  <div class="card-header">
    <span class="category-tag category-{slug}">{category}</span>
    <span class="file-type">{file_type}</span>
    <time datetime="{iso}" title="{age}">{date}</time>
  </div>
  <h3 class="card-title">{title}</h3>
  <p class="card-author">{unit}</p>
  <div class="card-excerpt">{excerpt}</div>
{details}{download}</article>"#,
            id = html_escape(&self.id),
            category = html_escape(&self.category),
            slug = slug(&self.category),
            file_type = html_escape(&file_type(self)),
            iso = self.publish_date.to_rfc3339(),
            age = relative_age(self.publish_date, ctx.now),
            date = format_date(self.publish_date),
            title = html_escape(&self.title),
            unit = or_placeholder(Some(self.author_unit.as_str()), NOT_SPECIFIED),
            excerpt = truncate_markup(&self.description, ctx.excerpt_words),
            details = detail_list(&rows),
            download = download,
        )
    }
}

/// Upper-case extension of the file name, or of the URL path, else `FILE`.
fn file_type(item: &Downloadable) -> String {
    let extension = |name: &str| {
        let name = name.split(['?', '#']).next().unwrap_or(name);
        name.rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && !ext.contains('/') && ext.len() <= 5)
            .map(str::to_ascii_uppercase)
    };
    item.file_name
        .as_deref()
        .and_then(extension)
        .or_else(|| item.file_url.as_deref().and_then(extension))
        .unwrap_or_else(|| "FILE".to_string())
}

/// Format a byte count with binary units, e.g. `1.5 MB`.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn downloadable() -> Downloadable {
        Downloadable {
            id: "dl-1".to_string(),
            title: "Leave Application Form".to_string(),
            description: "Fill out and submit to HR".to_string(),
            category: "FORMS".to_string(),
            author_unit: "hr".to_string(),
            publish_date: Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap(),
            file_url: Some("/files/leave-form.pdf".to_string()),
            file_name: None,
            file_size: Some(1_572_864),
        }
    }

    fn ctx() -> RenderContext {
        RenderContext {
            now: Utc.with_ymd_and_hms(2024, 2, 20, 0, 0, 0).unwrap(),
            excerpt_words: 30,
        }
    }

    #[test]
    fn card_shows_file_details() {
        let html = downloadable().card(&ctx());
        assert!(html.contains("<span class=\"file-type\">PDF</span>"));
        assert!(html.contains("<dt>Size</dt><dd>1.5 MB</dd>"));
        assert!(html.contains("<dt>File</dt><dd>Not specified</dd>"));
        assert!(html.contains("href=\"/files/leave-form.pdf\" download"));
        assert!(html.contains("February 10, 2024"));
        assert!(html.contains("10 days ago"));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let mut item = downloadable();
        item.file_url = None;
        item.file_size = None;
        let html = item.card(&ctx());
        assert!(html.contains("Unavailable"));
        assert!(html.contains("<dt>Size</dt><dd>Not specified</dd>"));
        assert!(html.contains("<span class=\"file-type\">FILE</span>"));
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(20_480), "20.0 KB");
        assert_eq!(human_size(1_572_864), "1.5 MB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_file_type_prefers_file_name() {
        let mut item = downloadable();
        item.file_name = Some("Memo 12.docx".to_string());
        assert_eq!(file_type(&item), "DOCX");

        item.file_name = None;
        item.file_url = Some("https://portal.example.edu/download?id=5".to_string());
        assert_eq!(file_type(&item), "FILE");
    }
}
