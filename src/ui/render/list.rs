use crate::ui::{Card, RenderContext};
use crate::utils::text_processing::html_escape;

/// Render the full content of a list container: one card per item, or a
/// single empty-state block when there is nothing to show.
///
pub fn render_list<T: Card>(items: &[T], ctx: &RenderContext) -> String {
    if items.is_empty() {
        return empty_state(T::EMPTY_MESSAGE);
    }
    items
        .iter()
        .map(|item| item.card(ctx))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the block shown in place of an empty list.
///
pub fn empty_state(message: &str) -> String {
    format!(
        r#"<div class="empty-state">
  <p class="empty-state-title">{}</p>
  <p class="empty-state-hint">Try a different search term or clear the filters.</p>
</div>"#,
        html_escape(message)
    )
}
