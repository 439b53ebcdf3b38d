//! List view controller.
//!
//! Wires the list inputs (search box, category tabs, unit select, sort
//! select) to the filter state, and redraws the list through a
//! [`ListSurface`] after every change:
//! - Default mode shows the server-provided initial page with pagination
//! - Filtered mode loads the full dataset once, filters it client-side and
//!   hides pagination
//! - Results that resolve after a newer change are discarded

use super::debounce::Debouncer;
use crate::engine::{compute_visible, sort_items};
use crate::listing::{DataSource, ListingSource};
use crate::state::{FilterState, Mode, Selection, SortOrder, StateError};
use crate::ui::{render_list, Card, ListSurface, RenderContext};
use crate::utils::{Clock, FixedClock};
use chrono::{DateTime, Utc};
use log::*;
use reqwest::Url;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Default quiet period before search input is applied.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
/// Default number of words kept in card excerpts.
pub const DEFAULT_EXCERPT_WORDS: usize = 30;

/// Data the host page embeds for the controller at load time.
///
#[derive(Debug, Clone)]
pub struct PageContext<T> {
    /// Items of the server-rendered first page, in server order.
    pub initial: Vec<T>,
    /// Server time the page was rendered at.
    pub now: DateTime<Utc>,
    /// Current page URL.
    pub url: Url,
    /// Options of the unit select; empty when the page has none.
    pub units: Vec<String>,
}

/// Tunables of a list controller.
///
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    pub search_debounce: Duration,
    pub excerpt_words: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        ControllerOptions {
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            excerpt_words: DEFAULT_EXCERPT_WORDS,
        }
    }
}

/// Oversees filter state, data loading and redrawing of one list view.
///
pub struct ListController<T, S, P> {
    data: DataSource<T, S>,
    surface: P,
    clock: Box<dyn Clock>,
    initial: Arc<Vec<T>>,
    units: Vec<String>,
    page_url: Url,
    excerpt_words: usize,
    search_debounce: Debouncer,
    state: Mutex<FilterState>,
    displayed: Mutex<Arc<Vec<T>>>,
    generation: AtomicU64,
}

impl<T, S, P> ListController<T, S, P>
where
    T: Card,
    S: ListingSource<T>,
    P: ListSurface,
{
    /// Return a new controller in Default mode showing the initial page.
    /// Call [`ListController::init`] to apply the state carried by the URL.
    ///
    pub fn new(
        data: DataSource<T, S>,
        surface: P,
        page: PageContext<T>,
        options: ControllerOptions,
    ) -> Self {
        let initial = Arc::new(page.initial);
        ListController {
            data,
            surface,
            clock: Box::new(FixedClock(page.now)),
            displayed: Mutex::new(Arc::clone(&initial)),
            initial,
            units: page.units,
            page_url: page.url,
            excerpt_words: options.excerpt_words,
            search_debounce: Debouncer::new(options.search_debounce),
            state: Mutex::new(FilterState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Replace the clock used for relative dates.
    ///
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn data_source(&self) -> &DataSource<T, S> {
        &self.data
    }

    /// The initial page exactly as handed over by the host page.
    ///
    pub fn initial(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.initial)
    }

    pub async fn state(&self) -> FilterState {
        self.state.lock().await.clone()
    }

    pub async fn mode(&self) -> Mode {
        self.state.lock().await.mode()
    }

    /// Items currently drawn in the list container.
    ///
    pub async fn displayed(&self) -> Arc<Vec<T>> {
        Arc::clone(&*self.displayed.lock().await)
    }

    /// Apply the filter state carried by the page URL and draw the list.
    /// Unknown categories or units in the URL fall back to `all`.
    ///
    pub async fn init(&self) {
        let mut restored = FilterState::from_url(&self.page_url);
        if let Err(e) = self.check_category(&restored.category) {
            warn!("Ignoring category from page URL: {}", e);
            restored.category = Selection::All;
        }
        if let Err(e) = self.check_unit(&restored.unit) {
            warn!("Ignoring unit from page URL: {}", e);
            restored.unit = Selection::All;
        }
        debug!("Initializing list view with {:?}", restored);
        self.update(move |state| *state = restored).await;
    }

    /// Handle a keystroke in the search box. The search is applied once the
    /// input has been quiet for the debounce period; returns whether this
    /// call was the one applied.
    ///
    pub async fn on_search_input(&self, text: &str) -> bool {
        self.search_debounce
            .run(|| self.set_search(text))
            .await
            .is_some()
    }

    /// Apply a search immediately.
    ///
    pub async fn set_search(&self, text: &str) {
        self.update(|state| {
            state.set_search(text);
        })
        .await;
    }

    /// Select a category tab. An unknown category selects `all` and is
    /// reported back.
    ///
    pub async fn select_category(&self, code: &str) -> Result<(), StateError> {
        let selection = Selection::parse(code);
        let checked = self.check_category(&selection);
        if let Err(e) = &checked {
            warn!("Rejecting category selection: {}", e);
        }
        let selection = if checked.is_ok() { selection } else { Selection::All };
        self.update(|state| state.category = selection).await;
        checked
    }

    /// Select an author unit. An unknown unit selects `all` and is reported
    /// back.
    ///
    pub async fn select_unit(&self, unit: &str) -> Result<(), StateError> {
        let selection = Selection::parse(unit);
        let checked = self.check_unit(&selection);
        if let Err(e) = &checked {
            warn!("Rejecting unit selection: {}", e);
        }
        let selection = if checked.is_ok() { selection } else { Selection::All };
        self.update(|state| state.unit = selection).await;
        checked
    }

    pub async fn select_sort(&self, sort: SortOrder) {
        self.update(|state| state.sort = sort).await;
    }

    /// Clear search, category and unit at once, returning to the initial page.
    ///
    pub async fn clear_filters(&self) {
        self.search_debounce.cancel();
        self.update(|state| {
            state.clear_filters();
        })
        .await;
    }

    fn check_category(&self, category: &Selection) -> Result<(), StateError> {
        let known = T::known_categories();
        match category.value() {
            Some(code) if !known.is_empty() && !known.iter().any(|k| k.eq_ignore_ascii_case(code)) => {
                Err(StateError::UnknownCategory(code.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn check_unit(&self, unit: &Selection) -> Result<(), StateError> {
        match unit.value() {
            Some(unit) if !self.units.is_empty() && !self.units.iter().any(|u| u == unit) => {
                Err(StateError::UnknownUnit(unit.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Mutate the state, mirror it into the URL and redraw.
    ///
    async fn update<F: FnOnce(&mut FilterState)>(&self, change: F) {
        let (state, generation) = {
            let mut state = self.state.lock().await;
            change(&mut state);
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            (state.clone(), generation)
        };
        self.surface.replace_url(&state.apply_to_url(&self.page_url));
        self.refresh(state, generation).await;
    }

    async fn refresh(&self, state: FilterState, generation: u64) {
        match state.mode() {
            Mode::Default => {
                let items = if state.sort == SortOrder::default() {
                    Arc::clone(&self.initial)
                } else {
                    let mut sorted = self.initial.as_ref().clone();
                    sort_items(&mut sorted, state.sort);
                    Arc::new(sorted)
                };
                debug!("Showing initial page ({} items).", items.len());
                self.show(items, true).await;
            }
            Mode::Filtered => {
                self.surface.set_loading(true);
                self.surface.set_pagination_visible(false);
                let full = self.data.full_dataset().await;
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!("Discarding stale results for {:?}", state);
                    return;
                }
                let visible = compute_visible(&full, &state);
                debug!(
                    "Showing {} of {} items for {:?}",
                    visible.len(),
                    full.len(),
                    state
                );
                self.show(Arc::new(visible), false).await;
            }
        }
    }

    async fn show(&self, items: Arc<Vec<T>>, pagination_visible: bool) {
        let ctx = RenderContext {
            now: self.clock.now(),
            excerpt_words: self.excerpt_words,
        };
        self.surface.replace_list(render_list(&items, &ctx));
        self.surface.set_pagination_visible(pagination_visible);
        self.surface.set_loading(false);
        *self.displayed.lock().await = items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::source::tests::ScriptedSource;
    use crate::listing::{Announcement, AnnouncementCategory};
    use crate::ui::BufferedSurface;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use fake::{Fake, Faker};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    type Controller = ListController<Announcement, ScriptedSource<Announcement>, BufferedSurface>;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap()
    }

    fn announcement(id: &str, title: &str, category: AnnouncementCategory, days_ago: i64) -> Announcement {
        Announcement {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("<p>{} details</p>", title),
            category,
            author_unit: if category == AnnouncementCategory::Event {
                "student-affairs".to_string()
            } else {
                "registrar".to_string()
            },
            publish_date: now() - ChronoDuration::days(days_ago),
            ..Faker.fake()
        }
    }

    fn full_set() -> Vec<Announcement> {
        use AnnouncementCategory::*;
        vec![
            announcement("1", "Founders Day", Event, 1),
            announcement("2", "Sports Fest", Event, 2),
            announcement("3", "Enrollment Open", Enrollment, 3),
            announcement("4", "Typhoon Advisory", Emergency, 4),
            announcement("5", "Career Fair", Event, 5),
            announcement("6", "Re-enrollment Notice", Enrollment, 6),
        ]
    }

    fn page(url: &str) -> PageContext<Announcement> {
        PageContext {
            initial: full_set().into_iter().take(3).collect(),
            now: now(),
            url: Url::parse(url).unwrap(),
            units: vec!["registrar".to_string(), "student-affairs".to_string()],
        }
    }

    fn controller_with(source: ScriptedSource<Announcement>, url: &str) -> (Controller, Arc<AtomicUsize>) {
        let calls = Arc::clone(&source.calls);
        let controller = ListController::new(
            DataSource::new(source),
            BufferedSurface::new(),
            page(url),
            ControllerOptions::default(),
        );
        (controller, calls)
    }

    fn controller() -> (Controller, Arc<AtomicUsize>) {
        controller_with(
            ScriptedSource::new(full_set()),
            "https://portal.example.edu/announcements?page=2",
        )
    }

    fn ids(items: &[Announcement]) -> Vec<&str> {
        items.iter().map(|a| a.id.as_str()).collect()
    }

    #[tokio::test]
    async fn init_without_parameters_shows_initial_page() {
        let (controller, calls) = controller();
        controller.init().await;

        assert_eq!(controller.mode().await, Mode::Default);
        assert!(Arc::ptr_eq(&controller.displayed().await, &controller.initial()));
        let snapshot = controller.surface().snapshot();
        assert!(snapshot.pagination_visible);
        assert_eq!(snapshot.list_html.matches("<article").count(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn category_filter_fetches_full_set_and_hides_pagination() {
        let (controller, calls) = controller();
        controller.select_category("EVENT").await.unwrap();

        assert_eq!(controller.mode().await, Mode::Filtered);
        assert_eq!(ids(&controller.displayed().await), vec!["1", "2", "5"]);
        let snapshot = controller.surface().snapshot();
        assert!(!snapshot.pagination_visible);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.loading_history, vec![true, false]);
        assert_eq!(
            snapshot.url.unwrap().as_str(),
            "https://portal.example.edu/announcements?category=EVENT"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn later_filters_reuse_cached_dataset() {
        let (controller, calls) = controller();
        controller.set_search("enroll").await;
        controller.select_sort(SortOrder::Oldest).await;
        assert_eq!(ids(&controller.displayed().await), vec!["6", "3"]);

        controller.select_unit("student-affairs").await.unwrap();
        assert!(controller.displayed().await.is_empty());
        assert_eq!(
            controller.surface().snapshot().list_html.matches("empty-state\"").count(),
            1
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sort_in_default_mode_does_not_fetch() {
        let (controller, calls) = controller();
        controller.select_sort(SortOrder::TitleAsc).await;

        assert_eq!(controller.mode().await, Mode::Default);
        assert_eq!(ids(&controller.displayed().await), vec!["3", "1", "2"]);
        assert!(controller.surface().snapshot().pagination_visible);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            controller.surface().snapshot().url.unwrap().as_str(),
            "https://portal.example.edu/announcements?page=2&sort=title-asc"
        );
    }

    #[tokio::test]
    async fn clearing_filters_restores_initial_page() {
        let (controller, calls) = controller();
        controller.select_category("ENROLLMENT").await.unwrap();
        controller.set_search("notice").await;
        controller.select_sort(SortOrder::TitleDesc).await;
        controller.select_unit("registrar").await.unwrap();
        controller.select_sort(SortOrder::Newest).await;
        controller.clear_filters().await;

        assert_eq!(controller.mode().await, Mode::Default);
        assert!(Arc::ptr_eq(&controller.displayed().await, &controller.initial()));
        let snapshot = controller.surface().snapshot();
        assert!(snapshot.pagination_visible);
        assert_eq!(
            snapshot.url.unwrap().as_str(),
            "https://portal.example.edu/announcements?page=2"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pagination_hidden_while_full_set_loads() {
        let gate = Arc::new(Notify::new());
        let (controller, _) = controller_with(
            ScriptedSource::gated(full_set(), Arc::clone(&gate)),
            "https://portal.example.edu/announcements",
        );

        let filter = controller.set_search("fest");
        let inspect = async {
            tokio::task::yield_now().await;
            let pending = controller.surface().snapshot();
            gate.notify_one();
            pending
        };
        let (_, pending) = tokio::join!(filter, inspect);

        assert!(pending.loading);
        assert!(!pending.pagination_visible);
        assert_eq!(pending.renders, 0);
        let snapshot = controller.surface().snapshot();
        assert!(!snapshot.loading);
        assert!(!snapshot.pagination_visible);
        assert_eq!(ids(&controller.displayed().await), vec!["2"]);
    }

    #[tokio::test]
    async fn clearing_filters_keeps_sort_over_initial_page() {
        let (controller, _) = controller();
        controller.select_sort(SortOrder::TitleDesc).await;
        controller.select_category("EVENT").await.unwrap();
        controller.clear_filters().await;

        let state = controller.state().await;
        assert_eq!(state.sort, SortOrder::TitleDesc);
        assert_eq!(controller.mode().await, Mode::Default);

        let displayed = controller.displayed().await;
        assert!(!Arc::ptr_eq(&displayed, &controller.initial()));
        assert_eq!(ids(&displayed), vec!["2", "1", "3"]);
        assert_eq!(ids(&controller.initial()), vec!["1", "2", "3"]);
        let snapshot = controller.surface().snapshot();
        assert!(snapshot.pagination_visible);
        assert_eq!(
            snapshot.url.unwrap().as_str(),
            "https://portal.example.edu/announcements?page=2&sort=title-desc"
        );
    }

    #[tokio::test]
    async fn concurrent_triggers_issue_one_fetch() {
        let gate = Arc::new(Notify::new());
        let (controller, calls) = controller_with(
            ScriptedSource::gated(full_set(), Arc::clone(&gate)),
            "https://portal.example.edu/announcements",
        );

        let release = async {
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            gate.notify_one();
        };
        let (_, category, _) = tokio::join!(
            controller.set_search("fair"),
            controller.select_category("EVENT"),
            release
        );
        category.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(ids(&controller.displayed().await), vec!["5"]);
    }

    #[tokio::test]
    async fn stale_results_are_not_rendered() {
        let gate = Arc::new(Notify::new());
        let (controller, calls) = controller_with(
            ScriptedSource::gated(full_set(), Arc::clone(&gate)),
            "https://portal.example.edu/announcements",
        );

        let first = controller.select_category("EVENT");
        let second = async {
            tokio::task::yield_now().await;
            controller.select_category("ENROLLMENT").await
        };
        let release = async {
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            gate.notify_one();
        };
        let (first, second, _) = tokio::join!(first, second, release);
        first.unwrap();
        second.unwrap();

        let snapshot = controller.surface().snapshot();
        assert_eq!(snapshot.renders, 1);
        assert!(snapshot.list_html.contains("data-id=\"3\""));
        assert!(!snapshot.list_html.contains("data-id=\"1\""));
        assert_eq!(ids(&controller.displayed().await), vec!["3", "6"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clearing_while_fetch_pending_keeps_initial_page() {
        let gate = Arc::new(Notify::new());
        let (controller, _) = controller_with(
            ScriptedSource::gated(full_set(), Arc::clone(&gate)),
            "https://portal.example.edu/announcements",
        );

        let filter = controller.set_search("fest");
        let clear = async {
            tokio::task::yield_now().await;
            controller.clear_filters().await;
            gate.notify_one();
        };
        tokio::join!(filter, clear);

        assert!(Arc::ptr_eq(&controller.displayed().await, &controller.initial()));
        let snapshot = controller.surface().snapshot();
        assert!(snapshot.pagination_visible);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn fetch_failure_shows_empty_state() {
        let (controller, calls) = controller_with(
            ScriptedSource::failing(),
            "https://portal.example.edu/announcements",
        );
        controller.set_search("anything").await;

        let snapshot = controller.surface().snapshot();
        assert_eq!(snapshot.list_html.matches("class=\"empty-state\"").count(), 1);
        assert_eq!(snapshot.list_html.matches("<article").count(), 0);
        assert!(!snapshot.loading);
        assert!(!snapshot.pagination_visible);

        // Not cached, the next change tries again
        controller.select_sort(SortOrder::Oldest).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unknown_selections_fall_back_to_all() {
        let (controller, _) = controller();
        assert!(matches!(
            controller.select_category("PARTY").await,
            Err(StateError::UnknownCategory(_))
        ));
        assert!(controller.state().await.category.is_all());

        assert!(matches!(
            controller.select_unit("library").await,
            Err(StateError::UnknownUnit(_))
        ));
        assert!(controller.state().await.unit.is_all());
        assert_eq!(controller.mode().await, Mode::Default);

        // Category codes match case-insensitively
        controller.select_category("event").await.unwrap();
        assert_eq!(controller.displayed().await.len(), 3);
    }

    #[tokio::test]
    async fn init_restores_state_from_url() {
        let (controller, calls) = controller_with(
            ScriptedSource::new(full_set()),
            "https://portal.example.edu/announcements?category=EVENT&unit=nowhere&sort=oldest",
        );
        controller.init().await;

        let state = controller.state().await;
        assert_eq!(state.category, Selection::Only("EVENT".to_string()));
        assert!(state.unit.is_all());
        assert_eq!(state.sort, SortOrder::Oldest);
        assert_eq!(ids(&controller.displayed().await), vec!["5", "2", "1"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn search_input_is_debounced() {
        let (controller, calls) = controller();

        let typing = |text: &'static str, at: u64| {
            let controller = &controller;
            async move {
                tokio::time::sleep(std::time::Duration::from_millis(at)).await;
                controller.on_search_input(text).await
            }
        };
        let (e, en, enroll) = tokio::join!(typing("e", 0), typing("en", 120), typing("enroll", 240));

        assert!(!e);
        assert!(!en);
        assert!(enroll);
        assert_eq!(controller.state().await.search, "enroll");
        assert_eq!(controller.surface().snapshot().renders, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
