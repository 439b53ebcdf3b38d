use crate::config::Config;
use crate::events::{ControllerOptions, ListController, PageContext};
use crate::listing::{Announcement, Client, DataSource, Downloadable, RemoteListing};
use crate::state::{Mode, SortOrder, StateError};
use crate::ui::{BufferedSurface, Card};
use crate::utils::SystemClock;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::*;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// The lists the portal renders.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Announcements,
    Downloadables,
}

impl ListKind {
    pub const NAMES: [&'static str; 2] = ["announcements", "downloadables"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Announcements => "announcements",
            ListKind::Downloadables => "downloadables",
        }
    }
}

impl FromStr for ListKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "announcements" => Ok(ListKind::Announcements),
            "downloadables" => Ok(ListKind::Downloadables),
            other => Err(anyhow!("Unknown list '{}'", other)),
        }
    }
}

/// What to show and which filters to apply on top of the page URL.
///
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub list: ListKind,
    /// JSON file holding the initial page items.
    pub initial: Option<PathBuf>,
    pub page_url: Option<String>,
    pub now: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub sort: Option<SortOrder>,
    pub units: Vec<String>,
}

impl RunOptions {
    pub fn new(list: ListKind) -> Self {
        RunOptions {
            list,
            initial: None,
            page_url: None,
            now: None,
            search: None,
            category: None,
            unit: None,
            sort: None,
            units: Vec::new(),
        }
    }
}

/// Final state of the list view after a run.
///
#[derive(Debug)]
pub struct RunOutput {
    pub html: String,
    pub url: Option<Url>,
    pub mode: Mode,
    pub pagination_visible: bool,
    /// Selections that were rejected and replaced by `all`.
    pub rejected: Vec<StateError>,
}

/// Drives one list view headlessly: builds the controller for the chosen
/// list, replays the requested interactions and reports what was drawn.
///
pub struct App;

impl App {
    /// Run a list view according to the configuration and options.
    ///
    pub async fn start(config: &Config, options: RunOptions) -> Result<RunOutput> {
        info!("Starting {} view...", options.list.as_str());
        let output = match options.list {
            ListKind::Announcements => {
                App::run::<Announcement>(config, &config.announcements_path, options).await?
            }
            ListKind::Downloadables => {
                App::run::<Downloadable>(config, &config.downloadables_path, options).await?
            }
        };
        info!(
            "Finished in {:?} mode ({} bytes of list markup).",
            output.mode,
            output.html.len()
        );
        Ok(output)
    }

    async fn run<T>(config: &Config, path: &str, options: RunOptions) -> Result<RunOutput>
    where
        T: Card + DeserializeOwned,
    {
        let base_url = config.base_url()?;
        let client = Client::new(base_url.as_str(), config.fetch_timeout())?;
        let data = DataSource::new(RemoteListing::<T>::new(client, path));

        let initial: Vec<T> = match &options.initial {
            Some(file) => {
                let contents = fs::read_to_string(file)
                    .with_context(|| format!("Failed to read initial items from {}", file.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse initial items in {}", file.display()))?
            }
            None => Vec::new(),
        };
        let url = match &options.page_url {
            Some(url) => Url::parse(url).with_context(|| format!("Invalid page URL '{}'", url))?,
            None => base_url.join(options.list.as_str())?,
        };
        debug!("Loaded {} initial items for {}", initial.len(), url);

        let page = PageContext {
            initial,
            now: options.now.unwrap_or_else(Utc::now),
            url,
            units: options.units,
        };
        let controller = ListController::new(
            data,
            BufferedSurface::new(),
            page,
            ControllerOptions {
                search_debounce: config.search_debounce(),
                excerpt_words: config.excerpt_word_limit,
            },
        );

        // Without a page time, relative ages follow the wall clock
        let controller = match options.now {
            Some(_) => controller,
            None => controller.with_clock(SystemClock),
        };

        controller.init().await;
        let mut rejected = Vec::new();
        if let Some(search) = &options.search {
            controller.set_search(search).await;
        }
        if let Some(category) = &options.category {
            if let Err(e) = controller.select_category(category).await {
                rejected.push(e);
            }
        }
        if let Some(unit) = &options.unit {
            if let Err(e) = controller.select_unit(unit).await {
                rejected.push(e);
            }
        }
        if let Some(sort) = options.sort {
            controller.select_sort(sort).await;
        }

        let snapshot = controller.surface().snapshot();
        Ok(RunOutput {
            html: snapshot.list_html,
            url: snapshot.url,
            mode: controller.mode().await,
            pagination_visible: snapshot.pagination_visible,
            rejected,
        })
    }
}
