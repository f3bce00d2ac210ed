//! [`InteractiveSurface`] backed by a Chrome instance driven over the
//! DevTools protocol.
//!
//! The listing is an image search result grid. Every element lookup is a
//! positional XPath kept in [`SurfaceSelectors`] so it can be overridden
//! from the settings file when the page layout moves.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::StreamExt;
use harvester_core::SizeFilter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::{InteractiveSurface, Ordinal, SurfaceError};

const SCRIPT_VISIBLE_COUNT: &str = "document.images.length";
const SCRIPT_CONTENT_EXTENT: &str = "document.body.scrollHeight";
const SCRIPT_REVEAL: &str = "window.scrollTo(0, document.body.scrollHeight)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceSelectors {
    pub search_url: String,
    pub search_box: String,
    pub tools_button: String,
    pub size_menu: String,
    pub size_large: String,
    pub size_medium: String,
    pub size_icon: String,
    pub show_more: String,
    /// `{ordinal}` is replaced with the item's 1-based position.
    pub item_thumbnail: String,
    pub preview_image: String,
}

impl Default for SurfaceSelectors {
    fn default() -> Self {
        const SIZE_OPTIONS: &str =
            r#"//*[@id="yDmH0d"]/div[2]/c-wiz/div[2]/div[2]/c-wiz[1]/div/div/div[3]/div"#;
        Self {
            search_url: "https://images.google.com/".into(),
            search_box: r#"//*[@id="sbtc"]/div/div[2]/input"#.into(),
            tools_button: r#"//*[@id="yDmH0d"]/div[2]/c-wiz/div[1]/div/div[1]/div[2]/div[2]/div"#
                .into(),
            size_menu: r#"//*[@id="yDmH0d"]/div[2]/c-wiz/div[2]/div[2]/c-wiz[1]/div/div/div[1]/div/div[1]/div/div[1]"#
                .into(),
            size_large: format!("{SIZE_OPTIONS}/a[2]/div/span"),
            size_medium: format!("{SIZE_OPTIONS}/a[3]/div/span"),
            size_icon: format!("{SIZE_OPTIONS}/a[4]/div/span"),
            show_more: r#"//*[@id="islmp"]/div/div/div/div[1]/div[2]/div[2]/input"#.into(),
            item_thumbnail: r#"//*[@id="islrg"]/div[1]/div[{ordinal}]/a[1]/div[1]/img"#.into(),
            preview_image: r#"//*[@id="Sva75c"]/div/div/div[3]/div[2]/c-wiz/div/div[1]/div[1]/div[3]/div/a/img"#
                .into(),
        }
    }
}

impl SurfaceSelectors {
    fn size_option(&self, size: SizeFilter) -> &str {
        match size {
            SizeFilter::Large => &self.size_large,
            SizeFilter::Medium => &self.size_medium,
            SizeFilter::Icon => &self.size_icon,
        }
    }

    fn item(&self, ordinal: Ordinal) -> String {
        self.item_thumbnail.replace("{ordinal}", &ordinal.to_string())
    }
}

/// How the browser is launched when no running instance is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub args: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            args: vec!["--incognito".into(), "--disable-gpu".into()],
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl BrowserOptions {
    fn config(&self) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(self.request_timeout)
            .args(self.args.iter().map(String::as_str));
        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &self.executable {
            builder = builder.chrome_executable(executable);
        }
        builder.build().map_err(BrowserError::Launch)
    }
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("could not launch the browser: {0}")]
    Launch(String),
    #[error("could not attach to the browser at {url}: {message}")]
    Connect { url: String, message: String },
    #[error("browser command {operation} failed: {source}")]
    Command {
        operation: &'static str,
        #[source]
        source: CdpError,
    },
}

fn command_error(operation: &'static str) -> impl FnOnce(CdpError) -> BrowserError {
    move |source| BrowserError::Command { operation, source }
}

/// A running browser plus the task that pumps its protocol events.
pub struct BrowserSession {
    browser: Browser,
    events: JoinHandle<()>,
    launched: bool,
}

impl BrowserSession {
    /// Starts a new browser process.
    pub async fn launch(options: &BrowserOptions) -> Result<Self, BrowserError> {
        let (browser, handler) = Browser::launch(options.config()?)
            .await
            .map_err(|err| BrowserError::Launch(err.to_string()))?;
        engine_info!("browser launched (headless: {})", options.headless);
        Ok(Self::start(browser, handler, true))
    }

    /// Attaches to a browser started with `--remote-debugging-port`.
    pub async fn attach(url: &str) -> Result<Self, BrowserError> {
        let (browser, handler) =
            Browser::connect(url)
                .await
                .map_err(|err| BrowserError::Connect {
                    url: url.to_string(),
                    message: err.to_string(),
                })?;
        engine_info!("attached to browser at {url}");
        Ok(Self::start(browser, handler, false))
    }

    fn start(browser: Browser, mut handler: chromiumoxide::Handler, launched: bool) -> Self {
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    engine_debug!("browser event error: {err}");
                }
            }
        });
        Self {
            browser,
            events,
            launched,
        }
    }

    /// Opens a blank tab to run one search in.
    pub async fn open_surface(
        &self,
        selectors: SurfaceSelectors,
    ) -> Result<BrowserSurface, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(command_error("new_page"))?;
        Ok(BrowserSurface { page, selectors })
    }

    /// Shuts down a launched browser; an attached one is only detached.
    pub async fn close(mut self) -> Result<(), BrowserError> {
        if self.launched {
            self.browser
                .close()
                .await
                .map_err(command_error("close"))?;
            if let Err(err) = self.browser.wait().await {
                engine_warn!("browser process did not exit cleanly: {err}");
            }
        }
        self.events.abort();
        engine_info!("browser session closed");
        Ok(())
    }
}

/// One browser tab showing a search result listing.
#[derive(Debug, Clone)]
pub struct BrowserSurface {
    page: Page,
    selectors: SurfaceSelectors,
}

impl BrowserSurface {
    /// Opens the search page and submits `query`.
    pub async fn submit_query(&self, query: &str) -> Result<(), BrowserError> {
        self.page
            .goto(self.selectors.search_url.as_str())
            .await
            .map_err(command_error("goto"))?;
        self.find(&self.selectors.search_box)
            .await
            .map_err(command_error("search_box"))?
            .click()
            .await
            .map_err(command_error("search_box"))?
            .type_str(query)
            .await
            .map_err(command_error("type_query"))?
            .press_key("Enter")
            .await
            .map_err(command_error("type_query"))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(command_error("wait_for_navigation"))?;
        engine_debug!("query submitted");
        Ok(())
    }

    /// Narrows the results to one size bucket through the page's tool menu.
    pub async fn apply_size_filter(&self, size: SizeFilter) -> Result<(), BrowserError> {
        for xpath in [
            self.selectors.tools_button.as_str(),
            self.selectors.size_menu.as_str(),
            self.selectors.size_option(size),
        ] {
            self.find(xpath)
                .await
                .map_err(command_error("size_filter"))?
                .click()
                .await
                .map_err(command_error("size_filter"))?;
        }
        engine_debug!("size filter {size} applied");
        Ok(())
    }

    async fn find(&self, xpath: &str) -> Result<Element, CdpError> {
        self.page.find_xpath(xpath).await
    }

    async fn evaluate(&self, operation: &'static str, script: &str) -> Result<Option<Value>, SurfaceError> {
        self.page
            .evaluate(script)
            .await
            .map(|result| result.value().cloned())
            .map_err(|err| SurfaceError::operation(operation, err.to_string()))
    }

    async fn evaluate_count(&self, operation: &'static str, script: &str) -> Result<u64, SurfaceError> {
        let value = self.evaluate(operation, script).await?;
        count_from_value(value.as_ref()).ok_or_else(|| {
            SurfaceError::operation(operation, format!("not a count: {value:?}"))
        })
    }
}

#[async_trait::async_trait]
impl InteractiveSurface for BrowserSurface {
    async fn trigger_reveal(&self) -> Result<(), SurfaceError> {
        self.evaluate("trigger_reveal", SCRIPT_REVEAL).await.map(|_| ())
    }

    async fn visible_item_count(&self) -> Result<u64, SurfaceError> {
        self.evaluate_count("visible_item_count", SCRIPT_VISIBLE_COUNT)
            .await
    }

    async fn content_extent(&self) -> Result<u64, SurfaceError> {
        self.evaluate_count("content_extent", SCRIPT_CONTENT_EXTENT)
            .await
    }

    async fn activate_show_more(&self) -> Result<bool, SurfaceError> {
        let button = match self.find(&self.selectors.show_more).await {
            Ok(button) => button,
            Err(err) if is_missing_element(&err) => return Ok(false),
            Err(err) => return Err(SurfaceError::operation("activate_show_more", err.to_string())),
        };
        button
            .click()
            .await
            .map(|_| true)
            .map_err(|err| SurfaceError::operation("activate_show_more", err.to_string()))
    }

    async fn select_item(&self, ordinal: Ordinal) -> Result<(), SurfaceError> {
        let item = match self.find(&self.selectors.item(ordinal)).await {
            Ok(item) => item,
            Err(err) if is_missing_element(&err) => return Err(SurfaceError::ItemAbsent(ordinal)),
            Err(err) => return Err(SurfaceError::operation("select_item", err.to_string())),
        };
        item.click()
            .await
            .map(|_| ())
            .map_err(|err| SurfaceError::operation("select_item", err.to_string()))
    }

    async fn resolve_selected_locator(&self) -> Result<Option<String>, SurfaceError> {
        let preview = match self.find(&self.selectors.preview_image).await {
            Ok(preview) => preview,
            Err(err) if is_missing_element(&err) => return Ok(None),
            Err(err) => {
                return Err(SurfaceError::operation(
                    "resolve_selected_locator",
                    err.to_string(),
                ))
            }
        };
        preview
            .attribute("src")
            .await
            .map(|src| src.filter(|src| !src.is_empty()))
            .map_err(|err| SurfaceError::operation("resolve_selected_locator", err.to_string()))
    }
}

fn is_missing_element(err: &CdpError) -> bool {
    matches!(err, CdpError::NotFound) || err.to_string().contains("Could not find node")
}

/// Page scripts report numbers as JSON; layout heights may be fractional.
fn count_from_value(value: Option<&Value>) -> Option<u64> {
    let value = value?;
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|n| *n >= 0.0).map(|n| n.round() as u64))
}
