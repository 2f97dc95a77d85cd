//! Drives Chromium through the site's search form and records the search
//! API request it fires, via the DevTools Network domain.

use super::models::{CaptureSession, CapturedRequest};
use crate::config::CarsConfig;
use crate::{ScraperError, ScraperResult};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventRequestWillBeSent, EventResponseReceived,
};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

const LOCATION_INPUT: &str = r#"[data-testid="search-form-location-typeahead-input"]"#;
const SUBMIT_BUTTON: &str = r#"[data-testid="search-form-submit-button"]"#;
const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn browser_config(config: &CarsConfig) -> ScraperResult<BrowserConfig> {
    let mut builder = BrowserConfig::builder();
    if !config.headless {
        builder = builder.with_head();
    }
    if let Some(path) = &config.chrome_executable {
        builder = builder.chrome_executable(path);
    }
    builder
        .arg("--disable-blink-features=AutomationControlled")
        .build()
        .map_err(ScraperError::BrowserError)
}

/// Runs one capture. Automation failures are logged and the partial session
/// returned; only a browser that cannot be started is an error.
pub async fn capture(config: &CarsConfig) -> ScraperResult<CaptureSession> {
    info!("Starting browser...");
    let (mut browser, mut handler) = Browser::launch(browser_config(config)?).await?;

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("Browser handler stopped: {}", e);
                break;
            }
        }
    });

    let state = Arc::new(Mutex::new(CaptureSession::default()));
    let mut listeners = Vec::new();

    let outcome = match browser.new_page("about:blank").await {
        Ok(page) => match listen(&page, config, Arc::clone(&state), &mut listeners).await {
            Ok(()) => drive(&page, config, Arc::clone(&state)).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e.into()),
    };
    if let Err(e) = outcome {
        error!("Error during automation: {}", e);
    }

    info!("Closing browser...");
    if let Err(e) = browser.close().await {
        warn!("Browser did not close cleanly: {}", e);
    }
    let _ = browser.wait().await;
    for listener in listeners {
        listener.abort();
    }
    handler_task.abort();

    let session = state.lock().clone();
    Ok(session)
}

/// Enables network events and spawns one task per event stream.
async fn listen(
    page: &Page,
    config: &CarsConfig,
    state: Arc<Mutex<CaptureSession>>,
    tasks: &mut Vec<JoinHandle<()>>,
) -> ScraperResult<()> {
    page.execute(EnableParams::default()).await?;

    let mut requests = page.event_listener::<EventRequestWillBeSent>().await?;
    let target = config.target_url.clone();
    tasks.push(tokio::spawn(async move {
        while let Some(event) = requests.next().await {
            if event.request.url != target {
                continue;
            }
            let Some(request) = serde_json::to_value(&event.request)
                .ok()
                .and_then(|raw| CapturedRequest::from_cdp_request(&raw))
            else {
                warn!("Could not read captured request to {}", target);
                continue;
            };

            info!("Captured target request: {} {}", request.method, request.url);
            info!("Captured {} headers from search API request", request.headers.len());
            state.lock().record(&target, request);
        }
    }));

    let mut responses = page.event_listener::<EventResponseReceived>().await?;
    let target = config.target_url.clone();
    tasks.push(tokio::spawn(async move {
        while let Some(event) = responses.next().await {
            if event.response.url == target {
                info!(
                    "Response from target: {} - status {}",
                    event.response.url, event.response.status
                );
            }
        }
    }));

    Ok(())
}

/// Polls for `selector` until it appears or `timeout` runs out.
async fn find_within(page: &Page, selector: &str, timeout: Duration) -> Option<Element> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(element) = page.find_element(selector).await {
            return Some(element);
        }
        if Instant::now() >= deadline {
            return None;
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Fixed sleeps stand in for completion signals; the page gives none we can
/// rely on for the search call.
async fn drive(
    page: &Page,
    config: &CarsConfig,
    state: Arc<Mutex<CaptureSession>>,
) -> ScraperResult<()> {
    info!("Navigating to {}", config.start_url);
    page.goto(config.start_url.as_str()).await?;
    sleep(ms(config.page_load_delay_ms)).await;

    let element_timeout = ms(config.element_timeout_ms);
    let Some(input) = find_within(page, LOCATION_INPUT, element_timeout).await else {
        warn!("Search input field not found");
        return Ok(());
    };
    input.click().await?;
    sleep(ms(config.click_delay_ms)).await;

    info!("Typing {:?} in search field", config.search_text);
    input.type_str(&config.search_text).await?;
    sleep(ms(config.typing_delay_ms)).await;

    let Some(button) = find_within(page, SUBMIT_BUTTON, element_timeout).await else {
        warn!("Search button not found");
        return Ok(());
    };
    button.click().await?;

    info!("Waiting for search API request...");
    sleep(ms(config.submit_delay_ms)).await;

    let cookies = page.get_cookies().await?;
    let mut session = state.lock();
    session.cookies = cookies
        .into_iter()
        .map(|cookie| (cookie.name, cookie.value))
        .collect();
    info!("Captured {} cookies from browser", session.cookies.len());

    if session.search_request.is_some() {
        info!("Captured data from {}", config.target_url);
    } else {
        warn!("Did not capture the target search API request");
    }
    Ok(())
}
