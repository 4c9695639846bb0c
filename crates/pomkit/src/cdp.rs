//! Chromium driver over the Chrome `DevTools` Protocol.
//!
//! Locators are resolved in the page with [`Locator::to_js`]; every action is
//! a single script evaluation against the first resolved element, so the
//! driver never holds element handles across calls. Native dialogs are
//! answered from a listener task according to the current [`DialogPolicy`].

use crate::dialog::{Dialog, DialogPolicy, DialogRecorder, DialogType};
use crate::driver::{BrowserDriver, ClickKind, DriverConfig, ElementSnapshot, LoadState};
use crate::locator::Locator;
use crate::result::{PomError, PomResult};
use async_trait::async_trait;
use base64::Engine;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams, EventJavascriptDialogOpening,
    HandleJavaScriptDialogParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const SNAPSHOT_JS: &str = "els => els.map(el => { \
    const r = el.getBoundingClientRect(); \
    const style = window.getComputedStyle(el); \
    const visible = r.width > 0 && r.height > 0 && style.visibility !== 'hidden' && style.display !== 'none'; \
    const control = el.matches('input, textarea, select') ? el : null; \
    const box = el.matches('input[type=checkbox], input[type=radio]') ? el \
        : (el.closest('label') ? el.closest('label').querySelector('input[type=checkbox]') : null); \
    return { \
        tag: el.tagName.toLowerCase(), \
        text: (el.innerText || el.textContent || '').trim(), \
        value: control ? control.value : null, \
        visible, \
        enabled: !el.disabled, \
        checked: box ? box.checked : null, \
        bounds: visible ? { x: r.x, y: r.y, width: r.width, height: r.height } : null \
    }; \
})";

fn driver_err(err: impl std::fmt::Display) -> PomError {
    PomError::driver(err.to_string())
}

/// Result of a browser shutdown: the close error wins, a failed wait for
/// the child process is only logged
fn shutdown_outcome(
    closed: Result<(), impl std::fmt::Display>,
    waited: Result<(), impl std::fmt::Display>,
) -> PomResult<()> {
    if let Err(e) = waited {
        warn!(error = %e, "waiting for chromium to exit failed");
    }
    closed.map_err(driver_err)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Script that runs `body` with `el` bound to the first element `locator`
/// resolves to, returning `false` when nothing matched
fn on_first(locator: &Locator, body: &str) -> String {
    format!(
        "(() => {{ const el = ({})[0]; if (!el) return false; {body} return true; }})()",
        locator.to_js()
    )
}

fn click_script(locator: &Locator, kind: ClickKind) -> String {
    let fire = match kind {
        ClickKind::Single => "el.click();",
        ClickKind::Double => {
            "el.dispatchEvent(new MouseEvent('dblclick', \
             { bubbles: true, cancelable: true, view: window, detail: 2 }));"
        }
        ClickKind::Right => {
            "el.dispatchEvent(new MouseEvent('contextmenu', \
             { bubbles: true, cancelable: true, view: window, button: 2 }));"
        }
    };
    on_first(
        locator,
        &format!("el.scrollIntoView({{ block: 'center' }}); {fire}"),
    )
}

fn fill_script(locator: &Locator, text: &str) -> PomResult<String> {
    let text = serde_json::to_string(text)?;
    Ok(on_first(
        locator,
        &format!(
            "el.focus(); \
             const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
             Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, ''); \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, {text}); \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }}));"
        ),
    ))
}

/// Non-input targets (styled checkbox icons) are resolved to the checkbox of
/// their enclosing label
fn check_script(locator: &Locator, checked: bool) -> String {
    on_first(
        locator,
        &format!(
            "const box = el.matches('input') ? el \
                 : (el.closest('label') ? el.closest('label').querySelector('input[type=checkbox]') : null); \
             if (!box) throw new Error('not checkable'); \
             if (box.checked !== {checked}) {{ el.scrollIntoView({{ block: 'center' }}); el.click(); }}"
        ),
    )
}

fn query_script(locator: &Locator) -> String {
    format!("({SNAPSHOT_JS})({})", locator.to_js())
}

/// [`BrowserDriver`] backed by a real Chromium instance
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Mutex<Option<Browser>>,
    page: Page,
    dialogs: DialogRecorder,
    slow_mo: Duration,
    handler: JoinHandle<()>,
    dialog_listener: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch a browser and open one blank page
    ///
    /// # Errors
    ///
    /// Returns [`PomError::BrowserLaunch`] if Chromium cannot be started
    pub async fn launch(config: &DriverConfig) -> PomResult<Self> {
        let launch_err = |e: &dyn std::fmt::Display| PomError::BrowserLaunch {
            message: e.to_string(),
        };

        let mut builder =
            BrowserConfig::builder().window_size(config.viewport_width, config.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.executable_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder.build().map_err(|e| launch_err(&e))?;

        info!(headless = config.headless, "launching chromium");
        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| launch_err(&e))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| launch_err(&e))?;

        let dialogs = DialogRecorder::new();
        let mut opened = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(|e| launch_err(&e))?;
        let listener_page = page.clone();
        let recorder = dialogs.clone();
        let dialog_listener = tokio::spawn(async move {
            while let Some(event) = opened.next().await {
                let dialog = recorder.handle(Dialog::new(
                    DialogType::from_cdp(event.r#type.as_ref()),
                    event.message.clone(),
                ));
                let accept = matches!(recorder.policy(), DialogPolicy::Accept);
                debug!(message = %dialog.message(), accept, "answering dialog");
                if let Err(err) = listener_page
                    .execute(HandleJavaScriptDialogParams::new(accept))
                    .await
                {
                    warn!(error = %err, "could not answer dialog");
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            page,
            dialogs,
            slow_mo: config.slow_mo,
            handler,
            dialog_listener,
        })
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> PomResult<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(driver_err)?
            .into_value()
            .map_err(driver_err)
    }

    async fn act(&self, operation: &str, locator: &Locator, script: String) -> PomResult<()> {
        let found: bool = self.eval(script).await?;
        if !found {
            return Err(PomError::NotFound {
                operation: operation.to_string(),
                locator: locator.description(),
            });
        }
        if !self.slow_mo.is_zero() {
            tokio::time::sleep(self.slow_mo).await;
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&self, url: &str, state: LoadState, timeout: Duration) -> PomResult<()> {
        let navigation_err = |message: String| PomError::Navigation {
            url: url.to_string(),
            timeout_ms: millis(timeout),
            message,
        };
        let load = async {
            self.page.goto(url).await?;
            if state == LoadState::NetworkIdle {
                self.page.wait_for_navigation().await?;
            }
            Ok::<_, chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(timeout, load).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(navigation_err(err.to_string())),
            Err(_) => Err(navigation_err(format!("{state} not reached"))),
        }
    }

    async fn current_url(&self) -> PomResult<String> {
        Ok(self.page.url().await.map_err(driver_err)?.unwrap_or_default())
    }

    async fn query(&self, locator: &Locator) -> PomResult<Vec<ElementSnapshot>> {
        self.eval(query_script(locator)).await
    }

    async fn click(&self, locator: &Locator, kind: ClickKind) -> PomResult<()> {
        self.act(&kind.to_string(), locator, click_script(locator, kind))
            .await
    }

    async fn fill(&self, locator: &Locator, text: &str) -> PomResult<()> {
        self.act("fill", locator, fill_script(locator, text)?).await
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> PomResult<()> {
        self.act("check", locator, check_script(locator, checked))
            .await
    }

    async fn screenshot(&self, full_page: bool) -> PomResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .capture_beyond_viewport(full_page)
            .build();
        let shot = self.page.execute(params).await.map_err(driver_err)?;
        base64::engine::general_purpose::STANDARD
            .decode(&shot.data)
            .map_err(driver_err)
    }

    async fn set_dialog_policy(&self, policy: DialogPolicy) -> PomResult<()> {
        self.dialogs.set_policy(policy);
        Ok(())
    }

    async fn take_dialogs(&self) -> PomResult<Vec<Dialog>> {
        Ok(self.dialogs.drain())
    }

    async fn close(&self) -> PomResult<()> {
        self.dialog_listener.abort();
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };
        info!("closing chromium");
        let closed = browser.close().await.map(|_| ());
        if closed.is_err() {
            if let Some(Err(e)) = browser.kill().await {
                warn!(error = %e, "killing chromium failed");
            }
        }
        let waited = browser.wait().await.map(|_| ());
        self.handler.abort();
        shutdown_outcome(closed, waited)
    }
}
