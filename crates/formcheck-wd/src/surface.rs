//! fantoccini-backed [`Surface`].
//!
//! Element handles are keys into a session-owned registry. Each stored
//! element remembers the frame path it was found under; using a handle from
//! another rendering context is rejected as stale instead of sending a doomed
//! WebDriver command.

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use formcheck_engine::locator::{Locator, Strategy};
use formcheck_engine::surface::{ElementHandle, ScriptArg, Surface, SurfaceError};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use tracing::{debug, info};

/// W3C capabilities for a Chrome session, optionally headless.
pub fn chrome_capabilities(headless: bool) -> Map<String, Value> {
    let mut args = vec!["--start-maximized", "--disable-infobars"];
    if headless {
        args.push("--headless=new");
    }
    let caps = json!({
        "browserName": "chrome",
        "goog:chromeOptions": { "args": args },
    });
    caps.as_object().cloned().unwrap_or_default()
}

struct StoredElement {
    element: fantoccini::elements::Element,
    /// Frame path (handle ids) the element was found under.
    context: Vec<String>,
}

pub struct WebDriverSurface {
    webdriver_url: String,
    capabilities: Option<Map<String, Value>>,
    client: Option<Client>,
    elements: HashMap<String, StoredElement>,
    /// Current frame path; empty means top-level document.
    context: Vec<String>,
    next_id: u64,
}

impl WebDriverSurface {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            capabilities: None,
            client: None,
            elements: HashMap::new(),
            context: Vec::new(),
            next_id: 0,
        }
    }

    pub fn with_capabilities(
        webdriver_url: impl Into<String>,
        capabilities: Map<String, Value>,
    ) -> Self {
        let mut s = Self::new(webdriver_url);
        s.capabilities = Some(capabilities);
        s
    }

    fn client(&self) -> Result<&Client, SurfaceError> {
        self.client.as_ref().ok_or(SurfaceError::NotReady)
    }

    fn register(&mut self, element: fantoccini::elements::Element) -> ElementHandle {
        self.next_id += 1;
        let id = format!("el-{}", self.next_id);
        self.elements.insert(
            id.clone(),
            StoredElement {
                element,
                context: self.context.clone(),
            },
        );
        ElementHandle::new(id)
    }

    /// Look up a handle, requiring it to belong to the current context.
    fn lookup(&self, handle: &ElementHandle) -> Result<fantoccini::elements::Element, SurfaceError> {
        let stored = self
            .elements
            .get(handle.id())
            .ok_or_else(|| SurfaceError::Stale(handle.id().to_string()))?;
        if stored.context != self.context {
            return Err(SurfaceError::Stale(handle.id().to_string()));
        }
        Ok(stored.element.clone())
    }

    /// fantoccini has no name/tag strategies; those become CSS.
    async fn find_all(
        client: &Client,
        locator: &Locator,
    ) -> Result<Vec<fantoccini::elements::Element>, fantoccini::error::CmdError> {
        let css;
        let wd = match locator.strategy {
            Strategy::Css => fantoccini::Locator::Css(&locator.selector),
            Strategy::XPath => fantoccini::Locator::XPath(&locator.selector),
            Strategy::Id => fantoccini::Locator::Id(&locator.selector),
            Strategy::Name => {
                css = format!("[name=\"{}\"]", locator.selector);
                fantoccini::Locator::Css(&css)
            }
            Strategy::TagName => fantoccini::Locator::Css(&locator.selector),
        };
        client.find_all(wd).await
    }
}

#[async_trait]
impl Surface for WebDriverSurface {
    async fn launch(&mut self) -> Result<(), SurfaceError> {
        info!(url = %self.webdriver_url, "connecting to WebDriver");
        let mut builder = ClientBuilder::native();
        if let Some(caps) = &self.capabilities {
            builder.capabilities(caps.clone());
        }
        let client = builder
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| SurfaceError::Session(format!("connect failed: {e}")))?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SurfaceError> {
        if let Some(client) = self.client.take() {
            info!("closing WebDriver session");
            client
                .close()
                .await
                .map_err(|e| SurfaceError::Session(format!("close failed: {e}")))?;
        }
        self.elements.clear();
        self.context.clear();
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<(), SurfaceError> {
        let client = self.client()?;
        info!(url, "navigating");
        client
            .goto(url)
            .await
            .map_err(|e| SurfaceError::Navigation(e.to_string()))?;
        self.elements.clear();
        self.context.clear();
        Ok(())
    }

    async fn query(&mut self, locator: &Locator) -> Result<Option<ElementHandle>, SurfaceError> {
        let client = self.client()?;
        let mut found = Self::find_all(client, locator)
            .await
            .map_err(|e| SurfaceError::Other(format!("query {locator} failed: {e}")))?;
        match found.drain(..).next() {
            Some(element) => Ok(Some(self.register(element))),
            None => Ok(None),
        }
    }

    async fn query_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, SurfaceError> {
        let client = self.client()?;
        let found = Self::find_all(client, locator)
            .await
            .map_err(|e| SurfaceError::Other(format!("query {locator} failed: {e}")))?;
        Ok(found.into_iter().map(|e| self.register(e)).collect())
    }

    async fn frames(&mut self) -> Result<Vec<ElementHandle>, SurfaceError> {
        self.query_all(&Locator::tag("iframe")).await
    }

    async fn enter_frame(&mut self, frame: &ElementHandle) -> Result<(), SurfaceError> {
        let element = self.lookup(frame)?;
        debug!(frame = %frame, "entering frame");
        element
            .enter_frame()
            .await
            .map_err(|e| SurfaceError::Frame(format!("enter {frame}: {e}")))?;
        self.context.push(frame.id().to_string());
        Ok(())
    }

    async fn return_to_parent(&mut self) -> Result<(), SurfaceError> {
        let client = self.client()?;
        client
            .enter_parent_frame()
            .await
            .map_err(|e| SurfaceError::Frame(format!("parent frame: {e}")))?;
        self.context.pop();
        Ok(())
    }

    async fn return_to_top(&mut self) -> Result<(), SurfaceError> {
        let client = self.client()?;
        // Frame id null resets to the top-level browsing context.
        client
            .enter_frame(None)
            .await
            .map_err(|e| SurfaceError::Frame(format!("top-level document: {e}")))?;
        self.context.clear();
        Ok(())
    }

    async fn execute_script(
        &mut self,
        script: &str,
        args: Vec<ScriptArg>,
    ) -> Result<Value, SurfaceError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                ScriptArg::Element(handle) => {
                    let element = self.lookup(&handle)?;
                    values.push(serde_json::to_value(&element)?);
                }
                ScriptArg::Json(value) => values.push(value),
            }
        }
        let client = self.client()?;
        client
            .execute(script, values)
            .await
            .map_err(|e| SurfaceError::Script(e.to_string()))
    }

    async fn get_attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SurfaceError> {
        let el = self.lookup(element)?;
        el.attr(name)
            .await
            .map_err(|e| SurfaceError::Other(format!("attr {name}: {e}")))
    }

    async fn is_selected(&mut self, element: &ElementHandle) -> Result<bool, SurfaceError> {
        let el = self.lookup(element)?;
        el.is_selected()
            .await
            .map_err(|e| SurfaceError::Other(format!("is_selected: {e}")))
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), SurfaceError> {
        let el = self.lookup(element)?;
        el.click()
            .await
            .map_err(|e| SurfaceError::Other(format!("click: {e}")))
    }

    async fn clear(&mut self, element: &ElementHandle) -> Result<(), SurfaceError> {
        let el = self.lookup(element)?;
        el.clear()
            .await
            .map_err(|e| SurfaceError::Other(format!("clear: {e}")))
    }

    async fn send_text(
        &mut self,
        element: &ElementHandle,
        text: &str,
    ) -> Result<(), SurfaceError> {
        let el = self.lookup(element)?;
        el.send_keys(text)
            .await
            .map_err(|e| SurfaceError::Other(format!("send_keys: {e}")))
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, SurfaceError> {
        let client = self.client()?;
        client
            .screenshot()
            .await
            .map_err(|e| SurfaceError::Other(format!("screenshot: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_capabilities_carry_headless_arg() {
        let caps = chrome_capabilities(true);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));

        let caps = chrome_capabilities(false);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless=new"));
    }
}
