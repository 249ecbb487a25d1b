//! The automation surface: the set of primitives the engine needs from
//! whatever drives the browser.
//!
//! The engine never talks to a browser directly. It resolves and interacts
//! through this trait, which a WebDriver session (or a mock in tests)
//! implements.

use crate::locator::Locator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque handle to a live element.
///
/// Handles are transient: they are only valid in the rendering context they
/// were produced in. A handle obtained at the top level must not be used
/// inside a frame and vice versa; surfaces report such use as
/// [`SurfaceError::Stale`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Argument passed to [`Surface::execute_script`].
///
/// Element arguments are kept distinct from plain JSON so implementations can
/// substitute the underlying driver's element reference.
#[derive(Debug, Clone)]
pub enum ScriptArg {
    Element(ElementHandle),
    Json(Value),
}

impl ScriptArg {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Json(Value::String(value.into()))
    }
}

/// Errors raised by a surface implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SurfaceError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element {0} is stale or from another rendering context")]
    Stale(String),

    #[error("Script execution error: {0}")]
    Script(String),

    #[error("Frame switch failed: {0}")]
    Frame(String),

    #[error("Surface not ready")]
    NotReady,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Other: {0}")]
    Other(String),
}

impl From<serde_json::Error> for SurfaceError {
    fn from(err: serde_json::Error) -> Self {
        SurfaceError::Serialization(err.to_string())
    }
}

/// The primitives the engine consumes from a browser-driving session.
///
/// `query` distinguishes "no such element" (`Ok(None)`) from genuine surface
/// failures, so the resolver's fallback loop stays result-driven instead of
/// exception-driven.
#[async_trait]
pub trait Surface: Send {
    /// Start the session (launch or connect to the browser).
    async fn launch(&mut self) -> Result<(), SurfaceError>;

    /// Tear the session down. Must be safe to call after a failed run.
    async fn close(&mut self) -> Result<(), SurfaceError>;

    /// Whether the session is up and accepting commands.
    async fn is_ready(&self) -> bool;

    /// Load a URL.
    async fn navigate(&mut self, url: &str) -> Result<(), SurfaceError>;

    /// Find the first element matching `locator` in the current context.
    async fn query(&mut self, locator: &Locator) -> Result<Option<ElementHandle>, SurfaceError>;

    /// Find all elements matching `locator` in the current context.
    async fn query_all(&mut self, locator: &Locator) -> Result<Vec<ElementHandle>, SurfaceError>;

    /// The iframes present at the current (expected: top) level.
    async fn frames(&mut self) -> Result<Vec<ElementHandle>, SurfaceError>;

    /// Make `frame` the current rendering context.
    async fn enter_frame(&mut self, frame: &ElementHandle) -> Result<(), SurfaceError>;

    /// Move one frame up.
    async fn return_to_parent(&mut self) -> Result<(), SurfaceError>;

    /// Reset to the top-level document, from however deep.
    async fn return_to_top(&mut self) -> Result<(), SurfaceError>;

    /// Run a script against the current context. Element args are translated
    /// to driver element references by the implementation.
    async fn execute_script(
        &mut self,
        script: &str,
        args: Vec<ScriptArg>,
    ) -> Result<Value, SurfaceError>;

    async fn get_attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SurfaceError>;

    async fn is_selected(&mut self, element: &ElementHandle) -> Result<bool, SurfaceError>;

    async fn click(&mut self, element: &ElementHandle) -> Result<(), SurfaceError>;

    async fn clear(&mut self, element: &ElementHandle) -> Result<(), SurfaceError>;

    async fn send_text(&mut self, element: &ElementHandle, text: &str)
    -> Result<(), SurfaceError>;

    /// Capture the current viewport as PNG bytes. Observational only.
    async fn screenshot(&mut self) -> Result<Vec<u8>, SurfaceError>;
}
