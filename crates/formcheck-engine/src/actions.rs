//! Typed interactions: resolve, scroll into view, act, verify.
//!
//! Every action either returns `Ok(())` or raises a typed failure carrying
//! the field name; there is no partial result. Scrolling is best-effort: a
//! scroll failure is downgraded to a warning because it rarely breaks the
//! interaction that follows.

use crate::context;
use crate::error::EngineError;
use crate::locator::{Expected, LogicalField};
use crate::resolver::Resolver;
use crate::surface::{ElementHandle, ScriptArg, Surface};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

pub const SCROLL_INTO_VIEW: &str = "arguments[0].scrollIntoView(true);";

/// Settle after a click before re-reading selection state.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);
/// Settle after scrolling an element into view.
pub const DEFAULT_SCROLL_DELAY: Duration = Duration::from_millis(300);

/// CSS selector for the control inside a shadow host.
const SHADOW_INNER: &str = "textarea";

#[derive(Debug, Clone)]
pub struct Actions {
    resolver: Resolver,
    settle_delay: Duration,
    scroll_delay: Duration,
}

impl Default for Actions {
    fn default() -> Self {
        Self::new(Resolver::default())
    }
}

impl Actions {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            settle_delay: DEFAULT_SETTLE_DELAY,
            scroll_delay: DEFAULT_SCROLL_DELAY,
        }
    }

    pub fn with_delays(resolver: Resolver, settle_delay: Duration, scroll_delay: Duration) -> Self {
        Self {
            resolver,
            settle_delay,
            scroll_delay,
        }
    }

    /// Dispatch on the field's expected outcome.
    pub async fn apply<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        field: &LogicalField,
    ) -> Result<(), EngineError> {
        match &field.expect {
            Expected::Present => {
                self.resolver.resolve(surface, field).await?;
                Ok(())
            }
            Expected::Text(value) => self.set_text(surface, field, value).await,
            Expected::RadioSelected => self.select_radio(surface, field).await,
            Expected::CheckboxSelected => self.select_checkbox(surface, field).await,
            Expected::ShadowText(value) => self.set_shadow_textarea(surface, field, value).await,
        }
    }

    /// Clear, type, read back, require exact equality.
    pub async fn set_text<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        field: &LogicalField,
        value: &str,
    ) -> Result<(), EngineError> {
        let element = self.resolver.resolve(surface, field).await?;
        self.scroll_into_view(surface, &element, &field.name).await;

        surface.clear(&element).await?;
        surface.send_text(&element, value).await?;

        let observed = surface
            .get_attribute(&element, "value")
            .await?
            .unwrap_or_default();
        if observed != value {
            return Err(EngineError::Verification {
                field: field.name.clone(),
                expected: value.to_string(),
                actual: observed,
            });
        }
        info!(field = %field.name, "text verified");
        Ok(())
    }

    /// Select a radio button; idempotent, no click when already selected.
    pub async fn select_radio<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        field: &LogicalField,
    ) -> Result<(), EngineError> {
        self.ensure_selected(surface, field).await
    }

    /// Select a checkbox; idempotent, no click when already selected.
    pub async fn select_checkbox<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        field: &LogicalField,
    ) -> Result<(), EngineError> {
        self.ensure_selected(surface, field).await
    }

    async fn ensure_selected<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        field: &LogicalField,
    ) -> Result<(), EngineError> {
        let element = self.resolver.resolve(surface, field).await?;
        self.scroll_into_view(surface, &element, &field.name).await;

        if !surface.is_selected(&element).await? {
            surface.click(&element).await?;
            sleep(self.settle_delay).await;
        }

        // A click that does not change state (overlap, disabled control) is a
        // verification failure, not a silent pass.
        if !surface.is_selected(&element).await? {
            return Err(EngineError::Verification {
                field: field.name.clone(),
                expected: "selected".to_string(),
                actual: "not selected".to_string(),
            });
        }
        info!(field = %field.name, "selection verified");
        Ok(())
    }

    /// Reach through the host's shadow root and set the inner textarea,
    /// dispatching a change event for any listeners.
    pub async fn set_shadow_textarea<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        field: &LogicalField,
        value: &str,
    ) -> Result<(), EngineError> {
        let host = self.resolver.resolve(surface, field).await?;
        self.scroll_into_view(surface, &host, &field.name).await;

        if !context::shadow_root_exists(surface, &host).await? {
            return Err(EngineError::ShadowAccess {
                field: field.name.clone(),
                reason: "host has no shadow root".to_string(),
            });
        }
        if !context::set_shadow_value(surface, &host, SHADOW_INNER, value).await? {
            return Err(EngineError::ShadowAccess {
                field: field.name.clone(),
                reason: format!("no '{SHADOW_INNER}' inside shadow root"),
            });
        }
        info!(field = %field.name, "shadow textarea set");
        Ok(())
    }

    /// Best-effort scroll; never fatal.
    async fn scroll_into_view<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        element: &ElementHandle,
        field: &str,
    ) {
        match surface
            .execute_script(SCROLL_INTO_VIEW, vec![ScriptArg::Element(element.clone())])
            .await
        {
            Ok(_) => sleep(self.scroll_delay).await,
            Err(e) => warn!(field, error = %e, "failed to scroll element into view"),
        }
    }
}
