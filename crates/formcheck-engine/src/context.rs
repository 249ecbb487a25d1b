//! Rendering-context navigation: frame scanning and shadow-root access.
//!
//! Frame entry is scoped: [`with_matching_frame`] pairs every descent with a
//! guaranteed return to the top-level document, on success and on failure
//! alike. A frame that errors while being probed is treated as non-matching
//! and the scan continues from the top; once a frame has matched, failures
//! inside it propagate.
//!
//! Shadow roots are not a navigable context. They are reached explicitly,
//! per call, by evaluating a script through the host element handle.

use crate::error::EngineError;
use crate::locator::Locator;
use crate::surface::{ElementHandle, ScriptArg, Surface, SurfaceError};
use serde_json::Value;
use tracing::{debug, warn};

pub const SHADOW_ROOT_PROBE: &str = "return arguments[0].shadowRoot !== null;";

pub const SHADOW_SET_TEXT: &str = "\
const inner = arguments[0].shadowRoot.querySelector(arguments[1]);
if (!inner) { return false; }
inner.value = arguments[2];
inner.dispatchEvent(new Event('change', { bubbles: true }));
return true;";

/// Scan the top-level frames for the first one where `probe` matches, run
/// `op` inside it, and return to the top-level document no matter how `op`
/// exits.
///
/// The scan is non-recursive: nested frames are out of scope. Non-matching
/// frames are left via the parent frame; a frame whose probe errors triggers
/// an unconditional reset to the top before the next frame is tried.
pub async fn with_matching_frame<S, T, F>(
    surface: &mut S,
    probe: &Locator,
    op: F,
) -> Result<T, EngineError>
where
    S: Surface + ?Sized,
    F: AsyncFnOnce(&mut S) -> Result<T, EngineError>,
{
    let frames = surface.frames().await?;
    debug!(count = frames.len(), probe = %probe, "scanning top-level frames");

    for (index, frame) in frames.iter().enumerate() {
        match probe_frame(surface, frame, probe).await {
            Ok(true) => {
                debug!(frame = index, "probe matched, running section in frame");
                let result = op(surface).await;
                let restored = surface.return_to_top().await;
                let value = result?;
                restored.map_err(|e| {
                    EngineError::ContextNavigation(format!(
                        "could not return to top-level document: {e}"
                    ))
                })?;
                return Ok(value);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(frame = index, error = %e, "frame probe failed, resetting to top-level document");
                surface.return_to_top().await.map_err(|e| {
                    EngineError::ContextNavigation(format!(
                        "could not recover to top-level document: {e}"
                    ))
                })?;
            }
        }
    }

    Err(EngineError::ContextNavigation(format!(
        "no top-level frame contains {probe}"
    )))
}

/// Enter `frame` and test the probe. On a match the surface is left inside
/// the frame; on a miss it is returned to the parent. Errors leave the
/// surface wherever the failure happened; the caller resets to top.
async fn probe_frame<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &ElementHandle,
    probe: &Locator,
) -> Result<bool, SurfaceError> {
    surface.enter_frame(frame).await?;
    match surface.query(probe).await? {
        Some(_) => Ok(true),
        None => {
            surface.return_to_parent().await?;
            Ok(false)
        }
    }
}

/// Whether `host` carries an open shadow root.
pub async fn shadow_root_exists<S: Surface + ?Sized>(
    surface: &mut S,
    host: &ElementHandle,
) -> Result<bool, SurfaceError> {
    let value = surface
        .execute_script(SHADOW_ROOT_PROBE, vec![ScriptArg::Element(host.clone())])
        .await?;
    Ok(value.as_bool().unwrap_or(false))
}

/// Set `value` on the element matching `inner` inside the host's shadow tree
/// and dispatch a bubbling change event. Returns false when no such inner
/// element exists.
pub async fn set_shadow_value<S: Surface + ?Sized>(
    surface: &mut S,
    host: &ElementHandle,
    inner: &str,
    value: &str,
) -> Result<bool, SurfaceError> {
    let result = surface
        .execute_script(
            SHADOW_SET_TEXT,
            vec![
                ScriptArg::Element(host.clone()),
                ScriptArg::text(inner),
                ScriptArg::text(value),
            ],
        )
        .await?;
    Ok(matches!(result, Value::Bool(true)))
}
