//! Scenario sequencing: main form, frame section, shadow section.
//!
//! Sections run in a fixed order and fail fast: the first typed failure
//! aborts the rest of the run. Whatever happens, the rendering context is
//! restored to the top-level document before the runner returns.

use crate::actions::Actions;
use crate::context;
use crate::error::EngineError;
use crate::locator::{Locator, LogicalField};
use crate::surface::Surface;
use tracing::{error, info};

/// Per-run state machine. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    PageLoading,
    MainFormFilling,
    FrameSectionActive,
    ShadowSectionActive,
    Completed,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::PageLoading => "page-loading",
            RunState::MainFormFilling => "main-form",
            RunState::FrameSectionActive => "frame-section",
            RunState::ShadowSectionActive => "shadow-section",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// The fixed script of a run: which page, which fields, in which sections.
/// Pure data, built by the caller before the run starts.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub url: String,
    /// Confirms the page is ready before any filling starts.
    pub ready_anchor: LogicalField,
    pub main_fields: Vec<LogicalField>,
    /// Identifies the one top-level frame holding the framed section.
    pub frame_probe: Locator,
    pub frame_fields: Vec<LogicalField>,
    pub shadow_fields: Vec<LogicalField>,
}

/// Outcome of a run.
#[derive(Debug)]
pub struct RunReport {
    pub state: RunState,
    /// Fields applied and verified before the run ended.
    pub fields_applied: usize,
    pub failure: Option<EngineError>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.state == RunState::Completed
    }
}

pub struct ScenarioRunner {
    actions: Actions,
    state: RunState,
}

impl ScenarioRunner {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Drive the scenario to completion or first failure. The surface is
    /// left at the top-level document either way; session teardown stays
    /// with the caller.
    pub async fn run<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        scenario: &Scenario,
    ) -> RunReport {
        let mut applied = 0;
        match self.drive(surface, scenario, &mut applied).await {
            Ok(()) => {
                self.state = RunState::Completed;
                info!(fields = applied, "scenario completed");
                RunReport {
                    state: RunState::Completed,
                    fields_applied: applied,
                    failure: None,
                }
            }
            Err(e) => {
                let section = self.state;
                self.state = RunState::Failed;
                error!(section = %section, field = e.field().unwrap_or("-"), error = %e, "scenario failed");
                // The navigator restores context on its own paths; this
                // covers failures in the main and shadow sections.
                let _ = surface.return_to_top().await;
                RunReport {
                    state: RunState::Failed,
                    fields_applied: applied,
                    failure: Some(e),
                }
            }
        }
    }

    async fn drive<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        scenario: &Scenario,
        applied: &mut usize,
    ) -> Result<(), EngineError> {
        self.state = RunState::PageLoading;
        info!(url = %scenario.url, "navigating");
        surface.navigate(&scenario.url).await?;
        self.actions.apply(surface, &scenario.ready_anchor).await?;

        self.state = RunState::MainFormFilling;
        for field in &scenario.main_fields {
            self.actions.apply(surface, field).await?;
            *applied += 1;
        }

        self.state = RunState::FrameSectionActive;
        let actions = &self.actions;
        let frame_applied = context::with_matching_frame(
            surface,
            &scenario.frame_probe,
            async move |inner| {
                let mut count = 0;
                for field in &scenario.frame_fields {
                    actions.apply(inner, field).await?;
                    count += 1;
                }
                Ok(count)
            },
        )
        .await?;
        *applied += frame_applied;

        self.state = RunState::ShadowSectionActive;
        for field in &scenario.shadow_fields {
            self.actions.apply(surface, field).await?;
            *applied += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_starts_idle() {
        let runner = ScenarioRunner::new(Actions::default());
        assert_eq!(runner.state(), RunState::Idle);
    }

    #[test]
    fn run_state_display() {
        assert_eq!(RunState::FrameSectionActive.to_string(), "frame-section");
        assert_eq!(RunState::Completed.to_string(), "completed");
    }
}
