//! Backend-agnostic engine for automated form checks.
//!
//! Everything here is written against the [`surface::Surface`] trait so the
//! resolver, context navigator, actions and runner can be exercised with a
//! mock surface in tests and with a real WebDriver session in production.

pub mod actions;
pub mod context;
pub mod error;
pub mod locator;
pub mod resolver;
pub mod runner;
pub mod surface;

pub use actions::Actions;
pub use error::EngineError;
pub use locator::{Expected, Locator, LogicalField, Strategy};
pub use resolver::Resolver;
pub use runner::{RunReport, RunState, Scenario, ScenarioRunner};
pub use surface::{ElementHandle, ScriptArg, Surface, SurfaceError};
