//! WebDriver implementation of the engine's automation surface.

pub mod surface;

pub use surface::{WebDriverSurface, chrome_capabilities};
