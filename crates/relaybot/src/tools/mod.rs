//! A set of built-in tools that models can use.

mod calculate;
mod weather;

pub use calculate::CalculateTool;
pub use weather::WeatherTool;
