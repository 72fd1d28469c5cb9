//! Rendering: panels, result views and the distribution chart.

pub mod panels;
pub mod plot;
pub mod results;
