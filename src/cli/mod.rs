pub mod chart;
pub mod dashboard;
pub mod explain;
pub mod setup;
pub mod table;
pub mod ui;

pub use table::RangeOptions;
