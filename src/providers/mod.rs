pub mod dashboard_api;
pub mod local;
pub mod prediction_api;
pub mod util;

pub use dashboard_api::DashboardApiProvider;
pub use local::LocalPredictionProvider;
pub use prediction_api::PredictionApiProvider;
