//! Interpretable driver model: what moves relative performance

mod cv;
mod drivers;
mod recommend;
mod ridge;
mod scaler;

pub use cv::{cross_val_r2, r2_score, CvScore, KFold};
pub use drivers::{unit_change, DriverModel, FittedDrivers, ModelOutput};
pub use recommend::make_recommendations;
pub use ridge::Ridge;
pub use scaler::StandardScaler;
