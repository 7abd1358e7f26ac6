pub mod engine;
pub mod model;

pub use engine::{clamp_input, compute_base_md, compute_breakdown, Estimator};
pub use model::{AutoQaConfig, Breakdown, CoefficientField, Coefficients, InputField, Inputs};
