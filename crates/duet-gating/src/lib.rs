pub mod gate;
pub mod heuristic;
pub mod lock;

pub use gate::GatingLayer;
