pub mod extract;
pub mod model;
pub mod solver;

pub use extract::*;
pub use model::*;
pub use solver::*;
