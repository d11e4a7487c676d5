pub mod market;
pub mod output;
pub mod scenario;

pub use market::*;
pub use output::*;
pub use scenario::*;
