pub mod districts;
pub mod tables;
pub mod types;

pub use districts::*;
pub use tables::*;
pub use types::*;
