pub mod cell;
pub mod ingest;
pub mod record;
pub mod workbook;

pub use cell::*;
pub use ingest::*;
pub use record::*;
pub use workbook::*;
