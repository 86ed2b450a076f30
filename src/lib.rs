pub mod cli;
pub mod client;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod parser;
pub mod schema;
pub mod server;
pub mod store;
pub mod ui;

pub use cli::{Cli, Commands};
pub use dataset::{Coords, Dataset, District, School};
pub use error::{IngestError, IngestResult};
pub use ui::{LogUi, Phase, SilentUi, Ui, UiApp};
