//! Loaders, text rendering and logging setup around `steuer-core`.

pub mod brackets;
pub mod constants;
pub mod logging;
pub mod report;
pub mod requests;

pub use brackets::{BracketLoaderError, TaxBracketLoader, TaxBracketRecord};
pub use constants::{ConstantsLoader, ConstantsLoaderError};
pub use logging::init_logging;
pub use requests::RequestLoadError;
