pub mod cleaner;
pub mod refactor;

pub use cleaner::clean_response;
pub use refactor::refactor_response;
