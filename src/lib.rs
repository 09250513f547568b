pub mod analysis;
pub mod cli;
pub mod llm;
pub mod parser;
pub mod report;
pub mod response;
