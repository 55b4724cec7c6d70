pub mod analyzers;
pub mod charts;
pub mod dashboard;
pub mod output;
pub mod parser;
pub mod record;
pub mod session;
