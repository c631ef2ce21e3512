pub mod app;
pub mod cli;
pub mod console;
pub mod logging;
pub mod terminal;
