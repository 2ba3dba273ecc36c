pub mod benchmark;
pub mod bots;
pub mod runner;
pub mod tactics;
pub mod util;
