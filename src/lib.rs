#[cfg(windows)]
pub mod app;
pub mod config;
#[cfg(windows)]
pub mod platform;
pub mod utils;

#[cfg(test)]
mod tests;
