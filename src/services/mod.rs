pub mod desktop;
pub mod dispatcher;
pub mod error;
pub mod resolver;
pub mod runner;
pub mod settings;
pub mod shell;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;
