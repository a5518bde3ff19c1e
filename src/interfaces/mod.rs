pub mod repl;
pub mod web;
