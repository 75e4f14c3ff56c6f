pub mod config;
pub mod db;
pub mod entities;
pub mod migrate;
pub mod repl;
pub mod task;
pub mod web;
