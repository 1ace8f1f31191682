pub mod command;
pub mod controller;
pub mod domain;
pub mod library;
pub mod query;
pub mod repository;
