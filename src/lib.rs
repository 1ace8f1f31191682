pub mod books;
pub mod cart;
pub mod catalog;
pub mod core;
pub mod utils;
