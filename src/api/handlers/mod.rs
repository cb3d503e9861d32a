//! Request handlers.

pub mod books;
pub mod page;
pub mod status;
