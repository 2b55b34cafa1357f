pub mod io;
pub mod models;
pub mod utils;
pub mod validate;
