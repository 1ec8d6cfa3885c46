pub mod optimize;
pub mod route;
pub mod validate;
