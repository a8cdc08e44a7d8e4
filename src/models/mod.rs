pub mod catalog;
pub mod grant;
pub mod resolver;
pub mod user;
