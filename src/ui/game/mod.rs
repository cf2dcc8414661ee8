pub mod admin;
pub mod panels;
pub mod screen;
pub mod session;
