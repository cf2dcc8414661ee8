pub mod app;
pub mod effects;
pub mod game;
pub mod new_game;
pub mod route;
pub mod settings;
pub mod settings_io;
pub mod title;
pub mod widgets;
