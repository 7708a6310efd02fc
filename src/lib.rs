pub mod app;
pub mod board;
pub mod game;
pub mod ui;
