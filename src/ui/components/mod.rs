pub mod gallery;
pub mod page;
pub mod player;
pub mod prompt;
pub mod spinner;
