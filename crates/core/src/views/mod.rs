pub mod dashboard;
pub mod detail;
pub mod drawer;
pub mod state;
pub mod table;
