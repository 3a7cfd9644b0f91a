pub mod config;
pub mod display;
pub mod geo;
pub mod input;
pub mod ownship;
pub mod scope;
pub mod sensor;
pub mod speech;
pub mod traffic;
pub mod ui;
