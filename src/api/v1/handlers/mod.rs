pub mod assignments;
pub mod catalog;
pub mod health;
pub mod navigation;
pub mod verify;
