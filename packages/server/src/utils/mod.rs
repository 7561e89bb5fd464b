pub mod event;
pub mod hash;
pub mod jwt;
pub mod settings;
pub mod team;
