pub mod booking;
pub mod discount;
pub mod extra;
pub mod rental;
pub mod settings;
pub mod user;
pub mod vehicle;
