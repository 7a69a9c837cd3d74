pub mod applications;
pub mod auth;
pub mod contractors;
pub mod customers;
pub mod lines;
pub mod tags;
pub mod uploads;
