pub mod admin_applications;
pub mod applications;
pub mod auth;
pub mod contractors;
pub mod customer;
pub mod error;
pub mod health;
pub mod lines;
pub mod patch;
pub mod schemas;
pub mod tags;
pub mod uploads;
