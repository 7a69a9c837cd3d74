pub mod applications;
pub mod contractors;
pub mod lines;
