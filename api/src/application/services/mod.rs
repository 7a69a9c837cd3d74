pub mod duplicates;
pub mod passwords;
pub mod pricing;
pub mod uploads;
