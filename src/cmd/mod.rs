pub mod fields;
pub mod forecast;
