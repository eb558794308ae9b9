pub mod forecast;
pub mod issue;
