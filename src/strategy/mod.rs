pub mod forecast;
pub mod optimization;
pub mod policy;
