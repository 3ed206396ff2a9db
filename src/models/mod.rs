pub mod assignment;
pub mod delegate;
pub mod school;
pub mod user;
