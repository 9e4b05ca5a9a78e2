pub mod chain;
mod feed;
pub mod home;
pub mod not_found;
pub mod topology;
