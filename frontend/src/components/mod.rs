pub mod api;
pub mod notify;
pub mod registration;
pub mod review;
