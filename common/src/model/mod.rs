pub mod attendance;
pub mod documents;
pub mod form;
pub mod reference;
pub mod student;
pub mod submission;
