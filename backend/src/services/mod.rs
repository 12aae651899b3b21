pub mod documents;
pub mod forms;
pub mod promotion;
pub mod reference;
pub mod students;
pub mod submissions;
