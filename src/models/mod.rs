pub mod file_record;
pub mod history;
pub mod kind;
