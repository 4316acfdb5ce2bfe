pub mod list;
pub mod by_date;
