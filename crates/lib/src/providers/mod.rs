pub mod db;
pub mod places;
pub mod text_to_sql;
