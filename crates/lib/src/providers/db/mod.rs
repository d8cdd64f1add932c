pub mod mysql;
pub mod storage;
