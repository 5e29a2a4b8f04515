pub mod api;
pub mod connectivity;
pub mod database;
pub mod notification;
pub mod storage;
