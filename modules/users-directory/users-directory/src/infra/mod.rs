pub mod events;
pub mod password;
pub mod storage;
