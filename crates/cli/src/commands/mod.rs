pub mod chat;
pub mod classify;
pub mod config_cmd;
pub mod personas;
pub mod serve;
pub mod status;
