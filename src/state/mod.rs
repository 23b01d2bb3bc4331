pub mod app_settings;
pub mod app_state;
pub mod config_store;
pub mod messages;
pub mod refresher;
pub mod source;
