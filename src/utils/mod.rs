pub mod id;
pub mod logging;
pub mod time;
