pub mod dir;
pub mod logging;
