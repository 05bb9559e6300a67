pub mod command_handler;
pub mod session_handler;
