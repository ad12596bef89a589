mod check_password;
mod export;
mod import;

pub use check_password::cmd_check_password;
pub use export::cmd_export;
pub use import::cmd_import;
