pub mod hard_disk;
pub mod server;
pub mod user;
