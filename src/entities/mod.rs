pub mod prelude;

pub mod hard_disk_historical;
pub mod server_assets;
pub mod users;
