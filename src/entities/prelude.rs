pub use super::hard_disk_historical::Entity as HardDiskHistorical;
pub use super::server_assets::Entity as ServerAssets;
pub use super::users::Entity as Users;
