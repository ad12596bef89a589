pub mod password_policy;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{CreateUserRequest, UserError, UserService};
pub use user_service_impl::SeaOrmUserService;

pub mod asset_service;
pub mod asset_service_impl;
pub use asset_service::{
    AssetError, HardDiskListing, HardDiskService, ServerInventory, ServerService,
};
pub use asset_service_impl::{SeaOrmHardDiskService, SeaOrmServerService};
