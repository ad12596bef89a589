use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ServerAssets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub hostname: String,

    pub ip_address: String,

    /// "Production" or "Disaster Recovery"
    pub environment: String,

    /// Free-form grouping key (CORE, APP, DB, ...)
    pub segment: String,

    pub os: Option<String>,

    pub owner: Option<String>,

    /// e.g. "16 cores"
    pub cpu: Option<String>,

    /// e.g. "64 GB"
    pub ram: Option<String>,

    /// e.g. "2 TB"
    pub storage: Option<String>,

    pub created_by: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
