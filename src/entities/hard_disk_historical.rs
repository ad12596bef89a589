use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "HardDiskHistorical")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub disk_name: String,

    /// Last 8 characters of the source serial
    pub serial_number: String,

    pub file_name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub full_path: Option<String>,

    pub size_mb: Option<f64>,

    pub modified: Option<DateTime>,

    pub uploaded_by: Option<String>,

    pub uploaded_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
