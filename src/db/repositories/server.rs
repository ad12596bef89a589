use crate::entities::{prelude::*, server_assets};
use crate::models::server::{ServerAsset, ServerFilter, ServerInput};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl From<server_assets::Model> for ServerAsset {
    fn from(model: server_assets::Model) -> Self {
        Self {
            id: model.id,
            hostname: model.hostname,
            ip_address: model.ip_address,
            environment: model.environment,
            segment: model.segment,
            os: model.os,
            owner: model.owner,
            cpu: model.cpu,
            ram: model.ram,
            storage: model.storage,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

pub struct ServerRepository {
    conn: DatabaseConnection,
}

impl ServerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, filter: &ServerFilter) -> Result<Vec<ServerAsset>> {
        let mut query = ServerAssets::find()
            .order_by_asc(server_assets::Column::Segment)
            .order_by_asc(server_assets::Column::Hostname);

        if let Some(segment) = &filter.segment {
            query = query.filter(server_assets::Column::Segment.eq(segment.as_str()));
        }

        if let Some(environment) = &filter.environment {
            query = query.filter(server_assets::Column::Environment.eq(environment.as_str()));
        }

        if let Some(keyword) = &filter.keyword {
            query = query.filter(server_assets::Column::Hostname.contains(keyword));
        }

        let items = query.all(&self.conn).await?;
        Ok(items.into_iter().map(ServerAsset::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<ServerAsset>> {
        let server = ServerAssets::find_by_id(id).one(&self.conn).await?;
        Ok(server.map(ServerAsset::from))
    }

    pub async fn create(&self, input: ServerInput, created_by: &str) -> Result<ServerAsset> {
        let active = server_assets::ActiveModel {
            hostname: Set(input.hostname),
            ip_address: Set(input.ip_address),
            environment: Set(input.environment.as_str().to_string()),
            segment: Set(input.segment),
            os: Set(input.os),
            owner: Set(input.owner),
            cpu: Set(input.cpu),
            ram: Set(input.ram),
            storage: Set(input.storage),
            created_by: Set(Some(created_by.to_string())),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        Ok(ServerAsset::from(model))
    }

    pub async fn update(&self, id: i32, input: ServerInput) -> Result<Option<ServerAsset>> {
        let Some(server) = ServerAssets::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: server_assets::ActiveModel = server.into();
        active.hostname = Set(input.hostname);
        active.ip_address = Set(input.ip_address);
        active.environment = Set(input.environment.as_str().to_string());
        active.segment = Set(input.segment);
        active.os = Set(input.os);
        active.owner = Set(input.owner);
        active.cpu = Set(input.cpu);
        active.ram = Set(input.ram);
        active.storage = Set(input.storage);
        let model = active.update(&self.conn).await?;

        Ok(Some(ServerAsset::from(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = ServerAssets::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
