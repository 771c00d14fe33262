//! `SeaORM` implementations of the entitlement repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    Value,
};
use user_entitlement_sdk::{EntitlementStatus, PermissionKind, UserDto};
use uuid::Uuid;

use super::entity::{user, user_permission};
use super::mapper;
use crate::domain::error::DomainError;
use crate::domain::model::Entitlement;
use crate::domain::repos::{EntitlementRepository, UserRepository};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn get(&self, id: i32) -> Result<Option<UserDto>, DomainError> {
        let row = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(mapper::user_to_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserDto>, DomainError> {
        let row = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(row.map(mapper::user_to_model))
    }

    async fn insert(&self, username: &str) -> Result<UserDto, DomainError> {
        let row = user::ActiveModel {
            username: Set(username.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(mapper::user_to_model(row))
    }
}

pub struct SeaOrmEntitlementRepository {
    db: DatabaseConnection,
}

impl SeaOrmEntitlementRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntitlementRepository for SeaOrmEntitlementRepository {
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Entitlement>, DomainError> {
        let rows = user_permission::Entity::find()
            .filter(user_permission::Column::UserId.eq(user_id))
            .order_by_asc(user_permission::Column::Id)
            .all(&self.db)
            .await?;
        rows.into_iter().map(mapper::permission_to_model).collect()
    }

    async fn find_by_triple(
        &self,
        user_id: i32,
        kind: PermissionKind,
        item_id: i32,
    ) -> Result<Option<Entitlement>, DomainError> {
        let row = user_permission::Entity::find()
            .filter(user_permission::Column::UserId.eq(user_id))
            .filter(user_permission::Column::PermissionType.eq(mapper::kind_to_db(kind)))
            .filter(user_permission::Column::ItemId.eq(item_id))
            .one(&self.db)
            .await?;
        row.map(mapper::permission_to_model).transpose()
    }

    async fn find_by_request_id(
        &self,
        request_id: Uuid,
    ) -> Result<Option<Entitlement>, DomainError> {
        let row = user_permission::Entity::find()
            .filter(user_permission::Column::RequestId.eq(request_id))
            .one(&self.db)
            .await?;
        row.map(mapper::permission_to_model).transpose()
    }

    async fn find_active_groups(&self, user_id: i32) -> Result<Vec<Entitlement>, DomainError> {
        let rows = user_permission::Entity::find()
            .filter(user_permission::Column::UserId.eq(user_id))
            .filter(
                user_permission::Column::PermissionType
                    .eq(mapper::kind_to_db(PermissionKind::Group)),
            )
            .filter(
                user_permission::Column::Status
                    .eq(mapper::status_to_db(EntitlementStatus::Active)),
            )
            .order_by_asc(user_permission::Column::ItemId)
            .all(&self.db)
            .await?;
        rows.into_iter().map(mapper::permission_to_model).collect()
    }

    async fn insert_pending(
        &self,
        user_id: i32,
        kind: PermissionKind,
        item_id: i32,
        item_name: Option<&str>,
        request_id: Uuid,
    ) -> Result<Entitlement, DomainError> {
        let row = user_permission::ActiveModel {
            user_id: Set(user_id),
            permission_type: Set(mapper::kind_to_db(kind).to_owned()),
            item_id: Set(item_id),
            item_name: Set(item_name.map(ToOwned::to_owned)),
            status: Set(mapper::status_to_db(EntitlementStatus::Pending).to_owned()),
            request_id: Set(request_id),
            assigned_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        mapper::permission_to_model(row)
    }

    async fn reset_to_pending(&self, id: i32, request_id: Uuid) -> Result<bool, DomainError> {
        // The status guard makes the flip race-safe: a concurrent request
        // that already reset the row leaves nothing for this one to match.
        let result = user_permission::Entity::update_many()
            .col_expr(
                user_permission::Column::Status,
                Expr::value(mapper::status_to_db(EntitlementStatus::Pending)),
            )
            .col_expr(user_permission::Column::RequestId, Expr::value(request_id))
            .col_expr(
                user_permission::Column::AssignedAt,
                Expr::value(Value::ChronoDateTimeUtc(None)),
            )
            .filter(user_permission::Column::Id.eq(id))
            .filter(user_permission::Column::Status.is_in([
                mapper::status_to_db(EntitlementStatus::Revoked),
                mapper::status_to_db(EntitlementStatus::Rejected),
            ]))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn set_status(
        &self,
        id: i32,
        status: EntitlementStatus,
        assigned_at: Option<DateTime<Utc>>,
    ) -> Result<bool, DomainError> {
        let mut update = user_permission::Entity::update_many().col_expr(
            user_permission::Column::Status,
            Expr::value(mapper::status_to_db(status)),
        );
        if let Some(ts) = assigned_at {
            update = update.col_expr(user_permission::Column::AssignedAt, Expr::value(ts));
        }

        let result = update
            .filter(user_permission::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
