//! `SeaORM` implementations of the catalog repositories.

use std::collections::HashMap;

use access_catalog_sdk::{Access, ConflictPair, Group, GroupRef, Resource, ResourceType};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::entity::{access, access_resource, conflict, group, group_access, resource};
use super::mapper;
use crate::domain::error::DomainError;
use crate::domain::repos::{
    AccessRepository, ConflictRepository, GroupRepository, ResourceRepository,
};

/// Load accesses (all, or the given ids) with their resources expanded.
async fn load_accesses<C: ConnectionTrait>(
    conn: &C,
    access_ids: Option<&[i32]>,
) -> Result<Vec<Access>, DomainError> {
    let mut query = access::Entity::find().order_by_asc(access::Column::Id);
    if let Some(ids) = access_ids {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        query = query.filter(access::Column::Id.is_in(ids.to_vec()));
    }
    let access_rows = query.all(conn).await?;
    if access_rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = access_rows.iter().map(|row| row.id).collect();
    let links = access_resource::Entity::find()
        .filter(access_resource::Column::AccessId.is_in(ids))
        .all(conn)
        .await?;

    let resource_ids: Vec<i32> = links.iter().map(|link| link.resource_id).collect();
    let resource_rows = if resource_ids.is_empty() {
        Vec::new()
    } else {
        resource::Entity::find()
            .filter(resource::Column::Id.is_in(resource_ids))
            .order_by_asc(resource::Column::Id)
            .all(conn)
            .await?
    };

    let mut resources_by_id: HashMap<i32, Resource> = HashMap::new();
    for row in resource_rows {
        let model = mapper::resource_to_model(row)?;
        resources_by_id.insert(model.id, model);
    }

    let mut resources_by_access: HashMap<i32, Vec<Resource>> = HashMap::new();
    for link in links {
        if let Some(model) = resources_by_id.get(&link.resource_id) {
            resources_by_access
                .entry(link.access_id)
                .or_default()
                .push(model.clone());
        }
    }

    Ok(access_rows
        .into_iter()
        .map(|row| Access {
            id: row.id,
            name: row.name,
            resources: resources_by_access.remove(&row.id).unwrap_or_default(),
        })
        .collect())
}

pub struct SeaOrmResourceRepository {
    db: DatabaseConnection,
}

impl SeaOrmResourceRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepository for SeaOrmResourceRepository {
    async fn list(&self) -> Result<Vec<Resource>, DomainError> {
        let rows = resource::Entity::find()
            .order_by_asc(resource::Column::Id)
            .all(&self.db)
            .await?;
        rows.into_iter().map(mapper::resource_to_model).collect()
    }

    async fn get(&self, id: i32) -> Result<Option<Resource>, DomainError> {
        let row = resource::Entity::find_by_id(id).one(&self.db).await?;
        row.map(mapper::resource_to_model).transpose()
    }

    async fn require_all(&self, ids: &[i32]) -> Result<Vec<Resource>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = resource::Entity::find()
            .filter(resource::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?;

        for id in ids {
            if !rows.iter().any(|row| row.id == *id) {
                return Err(DomainError::not_found("resource", *id));
            }
        }
        rows.into_iter().map(mapper::resource_to_model).collect()
    }

    async fn insert(
        &self,
        name: &str,
        resource_type: ResourceType,
        description: Option<&str>,
    ) -> Result<Resource, DomainError> {
        let row = resource::ActiveModel {
            name: Set(name.to_owned()),
            resource_type: Set(mapper::resource_type_to_db(resource_type).to_owned()),
            description: Set(description.map(ToOwned::to_owned)),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        mapper::resource_to_model(row)
    }

    async fn is_referenced(&self, id: i32) -> Result<bool, DomainError> {
        let count = access_resource::Entity::find()
            .filter(access_resource::Column::ResourceId.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = resource::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

pub struct SeaOrmAccessRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccessRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccessRepository for SeaOrmAccessRepository {
    async fn list(&self) -> Result<Vec<Access>, DomainError> {
        load_accesses(&self.db, None).await
    }

    async fn get(&self, id: i32) -> Result<Option<Access>, DomainError> {
        let mut found = load_accesses(&self.db, Some(&[id])).await?;
        Ok(found.pop())
    }

    async fn insert(&self, name: &str, resource_ids: &[i32]) -> Result<Access, DomainError> {
        let txn = self.db.begin().await?;

        let row = access::ActiveModel {
            name: Set(name.to_owned()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for resource_id in resource_ids {
            access_resource::ActiveModel {
                access_id: Set(row.id),
                resource_id: Set(*resource_id),
            }
            .insert(&txn)
            .await?;
        }

        let mut created = load_accesses(&txn, Some(&[row.id])).await?;
        txn.commit().await?;

        created
            .pop()
            .ok_or_else(|| DomainError::not_found("access", row.id))
    }

    async fn is_referenced(&self, id: i32) -> Result<bool, DomainError> {
        let count = group_access::Entity::find()
            .filter(group_access::Column::AccessId.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let txn = self.db.begin().await?;

        access_resource::Entity::delete_many()
            .filter(access_resource::Column::AccessId.eq(id))
            .exec(&txn)
            .await?;
        let result = access::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn add_resource(&self, access_id: i32, resource_id: i32) -> Result<bool, DomainError> {
        let existing = access_resource::Entity::find_by_id((access_id, resource_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        access_resource::ActiveModel {
            access_id: Set(access_id),
            resource_id: Set(resource_id),
        }
        .insert(&self.db)
        .await?;
        Ok(true)
    }

    async fn remove_resource(
        &self,
        access_id: i32,
        resource_id: i32,
    ) -> Result<bool, DomainError> {
        let result = access_resource::Entity::delete_by_id((access_id, resource_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn groups_containing(&self, access_id: i32) -> Result<Vec<GroupRef>, DomainError> {
        let links = group_access::Entity::find()
            .filter(group_access::Column::AccessId.eq(access_id))
            .all(&self.db)
            .await?;
        let group_ids: Vec<i32> = links.into_iter().map(|link| link.group_id).collect();
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = group::Entity::find()
            .filter(group::Column::Id.is_in(group_ids))
            .order_by_asc(group::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(mapper::group_to_ref).collect())
    }
}

pub struct SeaOrmGroupRepository {
    db: DatabaseConnection,
}

impl SeaOrmGroupRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn accesses_for_group<C: ConnectionTrait>(
        conn: &C,
        group_id: i32,
    ) -> Result<Vec<Access>, DomainError> {
        let links = group_access::Entity::find()
            .filter(group_access::Column::GroupId.eq(group_id))
            .all(conn)
            .await?;
        let access_ids: Vec<i32> = links.into_iter().map(|link| link.access_id).collect();
        load_accesses(conn, Some(&access_ids)).await
    }
}

#[async_trait]
impl GroupRepository for SeaOrmGroupRepository {
    async fn list(&self) -> Result<Vec<Group>, DomainError> {
        let rows = group::Entity::find()
            .order_by_asc(group::Column::Id)
            .all(&self.db)
            .await?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            let accesses = Self::accesses_for_group(&self.db, row.id).await?;
            groups.push(mapper::group_to_model(row, accesses));
        }
        Ok(groups)
    }

    async fn get(&self, id: i32) -> Result<Option<Group>, DomainError> {
        let Some(row) = group::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let accesses = Self::accesses_for_group(&self.db, id).await?;
        Ok(Some(mapper::group_to_model(row, accesses)))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<GroupRef>, DomainError> {
        let row = group::Entity::find()
            .filter(group::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(row.map(mapper::group_to_ref))
    }

    async fn insert(&self, name: &str, access_ids: &[i32]) -> Result<Group, DomainError> {
        let txn = self.db.begin().await?;

        let row = group::ActiveModel {
            name: Set(name.to_owned()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for access_id in access_ids {
            group_access::ActiveModel {
                group_id: Set(row.id),
                access_id: Set(*access_id),
            }
            .insert(&txn)
            .await?;
        }

        let accesses = Self::accesses_for_group(&txn, row.id).await?;
        txn.commit().await?;
        Ok(mapper::group_to_model(row, accesses))
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let txn = self.db.begin().await?;

        group_access::Entity::delete_many()
            .filter(group_access::Column::GroupId.eq(id))
            .exec(&txn)
            .await?;
        let result = group::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn accesses_of(&self, group_id: i32) -> Result<Vec<Access>, DomainError> {
        Self::accesses_for_group(&self.db, group_id).await
    }

    async fn add_access(&self, group_id: i32, access_id: i32) -> Result<bool, DomainError> {
        let existing = group_access::Entity::find_by_id((group_id, access_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        group_access::ActiveModel {
            group_id: Set(group_id),
            access_id: Set(access_id),
        }
        .insert(&self.db)
        .await?;
        Ok(true)
    }

    async fn remove_access(&self, group_id: i32, access_id: i32) -> Result<bool, DomainError> {
        let result = group_access::Entity::delete_by_id((group_id, access_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

pub struct SeaOrmConflictRepository {
    db: DatabaseConnection,
}

impl SeaOrmConflictRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConflictRepository for SeaOrmConflictRepository {
    async fn all(&self) -> Result<Vec<ConflictPair>, DomainError> {
        let rows = conflict::Entity::find()
            .order_by_asc(conflict::Column::GroupId1)
            .order_by_asc(conflict::Column::GroupId2)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(mapper::conflict_to_pair).collect())
    }

    async fn exists(&self, group_id1: i32, group_id2: i32) -> Result<bool, DomainError> {
        // Both directions are stored, so one direction is authoritative; we
        // still check both to survive a half-written pair.
        let count = conflict::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(conflict::Column::GroupId1.eq(group_id1))
                            .add(conflict::Column::GroupId2.eq(group_id2)),
                    )
                    .add(
                        Condition::all()
                            .add(conflict::Column::GroupId1.eq(group_id2))
                            .add(conflict::Column::GroupId2.eq(group_id1)),
                    ),
            )
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create_pair(&self, group_id1: i32, group_id2: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        conflict::ActiveModel {
            group_id1: Set(group_id1),
            group_id2: Set(group_id2),
        }
        .insert(&txn)
        .await?;
        conflict::ActiveModel {
            group_id1: Set(group_id2),
            group_id2: Set(group_id1),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn delete_pair(&self, group_id1: i32, group_id2: i32) -> Result<bool, DomainError> {
        let txn = self.db.begin().await?;

        let forward = conflict::Entity::delete_by_id((group_id1, group_id2))
            .exec(&txn)
            .await?;
        let backward = conflict::Entity::delete_by_id((group_id2, group_id1))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(forward.rows_affected + backward.rows_affected > 0)
    }

    async fn group_has_conflicts(&self, group_id: i32) -> Result<bool, DomainError> {
        // Symmetric storage: any edge shows up with the group on the left.
        let count = conflict::Entity::find()
            .filter(conflict::Column::GroupId1.eq(group_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
