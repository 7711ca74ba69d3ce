use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::config::BootstrapAdminConfig;
use crate::entity::{exam_result, registration, role, role_permission, school, user};
use crate::utils::hash;

const ROLES: &[(&str, &str)] = &[
    (role::ADMIN, "Full access including corrections and deletions"),
    (role::MANAGER, "Data entry and read access"),
];

/// Default role-permission mappings seeded on startup.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    // Admin: all permissions
    (role::ADMIN, "reference:create"),
    (role::ADMIN, "reference:manage"),
    (role::ADMIN, "registration:view"),
    (role::ADMIN, "registration:delete"),
    (role::ADMIN, "result:create"),
    (role::ADMIN, "result:view"),
    (role::ADMIN, "result:manage"),
    (role::ADMIN, "leaderboard:view"),
    (role::ADMIN, "contact:view"),
    // Manager: data entry and read access
    (role::MANAGER, "reference:create"),
    (role::MANAGER, "registration:view"),
    (role::MANAGER, "result:create"),
    (role::MANAGER, "result:view"),
    (role::MANAGER, "leaderboard:view"),
    (role::MANAGER, "contact:view"),
];

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut roles_inserted = 0u32;
    for &(name, description) in ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(OnConflict::column(role::Column::Name).do_nothing().to_owned())
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => roles_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }
    if roles_inserted > 0 {
        info!("Seeded {} new roles", roles_inserted);
    }

    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => perms_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }
    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

/// Create the configured administrator unless a user with that name exists.
/// An existing account keeps its password.
pub async fn seed_bootstrap_admin(
    db: &DatabaseConnection,
    admin: &BootstrapAdminConfig,
) -> Result<(), DbErr> {
    let exists = user::Entity::find()
        .filter(user::Column::Username.eq(&admin.username))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    let password = hash::hash_password(&admin.password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;
    let model = user::ActiveModel {
        username: Set(admin.username.clone()),
        password: Set(password),
        role: Set(role::ADMIN.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = user::Entity::insert(model)
        .on_conflict(OnConflict::column(user::Column::Username).do_nothing().to_owned())
        .exec_without_returning(db)
        .await;
    match result {
        Ok(_) => info!(username = %admin.username, "Created bootstrap admin"),
        Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't create composite indexes, so they are added on
/// startup. The unique ones back the duplicate checks and must exist.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let unique = [
        Index::create()
            .if_not_exists()
            .unique()
            .name("uq_school_district_name")
            .table(school::Entity)
            .col(school::Column::DistrictId)
            .col(school::Column::Name)
            .to_string(PostgresQueryBuilder),
        Index::create()
            .if_not_exists()
            .unique()
            .name("uq_registration_roll")
            .table(registration::Entity)
            .col(registration::Column::ExamYearId)
            .col(registration::Column::SchoolId)
            .col(registration::Column::DistrictId)
            .col(registration::Column::SchoolRollNo)
            .to_string(PostgresQueryBuilder),
    ];
    for stmt in unique {
        db.execute_unprepared(&stmt).await?;
    }
    info!("Ensured unique indexes exist");

    // Leaderboards load one exam year at a time.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_exam_result_exam_year")
        .table(exam_result::Entity)
        .col(exam_result::Column::ExamYearId)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_exam_result_exam_year exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_exam_result_exam_year: {}", e);
        }
    }

    Ok(())
}
