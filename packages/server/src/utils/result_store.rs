use std::collections::HashMap;

use ranking::ResultRecord;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entity::{district, exam_result, registration, school};
use crate::error::AppError;

/// Load every result of one exam year as ranking records, optionally limited
/// to one school.
///
/// Stored totals are used as read. Rows whose total or percentage disagree
/// with their subject scores are logged and still returned unchanged.
pub async fn load_records<C: ConnectionTrait>(
    db: &C,
    exam_year_id: i32,
    school_id: Option<i32>,
) -> Result<Vec<ResultRecord>, AppError> {
    let mut select = exam_result::Entity::find()
        .filter(exam_result::Column::ExamYearId.eq(exam_year_id))
        .find_also_related(registration::Entity);
    if let Some(school_id) = school_id {
        select = select.filter(registration::Column::SchoolId.eq(school_id));
    }
    let rows = select.all(db).await?;

    let school_ids: Vec<i32> = rows
        .iter()
        .filter_map(|(_, reg)| reg.as_ref().map(|r| r.school_id))
        .collect();
    let schools: HashMap<i32, school::Model> = school::Entity::find()
        .filter(school::Column::Id.is_in(school_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let district_ids: Vec<i32> = rows
        .iter()
        .filter_map(|(_, reg)| reg.as_ref().map(|r| r.district_id))
        .collect();
    let districts: HashMap<i32, district::Model> = district::Entity::find()
        .filter(district::Column::Id.is_in(district_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();

    let mut records = Vec::with_capacity(rows.len());
    for (result, reg) in rows {
        let Some(reg) = reg else {
            tracing::warn!(result_id = result.id, "Result without registration skipped");
            continue;
        };
        let (Some(school), Some(district)) = (
            schools.get(&reg.school_id),
            districts.get(&reg.district_id),
        ) else {
            tracing::warn!(
                registration_id = reg.id,
                school_id = reg.school_id,
                district_id = reg.district_id,
                "Registration references a missing school or district, skipped"
            );
            continue;
        };

        let record = build_record(&result, reg, school, district);
        if let Err(drift) = record.verify() {
            tracing::warn!(
                result_id = result.id,
                registration_id = record.registration_id,
                %drift,
                "Stored result summary disagrees with subject scores"
            );
        }
        records.push(record);
    }

    tracing::debug!(exam_year_id, ?school_id, count = records.len(), "Loaded result records");
    Ok(records)
}

fn build_record(
    result: &exam_result::Model,
    reg: registration::Model,
    school: &school::Model,
    district: &district::Model,
) -> ResultRecord {
    ResultRecord {
        registration_id: reg.id,
        exam_year_id: result.exam_year_id,
        full_name: reg.full_name,
        class: reg.class,
        group: reg.competition_group,
        school_roll_no: reg.school_roll_no,
        school_id: school.id,
        school_name: school.name.clone(),
        district_id: district.id,
        district_name: district.name.clone(),
        scores: result.scores(),
        total: result.total,
        percentage: result.percentage,
    }
}
