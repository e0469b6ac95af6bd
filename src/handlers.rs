use crate::errors::AppError;
use crate::export::{csv_filename, json_filename, parse_backup, to_csv, to_json};
use crate::models::{
    AppData, CellResponse, ChatRequest, ChatResponse, CycleRequest, NewStudentRequest,
    RemoveQuery, SetAttendanceRequest, SettingsRequest, StatsResponse, Student,
};
use crate::roster;
use crate::state::AppState;
use crate::stats::build_stats;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use chrono::Local;
use tracing::{info, warn};
use uuid::Uuid;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    Html(render_index(&data.training_title))
}

pub async fn get_data(State(state): State<AppState>) -> Json<AppData> {
    Json(state.snapshot().await)
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let data = state.data.lock().await;
    Json(build_stats(&data))
}

pub async fn add_student(
    State(state): State<AppState>,
    Json(payload): Json<NewStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let id = payload
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let student = Student {
        id,
        name: payload.name,
        school_id: payload.school_id,
        strand: payload.strand,
    };

    let added = state
        .commit(|data| {
            let next = roster::add_student(data, student)?;
            let added = next.students.last().cloned();
            Ok((next, added))
        })
        .await
        .inspect_err(|err| warn!("rejected new student: {err}"))?;

    let added = added.ok_or_else(|| AppError::bad_request("student was not added"))?;
    info!(id = %added.id, name = %added.name, "student enrolled");
    Ok((StatusCode::CREATED, Json(added)))
}

pub async fn remove_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RemoveQuery>,
) -> Result<StatusCode, AppError> {
    if !query.confirm {
        return Err(AppError::bad_request(
            "removing a student deletes all their records; repeat with confirm=true",
        ));
    }

    state
        .commit(|data| Ok((roster::remove_student(data, &id), ())))
        .await?;
    info!(id = %id, "student removed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_attendance(
    State(state): State<AppState>,
    Json(payload): Json<SetAttendanceRequest>,
) -> Result<Json<CellResponse>, AppError> {
    let SetAttendanceRequest {
        student_id,
        day,
        status,
    } = payload;

    state
        .commit(|data| Ok((roster::set_attendance(data, &student_id, day, status)?, ())))
        .await
        .inspect_err(|err| warn!("rejected attendance update: {err}"))?;

    Ok(Json(CellResponse {
        student_id,
        day,
        status,
    }))
}

pub async fn cycle_attendance(
    State(state): State<AppState>,
    Json(payload): Json<CycleRequest>,
) -> Result<Json<CellResponse>, AppError> {
    let status = state
        .commit(|data| roster::cycle_attendance(data, &payload.student_id, payload.day))
        .await
        .inspect_err(|err| warn!("rejected attendance cycle: {err}"))?;

    Ok(Json(CellResponse {
        student_id: payload.student_id,
        day: payload.day,
        status,
    }))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<SettingsRequest>,
) -> Result<Json<AppData>, AppError> {
    let updated = state
        .commit(|data| {
            let next = roster::update_settings(
                data,
                payload.training_title.as_deref(),
                payload.start_date.as_deref(),
            )?;
            Ok((next.clone(), next))
        })
        .await?;
    Ok(Json(updated))
}

pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.snapshot().await;
    let filename = csv_filename(Local::now().date_naive());
    attachment("text/csv; charset=utf-8", filename, to_csv(&data))
}

pub async fn export_json(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = state.snapshot().await;
    let filename = json_filename(Local::now().date_naive());
    Ok(attachment("application/json", filename, to_json(&data)?))
}

pub async fn import_backup(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<AppData>, AppError> {
    let imported = parse_backup(&body).inspect_err(|err| warn!("import rejected: {err}"))?;
    let count = imported.students.len();

    state
        .commit(move |_| Ok((imported.clone(), imported)))
        .await
        .map(|data| {
            info!(students = count, "backup imported");
            Json(data)
        })
        .map_err(AppError::from)
}

pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::bad_request("message cannot be empty"));
    }

    let _guard = state
        .try_begin_chat()
        .ok_or_else(|| AppError::conflict("the assistant is still answering the last message"))?;

    let snapshot = state.snapshot().await;
    let reply = state.assistant.ask(message, &snapshot).await;
    Ok(Json(ChatResponse { reply }))
}

fn attachment(content_type: &'static str, filename: String, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}
