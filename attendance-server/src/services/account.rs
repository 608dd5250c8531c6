//! Identity use-cases: signup, profile, user listing, department and role assignment

use shared::error::{AppError, ErrorCode};
use shared::models::{
    AssignDepartmentRequest, Role, SignupRequest, SignupResponse, UpdateProfileRequest,
    UserListQuery, UserResponse, UserStatus,
};
use shared::response::Pagination;
use shared::util::now_nanos;
use uuid::Uuid;

use crate::db::{self, profiles::ProfileFilter, profiles::ProfilePatch};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::util::hash_password_blocking;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date_field};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, normalize_email, validate_password_len, validate_required_text,
};

/// Attempts at drawing a fresh employee code before giving up
const EMPLOYEE_CODE_ATTEMPTS: usize = 3;

pub fn generate_employee_code() -> String {
    format!("EMP-{}", now_nanos())
}

/// Create user, credential, profile and the default role in one transaction
pub async fn signup(
    state: &AppState,
    req: SignupRequest,
    now: i64,
) -> ServiceResult<SignupResponse> {
    let req = req.normalized();
    validate_required_text(&req.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&req.full_name, "full_name", MAX_NAME_LEN)?;
    validate_password_len(&req.password, "password")?;
    let email = normalize_email(&req.email);
    let full_name = req.full_name;
    let password_hash =
        hash_password_blocking(req.password, state.config.password_hash_cost).await?;

    let mut attempt = 0;
    loop {
        attempt += 1;
        let employee_code = generate_employee_code();
        match create_account(state, &email, &password_hash, &full_name, &employee_code, now).await
        {
            Err(e)
                if e.code() == Some(ErrorCode::EmployeeCodeExists)
                    && attempt < EMPLOYEE_CODE_ATTEMPTS =>
            {
                tracing::warn!(employee_code = %employee_code, "Employee code collision, retrying");
            }
            other => return other,
        }
    }
}

async fn create_account(
    state: &AppState,
    email: &str,
    password_hash: &str,
    full_name: &str,
    employee_code: &str,
    now: i64,
) -> ServiceResult<SignupResponse> {
    let user_id = Uuid::new_v4();
    let mut tx = state.pool.begin().await?;

    db::users::insert(
        &mut *tx,
        user_id,
        email,
        UserStatus::Active.as_str(),
        true,
        now,
    )
    .await?;
    db::users::insert_credential(&mut *tx, user_id, password_hash, now).await?;
    db::profiles::insert(&mut *tx, user_id, employee_code, full_name, now).await?;
    db::roles::upsert(&mut *tx, user_id, Role::Employee, now).await?;

    tx.commit().await?;

    tracing::info!(user_id = %user_id, employee_code = %employee_code, "Account created");

    Ok(SignupResponse {
        id: user_id,
        email: email.to_string(),
        employee_code: employee_code.to_string(),
    })
}

pub async fn get_profile(state: &AppState, user_id: Uuid) -> ServiceResult<UserResponse> {
    let view = db::profiles::find_view(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound))?;
    Ok(view.into())
}

/// Apply the non-empty fields of `req`. An empty patch writes nothing.
pub async fn update_profile(
    state: &AppState,
    user_id: Uuid,
    req: UpdateProfileRequest,
    now: i64,
) -> ServiceResult<UserResponse> {
    let req = req.normalized();
    if req.is_empty() {
        return get_profile(state, user_id).await;
    }

    let patch = ProfilePatch {
        full_name: req.full_name.as_deref(),
        phone: req.phone.as_deref(),
        avatar_url: req.avatar_url.as_deref(),
        address: req.address.as_deref(),
    };
    if !db::profiles::update(&state.pool, user_id, &patch, now).await? {
        return Err(AppError::new(ErrorCode::ProfileNotFound).into());
    }

    tracing::info!(user_id = %user_id, "Profile updated");
    get_profile(state, user_id).await
}

/// Translate the query string into a repository filter
pub fn profile_filter(state: &AppState, query: &UserListQuery) -> ServiceResult<ProfileFilter> {
    let tz = state.tz();
    let start = query
        .created_at_start
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| parse_date_field("created_at_start", s))
        .transpose()?;
    let end = query
        .created_at_end
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| parse_date_field("created_at_end", s))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(AppError::validation("created_at_start must not be after created_at_end")
            .with_field("created_at_start", "must not be after created_at_end")
            .into());
    }

    Ok(ProfileFilter {
        email: query
            .email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase),
        status: query.status,
        department_id: query.department_id,
        created_from: start.map(|d| day_start_millis(d, tz)),
        created_until: end.map(|d| day_end_millis(d, tz)),
    })
}

pub async fn list_users(
    state: &AppState,
    query: &UserListQuery,
) -> ServiceResult<(Vec<UserResponse>, Pagination)> {
    let window = query.page_query().window()?;
    let filter = profile_filter(state, query)?;
    let (rows, total) =
        db::profiles::list_views(&state.pool, &filter, window.limit, window.offset()).await?;
    Ok((
        rows.into_iter().map(UserResponse::from).collect(),
        window.pagination(total),
    ))
}

/// Place a non-admin user into a live department
pub async fn assign_department(
    state: &AppState,
    req: &AssignDepartmentRequest,
    now: i64,
) -> ServiceResult<UserResponse> {
    if db::users::find_by_id(&state.pool, req.user_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::UserNotFound).into());
    }
    if db::roles::find(&state.pool, req.user_id).await?.is_admin() {
        return Err(AppError::new(ErrorCode::AdminNotAssignable).into());
    }
    if !db::departments::exists(&state.pool, req.department_id).await? {
        return Err(AppError::new(ErrorCode::DepartmentNotFound).into());
    }
    if !db::profiles::set_department(&state.pool, req.user_id, Some(req.department_id), now)
        .await?
    {
        return Err(AppError::new(ErrorCode::ProfileNotFound).into());
    }

    tracing::info!(
        user_id = %req.user_id,
        department_id = %req.department_id,
        "Department assigned"
    );
    get_profile(state, req.user_id).await
}

/// Replace a user's role. Promotion to admin also clears the department.
pub async fn change_role(
    state: &AppState,
    user_id: Uuid,
    role: Role,
    now: i64,
) -> ServiceResult<UserResponse> {
    if db::users::find_by_id(&state.pool, user_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::UserNotFound).into());
    }

    let mut tx = state.pool.begin().await?;
    db::roles::upsert(&mut *tx, user_id, role, now).await?;
    if role.is_admin() {
        db::profiles::set_department(&mut *tx, user_id, None, now).await?;
    }
    tx.commit().await?;

    tracing::info!(user_id = %user_id, role = %role, "Role changed");
    get_profile(state, user_id).await
}
