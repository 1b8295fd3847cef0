//! REST API server for the patient–dietitian coordination system.
//!
//! ## Purpose
//! Exposes account registration, assignment, clinical profile intake,
//! dietitian reminders and diet chart operations over HTTP, with
//! OpenAPI/Swagger documentation.
//!
//! ## Intended use
//! Identity issuance is external; requests carry the issued handle in the
//! `x-user-id` header and each handler resolves it against the account store
//! before touching core services.

use axum::{
    extract::{Path as AxumPath, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use aahara_core::{
    is_complete, missing_fields, shared_store, AccountService, AssignOutcome, AssignmentService,
    AuthContext, CoordinationError, CoreConfig, DietitianCard, FileDocumentStore, FileTodoMedium,
    Identity, NonEmptyText, PlanService, ProfileStore, TodoStore, TodoSynthesizer,
};
use aahara_types::EmailAddress;
use api_shared::{resolve_identity, HealthRes, HealthService, USER_ID_HEADER};
use dietgen::{DietGenClient, GenerationStatus};
use records::{
    ClinicalProfile, DietPlan, Priority, ProfileUpdate, Role, TodoRecord, TodoUpdate, UserAccount,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Application state shared across REST API handlers.
///
/// Every service is constructed once at startup around the shared
/// file-backed document store; handlers never read the environment.
#[derive(Clone)]
struct AppState {
    cfg: Arc<CoreConfig>,
    store: Arc<FileDocumentStore>,
    accounts: Arc<AccountService>,
    assignments: Arc<AssignmentService>,
    plans: Arc<PlanService>,
    dietgen: DietGenClient,
}

// ============================================================================
// Request/response bodies
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
struct RegisterAccountReq {
    /// Externally-issued identity handle.
    id: String,
    name: String,
    email: String,
    /// `admin`, `dietitian` or `patient`.
    role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
struct AssignReq {
    #[serde(rename = "patientId")]
    patient_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
struct AssignRes {
    /// `linked` for a fresh link, `already_linked` for an idempotent repeat.
    outcome: String,
}

#[derive(Debug, Deserialize, ToSchema)]
struct CreateTodoReq {
    title: String,
    #[serde(default)]
    description: String,
    /// `low`, `medium` or `high`; defaults to `medium`.
    priority: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
struct SuccessRes {
    success: bool,
}

#[derive(Debug, Serialize, ToSchema)]
struct ErrorRes {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorRes>);

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        register_account,
        fetch_account,
        dietitian_card,
        list_patients,
        roster,
        assign_patient,
        read_profile,
        update_profile,
        list_todos,
        create_todo,
        update_todo,
        delete_todo,
        synthesize_todos,
        generate_plan,
        latest_plan,
        publish_plan,
    ),
    components(schemas(
        HealthRes,
        RegisterAccountReq,
        AssignReq,
        AssignRes,
        CreateTodoReq,
        SuccessRes,
        ErrorRes,
    ))
)]
struct ApiDoc;

/// Main entry point for the Aahara coordination server
///
/// Starts the REST server on the configured address (default: 0.0.0.0:3000).
///
/// # Environment Variables
/// - `AAHARA_ADDR`: server address (default: "0.0.0.0:3000")
/// - `AAHARA_DATA_DIR`: document storage directory (default: "aahara_data")
/// - `DIETGEN_ENDPOINT`: diet-generation service URL
///   (default: "http://127.0.0.1:8001/generate")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the data directory cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aahara=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("AAHARA_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = std::env::var("AAHARA_DATA_DIR")
        .unwrap_or_else(|_| aahara_core::constants::DEFAULT_DATA_DIR.into());
    let dietgen_endpoint = std::env::var("DIETGEN_ENDPOINT")
        .unwrap_or_else(|_| "http://127.0.0.1:8001/generate".into());

    std::fs::create_dir_all(&data_dir)?;

    let cfg = Arc::new(CoreConfig::new(data_dir.into(), dietgen_endpoint)?);
    let store = shared_store(&cfg);

    tracing::info!("++ Starting Aahara REST on {}", addr);

    let state = AppState {
        cfg: cfg.clone(),
        store: store.clone(),
        accounts: Arc::new(AccountService::new(store.clone())),
        assignments: Arc::new(AssignmentService::new(store.clone(), store.clone())),
        plans: Arc::new(PlanService::new(store.clone())),
        dietgen: DietGenClient::new(cfg.dietgen_endpoint()),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/accounts", post(register_account))
        .route("/accounts/:id", get(fetch_account))
        .route("/dietitians/:id/card", get(dietitian_card))
        .route("/patients", get(list_patients))
        .route("/dietitians/me/patients", get(roster))
        .route("/dietitians/me/assignments", post(assign_patient))
        .route("/patients/:id/profile", get(read_profile))
        .route("/patients/:id/profile", put(update_profile))
        .route("/dietitians/me/todos", get(list_todos))
        .route("/dietitians/me/todos", post(create_todo))
        .route("/dietitians/me/todos/synthesize", post(synthesize_todos))
        .route("/dietitians/me/todos/:id", patch(update_todo))
        .route("/dietitians/me/todos/:id", delete(delete_todo))
        .route("/patients/:id/diet-plans", post(generate_plan))
        .route("/patients/:id/diet-plans/latest", get(latest_plan))
        .route("/patients/:id/diet-plans/publish", post(publish_plan))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Boundary helpers
// ============================================================================

/// Maps a core error onto a status code and JSON body.
///
/// Policy violations are `409`, missing accounts `404`, role gates `403`,
/// bad input `400`; storage and serialisation failures stay internal.
fn core_error(e: CoordinationError) -> ApiError {
    let status = match &e {
        CoordinationError::AlreadyAssignedElsewhere { .. } => StatusCode::CONFLICT,
        CoordinationError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        CoordinationError::RoleMismatch { .. } => StatusCode::FORBIDDEN,
        CoordinationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => {
            tracing::error!("Internal error: {e:?}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes {
                    error: "Internal error".into(),
                }),
            );
        }
    };
    (status, Json(ErrorRes { error: e.to_string() }))
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorRes {
            error: message.into(),
        }),
    )
}

fn not_found(message: impl Into<String>) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorRes {
            error: message.into(),
        }),
    )
}

/// Resolves the `x-user-id` header into an authenticated context.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, ApiError> {
    let header = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    resolve_identity(header, &state.accounts).map_err(core_error)
}

fn parse_identity(raw: &str) -> Result<Identity, ApiError> {
    Identity::parse(raw).map_err(|e| bad_request(format!("bad identity: {e}")))
}

/// The calling dietitian's todo collection.
fn todo_store(state: &AppState, ctx: &AuthContext) -> Result<TodoStore, ApiError> {
    let medium = FileTodoMedium::for_dietitian(&state.cfg, &ctx.user_id).map_err(core_error)?;
    Ok(TodoStore::new(Arc::new(medium)))
}

// ============================================================================
// Handlers
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/accounts",
    request_body = RegisterAccountReq,
    responses(
        (status = 200, description = "Account registered (or already present)"),
        (status = 400, description = "Bad request", body = ErrorRes)
    )
)]
/// Register an account for an externally-issued identity
///
/// Idempotent: re-registering an existing id returns the stored account
/// unchanged.
///
/// # Returns
/// * `Json<UserAccount>` - the stored account document
#[axum::debug_handler]
async fn register_account(
    State(state): State<AppState>,
    Json(req): Json<RegisterAccountReq>,
) -> Result<Json<UserAccount>, ApiError> {
    let id = parse_identity(&req.id)?;
    let name = NonEmptyText::new(&req.name).map_err(|e| bad_request(format!("bad name: {e}")))?;
    let email =
        EmailAddress::parse(&req.email).map_err(|e| bad_request(format!("bad email: {e}")))?;
    let role = Role::from_str(&req.role).map_err(|e| bad_request(e.to_string()))?;

    let account = state
        .accounts
        .register(id, name, email, role)
        .map_err(core_error)?;
    Ok(Json(account))
}

#[utoipa::path(
    get,
    path = "/accounts/{id}",
    responses(
        (status = 200, description = "Account document"),
        (status = 403, description = "Not your account", body = ErrorRes),
        (status = 404, description = "Unknown account", body = ErrorRes)
    )
)]
/// Fetch an account document
///
/// Callers may read their own account; admins may read any.
#[axum::debug_handler]
async fn fetch_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<UserAccount>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    let id = parse_identity(&id)?;
    if ctx.user_id != id && ctx.role != Role::Admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorRes {
                error: "accounts are only readable by their owner".into(),
            }),
        ));
    }
    let account = state.accounts.fetch(&id).map_err(core_error)?;
    Ok(Json(account))
}

#[utoipa::path(
    get,
    path = "/dietitians/{id}/card",
    responses(
        (status = 200, description = "Public dietitian card"),
        (status = 404, description = "No dietitian with this id", body = ErrorRes)
    )
)]
/// Public dietitian card shown to patients before assignment.
#[axum::debug_handler]
async fn dietitian_card(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<DietitianCard>, ApiError> {
    let id = parse_identity(&id)?;
    state
        .accounts
        .dietitian_card(&id)
        .map_err(core_error)?
        .map(Json)
        .ok_or_else(|| not_found(format!("no dietitian with id {id}")))
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All patient accounts"),
        (status = 403, description = "Caller is a patient", body = ErrorRes)
    )
)]
/// List all patient accounts (dietitian/admin browse view).
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserAccount>>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    let patients = state.accounts.list_patients(&ctx).map_err(core_error)?;
    Ok(Json(patients))
}

#[utoipa::path(
    get,
    path = "/dietitians/me/patients",
    responses(
        (status = 200, description = "The calling dietitian's linked patients"),
        (status = 403, description = "Caller is not a dietitian", body = ErrorRes)
    )
)]
/// The calling dietitian's roster, resolved to account documents.
#[axum::debug_handler]
async fn roster(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserAccount>>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    let patients = state.assignments.roster(&ctx).map_err(core_error)?;
    Ok(Json(patients))
}

#[utoipa::path(
    post,
    path = "/dietitians/me/assignments",
    request_body = AssignReq,
    responses(
        (status = 200, description = "Patient linked", body = AssignRes),
        (status = 404, description = "Unknown patient", body = ErrorRes),
        (status = 409, description = "Patient already assigned elsewhere", body = ErrorRes)
    )
)]
/// Assign a patient to the calling dietitian
///
/// Exclusivity is enforced: a patient holds at most one dietitian. Repeating
/// an assignment the caller already holds reports `already_linked`.
///
/// # Errors
/// Returns `409 Conflict` when another dietitian already holds the patient.
#[axum::debug_handler]
async fn assign_patient(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AssignReq>,
) -> Result<Json<AssignRes>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    let patient_id = parse_identity(&req.patient_id)?;

    let outcome = state
        .assignments
        .assign(&ctx, &patient_id)
        .map_err(core_error)?;
    Ok(Json(AssignRes {
        outcome: match outcome {
            AssignOutcome::Linked => "linked".into(),
            AssignOutcome::AlreadyLinked => "already_linked".into(),
        },
    }))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/profile",
    responses(
        (status = 200, description = "Clinical profile document"),
        (status = 403, description = "Not readable by the caller", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Read a patient's clinical profile
///
/// A profile missing after an interrupted assignment is created on the fly
/// with all clinical fields null.
#[axum::debug_handler]
async fn read_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ClinicalProfile>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    let patient_id = parse_identity(&id)?;
    if ctx.role == Role::Patient && ctx.user_id != patient_id {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorRes {
                error: "patients may only read their own profile".into(),
            }),
        ));
    }

    let profile = state
        .assignments
        .ensure_profile(&patient_id)
        .map_err(core_error)?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/patients/{id}/profile",
    responses(
        (status = 200, description = "Updated clinical profile"),
        (status = 403, description = "Caller is not a dietitian", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Apply a partial intake update to a patient's profile
///
/// Only fields present in the body change; `updatedAt` is touched.
#[axum::debug_handler]
async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ClinicalProfile>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    ctx.require_role(Role::Dietitian).map_err(core_error)?;
    let patient_id = parse_identity(&id)?;

    let mut profile = state
        .assignments
        .ensure_profile(&patient_id)
        .map_err(core_error)?;
    update.apply(&mut profile, chrono::Utc::now());
    state
        .store
        .save(&patient_id, &profile)
        .map_err(core_error)?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/dietitians/me/todos",
    responses(
        (status = 200, description = "The calling dietitian's todo records"),
        (status = 403, description = "Caller is not a dietitian", body = ErrorRes)
    )
)]
/// The calling dietitian's full todo collection.
#[axum::debug_handler]
async fn list_todos(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TodoRecord>>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    ctx.require_role(Role::Dietitian).map_err(core_error)?;
    let todos = todo_store(&state, &ctx)?.load();
    Ok(Json(todos))
}

#[utoipa::path(
    post,
    path = "/dietitians/me/todos",
    request_body = CreateTodoReq,
    responses(
        (status = 200, description = "Created todo record"),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 403, description = "Caller is not a dietitian", body = ErrorRes)
    )
)]
/// Create a user-authored todo record with a random id.
#[axum::debug_handler]
async fn create_todo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTodoReq>,
) -> Result<Json<TodoRecord>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    ctx.require_role(Role::Dietitian).map_err(core_error)?;

    let title = NonEmptyText::new(&req.title).map_err(|e| bad_request(format!("bad title: {e}")))?;
    let priority = match req.priority.as_deref() {
        Some(raw) => Priority::from_str(raw).map_err(|e| bad_request(e.to_string()))?,
        None => Priority::Medium,
    };

    let record = TodoRecord::user_created(title, req.description, priority, chrono::Utc::now());
    todo_store(&state, &ctx)?
        .add(record.clone())
        .map_err(core_error)?;
    Ok(Json(record))
}

#[utoipa::path(
    patch,
    path = "/dietitians/me/todos/{id}",
    responses(
        (status = 200, description = "Todo updated", body = SuccessRes),
        (status = 404, description = "No todo with this id", body = ErrorRes)
    )
)]
/// Apply a partial update (title, description, priority, completion) to a todo.
#[axum::debug_handler]
async fn update_todo(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
    Json(update): Json<TodoUpdate>,
) -> Result<Json<SuccessRes>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    ctx.require_role(Role::Dietitian).map_err(core_error)?;

    let touched = todo_store(&state, &ctx)?
        .update(&id, update)
        .map_err(core_error)?;
    if !touched {
        return Err(not_found(format!("no todo with id {id}")));
    }
    Ok(Json(SuccessRes { success: true }))
}

#[utoipa::path(
    delete,
    path = "/dietitians/me/todos/{id}",
    responses(
        (status = 200, description = "Todo deleted", body = SuccessRes),
        (status = 404, description = "No todo with this id", body = ErrorRes)
    )
)]
/// Delete a todo record by id.
#[axum::debug_handler]
async fn delete_todo(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<SuccessRes>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    ctx.require_role(Role::Dietitian).map_err(core_error)?;

    let removed = todo_store(&state, &ctx)?.remove(&id).map_err(core_error)?;
    if !removed {
        return Err(not_found(format!("no todo with id {id}")));
    }
    Ok(Json(SuccessRes { success: true }))
}

#[utoipa::path(
    post,
    path = "/dietitians/me/todos/synthesize",
    responses(
        (status = 200, description = "Merged todo collection after synthesis"),
        (status = 403, description = "Caller is not a dietitian", body = ErrorRes)
    )
)]
/// Re-derive system-generated reminders from the roster
///
/// Idempotent; see the synthesizer for the merge rules.
#[axum::debug_handler]
async fn synthesize_todos(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TodoRecord>>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    ctx.require_role(Role::Dietitian).map_err(core_error)?;

    let snapshots = state
        .assignments
        .roster_snapshots(&ctx)
        .map_err(core_error)?;
    let synthesizer = TodoSynthesizer::new(todo_store(&state, &ctx)?);
    let todos = synthesizer.synthesize(&snapshots).map_err(core_error)?;
    Ok(Json(todos))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/diet-plans",
    responses(
        (status = 200, description = "Generated plan stored, unpublished"),
        (status = 409, description = "Profile incomplete", body = ErrorRes),
        (status = 502, description = "Generation service failed", body = ErrorRes)
    )
)]
/// Request diet chart generation for a patient
///
/// Gated on profile completeness: generation is refused while any required
/// intake field is still null. On success the chart is stored unpublished.
///
/// # Errors
/// Returns `409 Conflict` naming the missing fields, or `502 Bad Gateway`
/// when the generation service is unreachable or reports failure.
#[axum::debug_handler]
async fn generate_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<DietPlan>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    ctx.require_role(Role::Dietitian).map_err(core_error)?;
    let patient_id = parse_identity(&id)?;

    let profile = state
        .assignments
        .ensure_profile(&patient_id)
        .map_err(core_error)?;
    if !is_complete(Some(&profile)) {
        let missing = missing_fields(Some(&profile)).join(", ");
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorRes {
                error: format!("profile incomplete, missing: {missing}"),
            }),
        ));
    }

    let status = state
        .dietgen
        .request_generation(patient_id.as_str())
        .await
        .map_err(|e| {
            tracing::error!("Generation request error: {e:?}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorRes {
                    error: "diet generation service unreachable".into(),
                }),
            )
        })?;

    match status {
        GenerationStatus::Succeeded(chart) => {
            let plan = state
                .plans
                .store_generated(patient_id, chart)
                .map_err(core_error)?;
            Ok(Json(plan))
        }
        GenerationStatus::Failed(status) => Err((
            StatusCode::BAD_GATEWAY,
            Json(ErrorRes {
                error: format!("diet generation failed with status {status:?}"),
            }),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/patients/{id}/diet-plans/latest",
    responses(
        (status = 200, description = "Newest plan visible to the caller"),
        (status = 404, description = "No visible plan", body = ErrorRes)
    )
)]
/// Newest diet plan for a patient
///
/// Dietitians and admins see unpublished plans; a patient sees only their
/// own newest published plan.
#[axum::debug_handler]
async fn latest_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<DietPlan>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    let patient_id = parse_identity(&id)?;

    state
        .plans
        .latest(&ctx, &patient_id)
        .map_err(core_error)?
        .map(Json)
        .ok_or_else(|| not_found(format!("no visible plan for patient {patient_id}")))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/diet-plans/publish",
    responses(
        (status = 200, description = "Newest plan published", body = SuccessRes),
        (status = 403, description = "Caller is not a dietitian", body = ErrorRes),
        (status = 404, description = "Patient has no plans", body = ErrorRes)
    )
)]
/// Publish the newest plan, making it visible to the patient.
#[axum::debug_handler]
async fn publish_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<SuccessRes>, ApiError> {
    let ctx = authenticate(&state, &headers)?;
    let patient_id = parse_identity(&id)?;

    let published = state
        .plans
        .publish(&ctx, &patient_id)
        .map_err(core_error)?;
    if !published {
        return Err(not_found(format!("patient {patient_id} has no plans")));
    }
    Ok(Json(SuccessRes { success: true }))
}
