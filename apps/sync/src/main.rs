//! Smart Sprint headless board synchronizer.

#![forbid(unsafe_code)]

mod config;

use std::sync::Arc;
use std::time::Duration;

use smart_sprint_application::{
    AuthorizationGate, BoardSynchronizer, LoginOutcome, PermissionAdminService, RouteAccess,
    SessionService,
};
use smart_sprint_core::{AppError, AppResult};
use smart_sprint_domain::{Board, Capability, Identity};
use smart_sprint_infrastructure::{FileCredentialStore, HttpBackendClient, StaticAccountDirectory};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::SyncConfig;

const BOARD_ROUTE: &str = "/tasks";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = SyncConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let backend = Arc::new(HttpBackendClient::new(
        http_client,
        config.api_base_url.as_str(),
    )?);
    let session = Arc::new(SessionService::new(
        backend.clone(),
        Arc::new(FileCredentialStore::new(config.credential_path.clone())),
        Arc::new(StaticAccountDirectory::new()),
    ));

    info!(
        api_base_url = %config.api_base_url,
        credential_path = %config.credential_path.display(),
        project_id = ?config.project_id,
        "smart-sprint-sync started"
    );

    let identity = establish_session(&session, &config).await?;

    match AuthorizationGate::new(session.clone())
        .check_route(BOARD_ROUTE)
        .await
    {
        RouteAccess::Granted => {}
        RouteAccess::Unauthenticated => {
            return Err(AppError::Unauthorized("no active session".to_owned()));
        }
        RouteAccess::Denied(denial) => {
            warn!(route = %denial.route(), role = %denial.role(), "board access denied");
            return Err(AppError::Forbidden(denial.message()));
        }
    }

    let synchronizer = BoardSynchronizer::new(backend.clone(), backend.clone(), config.project_id);
    synchronizer.load().await?;
    log_board_summary(&synchronizer.snapshot().await, &identity);

    if session.has_permission(Capability::ManagePermissions).await {
        let admin = PermissionAdminService::new(backend, session.clone());
        match admin.list_roles().await {
            Ok(roles) => info!(roles = roles.len(), "role catalogue available"),
            Err(error) => warn!(error = %error, "failed to list roles"),
        }
    }

    Ok(())
}

async fn establish_session(session: &SessionService, config: &SyncConfig) -> AppResult<Identity> {
    if let Some(identity) = session.restore().await {
        return Ok(identity);
    }

    let Some(login) = &config.login else {
        return Err(AppError::Unauthorized(
            "no stored session; set SMART_SPRINT_LOGIN_EMAIL and SMART_SPRINT_LOGIN_PASSWORD"
                .to_owned(),
        ));
    };

    match session
        .login(login.email.as_str(), login.password.as_str())
        .await
    {
        LoginOutcome::Authenticated(identity) => Ok(identity),
        LoginOutcome::Failed { reason } => Err(AppError::Unauthorized(reason)),
    }
}

fn log_board_summary(board: &Board, identity: &Identity) {
    for column in board.columns() {
        let visible = column
            .task_keys()
            .iter()
            .filter_map(|key| board.task(key))
            .filter(|task| identity.can_see_task_type(task.task_type.as_str()))
            .count();
        info!(
            column = %column.title(),
            tasks = column.task_keys().len(),
            visible,
            "board column"
        );
    }

    info!(
        subject = %identity.id(),
        role = %identity.role(),
        tasks = board.len(),
        users = board.users().len(),
        "board synchronized"
    );
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
