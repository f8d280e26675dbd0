//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_gate;
mod board_ports;
mod board_sync_service;
mod permission_admin_service;
mod session_ports;
mod session_service;

pub use authorization_gate::{AuthorizationGate, RouteAccess};
pub use board_ports::{
    TASK_FETCH_LIMIT, TaskGateway, TaskQuery, TaskUpdate, USER_FETCH_LIMIT, UserGateway, UserQuery,
};
pub use board_sync_service::{BoardSynchronizer, MoveOutcome};
pub use permission_admin_service::{
    PermissionAdminService, PermissionDefinition, RoleDefinition, RoleGateway, RolePermissions,
};
pub use session_ports::{CredentialStore, LocalAccountDirectory};
pub use session_service::{LoginOutcome, SessionService, SessionState};
