//! Domain model for roles, capabilities, identities and the task board.

#![forbid(unsafe_code)]

mod board;
mod identity;
mod permission;
mod role;
mod route;
mod task;
mod task_type;

pub use board::{
    Board, BoardColumn, BoardColumnId, BoardTask, BoardUser, priority_label, task_key, user_key,
};
pub use identity::{Identity, IdentityInput, can_see_task_type, has_permission};
pub use permission::{
    CAPABILITY_COUNT, Capability, CapabilityGroup, PermissionSet, permissions_for,
    permissions_for_key,
};
pub use role::Role;
pub use route::{AccessDenial, can_access_route, required_capabilities};
pub use task::{TaskAssignee, TaskRecord, UserProfile, initials};
pub use task_type::TaskTypeTag;
