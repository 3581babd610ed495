//! GitHub API service implementations.

mod actions;
mod enterprise;
mod issues;
mod organizations;
mod pull_requests;
mod repositories;
mod secret_scanning;
mod users;

pub use actions::*;
pub use enterprise::*;
pub use issues::*;
pub use organizations::*;
pub use pull_requests::*;
pub use repositories::*;
pub use secret_scanning::*;
pub use users::*;
