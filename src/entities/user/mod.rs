//! Accounts: registration, login and the session user

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod password;
pub mod service;

pub use descriptor::UserDescriptor;
pub use model::{LoginRequest, NewUser, RegisterRequest, User};
pub use service::AccountService;
