//! Shared test fixtures

use crate::domain::entity::user::User;
use crate::domain::value_object::{
    email::Email, user_role::UserRole, user_status::UserStatus,
};

pub fn parent(id: i64, username: &str, email: &str) -> User {
    User {
        id,
        username: Some(username.to_string()),
        email: Some(Email::from_backend(email)),
        full_name: format!("Parent {id}"),
        phone: None,
        role: UserRole::Parent,
        status: UserStatus::Active,
        is_active: true,
        academy_id: Some(1),
    }
}

pub fn coach(id: i64, status: UserStatus, is_active: bool) -> User {
    User {
        id,
        username: Some(format!("coach{id}")),
        email: Some(Email::from_backend(format!("coach{id}@academy.example"))),
        full_name: format!("Coach {id}"),
        phone: None,
        role: UserRole::Coach,
        status,
        is_active,
        academy_id: Some(1),
    }
}

pub fn admin(id: i64, status: UserStatus) -> User {
    User {
        id,
        username: Some(format!("admin{id}")),
        email: Some(Email::from_backend(format!("admin{id}@academy.example"))),
        full_name: format!("Admin {id}"),
        phone: None,
        role: UserRole::Admin,
        status,
        is_active: true,
        academy_id: Some(1),
    }
}
