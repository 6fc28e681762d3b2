pub mod resource_group;
pub mod resource_password_policy;
pub mod resource_role;

#[cfg(test)]
mod resource_role_test;

pub use resource_group::GroupResource;
pub use resource_password_policy::PasswordPolicyResource;
pub use resource_role::RoleResource;
