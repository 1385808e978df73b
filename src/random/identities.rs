//! Random identity generation.
//!
//! Builds coherent fake identities for request staging: the email matches
//! the name, the user name is the email, and so on. The structs serialize
//! with camelCase field names so a projected identity exposes the dotted
//! paths templates expect, e.g. `{{userInfo.firstName}}`.

use super::{
    generate_birth_date, generate_email, generate_first_name, generate_full_name,
    generate_last_name, generate_number_by_digits, generate_phone_number, generate_tin, one_of,
    JOB_TITLES,
};
use serde::{Deserialize, Serialize};

/// A coherent random person.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub birth_date: String,
    pub tin: u64,
    pub email: String,
    pub phone_number: String,
}

/// Account-shaped view of an identity; the user name is the email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub birth_date: String,
    pub tin: u64,
    pub email: String,
    pub user_name: String,
    pub phone_number: String,
}

/// Organization derived from an identity's last name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrgInfo {
    pub name: String,
    pub tin: u64,
    pub email: String,
    pub phone_number: String,
}

/// A bank account linked to a test subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub account_number: u64,
    pub account_title: String,
}

/// Generates a random identity with internally consistent fields.
pub fn generate_identity() -> Identity {
    let first_name = generate_first_name();
    let last_name = generate_last_name();
    Identity {
        full_name: generate_full_name(Some(&first_name), Some(&last_name)),
        birth_date: generate_birth_date(),
        tin: generate_tin(),
        email: generate_email(Some(&first_name), Some(&last_name)),
        phone_number: generate_phone_number(),
        first_name,
        last_name,
    }
}

/// Generates random user account information.
pub fn generate_user_info() -> UserInfo {
    let identity = generate_identity();
    UserInfo {
        first_name: identity.first_name,
        last_name: identity.last_name,
        full_name: identity.full_name,
        birth_date: identity.birth_date,
        tin: identity.tin,
        user_name: identity.email.clone(),
        email: identity.email,
        phone_number: identity.phone_number,
    }
}

/// Generates random organization information.
pub fn generate_org_info() -> OrgInfo {
    let identity = generate_identity();
    OrgInfo {
        name: format!("{} Inc", identity.last_name),
        tin: identity.tin,
        email: identity.email,
        phone_number: identity.phone_number,
    }
}

/// Generates a random linked bank account.
pub fn generate_linked_account() -> LinkedAccount {
    let title = one_of(JOB_TITLES).copied().unwrap_or("General");
    LinkedAccount {
        account_number: generate_number_by_digits(9),
        account_title: format!("{} Services", title),
    }
}
