//! Account domain module
//!
//! Sign-in and sign-up forms, their local validation, and the business
//! outcomes (`already_exists`, unsuccessful login) reported as data.

mod entity;
mod validation;

pub use entity::{
    AccountForm, AccountIntent, AccountOutcome, AuthFlags, CreateAccountResponse, Credentials,
    LoginOutcome, LoginResponse,
};
pub use validation::{
    validate_email, validate_password, validate_password_confirmation, AccountValidationError,
};
