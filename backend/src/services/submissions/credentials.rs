//! Login credentials issued when a submission is approved.
//!
//! The username is the admission number. The initial password is the first four
//! letters of the student's name (upper-cased, padded with `X`) followed by the last
//! four digits of the mobile number. Only the Argon2 hash is stored.

use crate::db::now;
use crate::error::{ApiError, ApiResult};
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use rusqlite::{params, Connection};

const NAME_PART: usize = 4;
const MOBILE_PART: usize = 4;

pub fn derive_password(student_name: &str, mobile: &str) -> String {
    let mut name: String = student_name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(NAME_PART)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    while name.len() < NAME_PART {
        name.push('X');
    }

    let digits: Vec<char> = mobile.chars().filter(char::is_ascii_digit).collect();
    let tail: String = digits[digits.len().saturating_sub(MOBILE_PART)..].iter().collect();
    format!("{name}{tail}")
}

pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub fn insert_credentials(conn: &Connection, student_id: i64, username: &str, password_hash: &str) -> ApiResult<()> {
    conn.execute(
        "INSERT INTO student_credentials (student_id, username, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![student_id, username, password_hash, now()],
    )?;
    Ok(())
}
