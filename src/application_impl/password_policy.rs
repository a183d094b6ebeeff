//! Password strength rules applied at registration.

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";
const MIN_LENGTH: usize = 8;

/// Returns every rule the password breaks, in a fixed order.
pub fn password_problems(password: &str, username: &str) -> Vec<String> {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {MIN_LENGTH} characters."
        ));
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("Password must contain at least one uppercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("Password must contain at least one lowercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("Password must contain at least one number.".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        problems.push("Password must contain at least one special character.".to_string());
    }
    if !username.is_empty() && password.to_lowercase().contains(&username.to_lowercase()) {
        problems.push("Password cannot contain your username.".to_string());
    }

    problems
}
