use crate::application_impl::password_problems;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use std::sync::Arc;

const MAX_USERNAME_LEN: usize = 150;
const USERNAME_TAKEN: &str = "A user with that username already exists.";
const UNKNOWN_TEAM: &str = "Team does not exist.";

pub struct RealAccountService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
}

impl RealAccountService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            credential_hasher,
            clock,
        }
    }

    fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
        errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    async fn validate(&self, request: &RegisterInput) -> Result<FieldErrors, AuthError> {
        let mut errors = FieldErrors::new();

        let username = request.username.as_str();
        if username.is_empty() {
            Self::push(&mut errors, "username", "This field may not be blank.");
        } else if username.chars().count() > MAX_USERNAME_LEN {
            Self::push(
                &mut errors,
                "username",
                format!("Ensure this field has no more than {MAX_USERNAME_LEN} characters."),
            );
        } else if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@.+-_".contains(c))
        {
            Self::push(
                &mut errors,
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        } else if self.user_repo.username_exists(username).await? {
            Self::push(&mut errors, "username", USERNAME_TAKEN);
        }

        if request.email.is_empty() {
            Self::push(&mut errors, "email", "This field may not be blank.");
        } else if !is_plausible_email(&request.email) {
            Self::push(&mut errors, "email", "Enter a valid email address.");
        }

        for problem in password_problems(&request.password, username) {
            Self::push(&mut errors, "password", problem);
        }

        if let Some(team) = request.team {
            if !self.user_repo.team_exists(team).await? {
                Self::push(&mut errors, "team", UNKNOWN_TEAM);
            }
        }

        Ok(errors)
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[async_trait::async_trait]
impl AccountService for RealAccountService {
    async fn register(&self, request: RegisterInput) -> Result<UserProfile, AuthError> {
        let errors = self.validate(&request).await?;
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let password_hash = self
            .credential_hasher
            .hash_password(&request.password)
            .await?;
        let record = UserRecord {
            user_id: UserId::new(),
            username: request.username,
            email: request.email,
            password_hash,
            team: request.team,
            is_active: true,
            created_at: self.clock.now(),
        };

        // Uniqueness and the team reference are re-checked by the store.
        match self.user_repo.create(record.clone()).await {
            Ok(()) => {}
            Err(CreateUserError::UsernameTaken) => {
                let mut errors = FieldErrors::new();
                Self::push(&mut errors, "username", USERNAME_TAKEN);
                return Err(AuthError::Validation(errors));
            }
            Err(CreateUserError::UnknownTeam) => {
                let mut errors = FieldErrors::new();
                Self::push(&mut errors, "team", UNKNOWN_TEAM);
                return Err(AuthError::Validation(errors));
            }
            Err(CreateUserError::Auth(e)) => return Err(e),
        }

        info!(user_id = %record.user_id, username = %record.username, "user registered");
        Ok(record.profile())
    }

    async fn profile(&self, user_id: UserId) -> Result<UserProfile, AuthError> {
        let rec = self
            .user_repo
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::SubjectNotFound)?;
        Ok(rec.profile())
    }
}
