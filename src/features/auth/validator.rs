use super::model::AuthenticatedUser;
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Verifies HS256 access tokens signed with the shared secret
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway.as_secs();
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Rejected access token: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            })?;

        let claims = token_data.claims;
        if claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized(
                "Token has no subject".to_string(),
            ));
        }

        Ok(AuthenticatedUser {
            subject: claims.sub,
            email: claims.email.filter(|e| !e.trim().is_empty()),
            name: claims.name.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{issue_token, TEST_JWT_SECRET};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::Duration;

    fn validator() -> JwtValidator {
        JwtValidator::new(&AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_leeway: Duration::from_secs(0),
        })
    }

    #[test]
    fn test_valid_token_yields_user() {
        let token = issue_token("user-123", 3600);
        let user = validator().validate_token(&token).unwrap();
        assert_eq!(user.subject, "user-123");
        assert_eq!(user.email.as_deref(), Some("user-123@example.com"));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token("user-123", -3600);
        assert!(matches!(
            validator().validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let claims = Claims {
            sub: "user-123".to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as u64,
            email: None,
            name: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"someone-elses-secret"),
        )
        .unwrap();
        assert!(validator().validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_and_blank_subject_are_rejected() {
        assert!(validator().validate_token("not.a.jwt").is_err());

        let blank = issue_token("  ", 3600);
        assert!(matches!(
            validator().validate_token(&blank),
            Err(AppError::Unauthorized(_))
        ));
    }
}
