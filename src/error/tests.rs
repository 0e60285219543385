//! Unit tests for error handling

use super::*;
use std::io;

#[cfg(test)]
mod fpl_error_tests {
    use super::*;

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let fpl_error = FplError::from(json_error);

        match fpl_error {
            FplError::Json(_) => (),
            _ => panic!("Expected Json error variant"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let fpl_error = FplError::from(io_error);

        match fpl_error {
            FplError::Io(_) => (),
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_parse_int_error_conversion() {
        let parse_error = "not_a_number".parse::<u32>().unwrap_err();
        let fpl_error = FplError::from(parse_error);

        match fpl_error {
            FplError::InvalidId(_) => (),
            _ => panic!("Expected InvalidId error variant"),
        }
    }

    #[test]
    fn test_missing_email_mentions_email_and_env_var() {
        let error = FplError::MissingEmail {
            env_var: "FPL_EMAIL".to_string(),
        };

        let error_string = error.to_string();
        assert!(error_string.contains("Email not provided"));
        assert!(error_string.contains("FPL_EMAIL"));
    }

    #[test]
    fn test_missing_password_mentions_password_and_env_var() {
        let error = FplError::MissingPassword {
            env_var: "FPL_PASSWORD".to_string(),
        };

        let error_string = error.to_string();
        assert!(error_string.contains("Password not provided"));
        assert!(error_string.contains("FPL_PASSWORD"));
    }

    #[test]
    fn test_player_not_found_error() {
        let error = FplError::PlayerNotFound { id: 42 };
        assert_eq!(error.to_string(), "Player not found: 42");
    }

    #[test]
    fn test_login_rejected_error() {
        let error = FplError::LoginRejected {
            message: "state=fail".to_string(),
        };
        assert_eq!(error.to_string(), "Login rejected: state=fail");
    }

    #[test]
    fn test_unexpected_helper() {
        match FplError::unexpected("teams is not an array") {
            FplError::UnexpectedPayload { context } => {
                assert_eq!(context, "teams is not an array");
            }
            _ => panic!("Expected UnexpectedPayload error variant"),
        }
    }

    #[test]
    fn test_missing_index_key_error() {
        let error = FplError::MissingIndexKey {
            key: "id".to_string(),
        };
        assert_eq!(error.to_string(), "Record is missing index key 'id'");
    }

    #[test]
    fn test_error_source_chain() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let fpl_error = FplError::from(io_error);

        let error_trait: &dyn std::error::Error = &fpl_error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_debug_formatting() {
        let error = FplError::NotLoggedIn;
        assert_eq!(format!("{:?}", error), "NotLoggedIn");
    }

    #[test]
    fn test_result_type_alias_error() {
        fn test_function() -> Result<String> {
            Err(FplError::WorkerUnavailable)
        }

        match test_function().unwrap_err() {
            FplError::WorkerUnavailable => (),
            _ => panic!("Expected WorkerUnavailable error"),
        }
    }
}
