//! CSS selectors and element ids the pipeline depends on.

/// Username (email) input of the login popup.
pub const LOGIN_USERNAME: &str = r#"input[name="login"]"#;
/// Password input of the login popup.
pub const LOGIN_PASSWORD: &str = r#"input[name="password"]"#;
/// Submit button of the login popup.
pub const LOGIN_SUBMIT: &str = r#"button[type="submit"]"#;

/// Id of the library list container.
pub const LIBRARY_CONTAINER_ID: &str = "libraryItems";
/// One rendered entry of the library list.
pub const LIBRARY_ENTRY: &str = "#libraryItems li";

/// Class names the login popup uses to flag rejected credentials.
pub const LOGIN_ERROR_CLASSES: &[&str] = &["alert-danger", "login-error", "is-invalid"];
