// ABOUTME: Pure format checks for user-supplied credentials.
// ABOUTME: No I/O; rejected input is reported as false, never as an error.

/// Minimum number of characters a password must have.
pub const MIN_PASSWORD_LEN: usize = 6;

const EMAIL_DOMAIN: &str = "@gmail.com";

/// Check that an email address has a non-empty local part followed by the
/// one accepted domain suffix. The local part may not contain `@`.
pub fn is_valid_email(email: &str) -> bool {
    match email.strip_suffix(EMAIL_DOMAIN) {
        Some(local) => !local.is_empty() && !local.contains('@'),
        None => false,
    }
}

/// Check that a password meets the minimum length.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_plain_gmail_address() {
        assert!(is_valid_email("amy@gmail.com"));
        assert!(is_valid_email("a.b-c_1@gmail.com"));
    }

    #[test]
    fn email_rejects_other_domains() {
        assert!(!is_valid_email("amy@hotmail.com"));
        assert!(!is_valid_email("amy@gmail.com.org"));
        assert!(!is_valid_email("amy"));
    }

    #[test]
    fn email_rejects_empty_or_at_sign_local_part() {
        assert!(!is_valid_email("@gmail.com"));
        assert!(!is_valid_email("a@b@gmail.com"));
    }

    #[test]
    fn password_length_boundary() {
        assert!(!is_valid_password("12345"));
        assert!(is_valid_password("123456"));
        assert!(is_valid_password("a much longer password"));
    }
}
