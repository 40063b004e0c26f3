//! Redaction of identifiers before they reach the logs

/// Keep the first character of the local part and the domain
///
/// `john.doe@example.com` becomes `j***@example.com`; input without an `@`
/// is fully masked.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}
