//! Server-side re-validation backing the registration, password and
//! profile forms. The client validates too, but every handler runs
//! these again before touching the backend.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username regex"));

/// Letters (including accented) and spaces only, for display names and
/// the free-text interest
static LETTERS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-zÀ-ÿ\s]+$").expect("letters regex"));

/// Domains of well-known throwaway-email providers. Availability checks
/// reject these outright.
pub const DISPOSABLE_EMAIL_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "guerrillamail.com",
    "mailinator.com",
    "tempmail.org",
    "throwaway.email",
    "yopmail.com",
    "getnada.com",
    "tempmail.net",
    "trashmail.com",
];

const PASSWORD_SPECIALS: &[char] = &['#', '*', '_', '/', '-', '.', '%', '?'];

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// True when the email's domain belongs to a throwaway provider
pub fn is_disposable_email(email: &str) -> bool {
    let Some(domain) = email.split('@').nth(1) else {
        return false;
    };
    let domain = domain.to_lowercase();
    DISPOSABLE_EMAIL_DOMAINS.iter().any(|d| domain.contains(d))
}

/// Usernames: 3 to 20 characters, letters, digits and underscores
pub fn is_valid_username(username: &str) -> bool {
    (3..=20).contains(&username.len()) && USERNAME_RE.is_match(username)
}

/// Passwords: at least 8 characters with lowercase, uppercase, a digit
/// and one of `# * _ / - . % ?`, drawn only from those classes
pub fn is_valid_password(password: &str) -> bool {
    if password.len() < 8 {
        return false;
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(&c);
    if !password.chars().all(allowed) {
        return false;
    }
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(&c))
}

/// Display names and the "Otros" free-text interest: letters and spaces
pub fn is_letters_only(value: &str) -> bool {
    LETTERS_RE.is_match(value)
}

pub fn is_valid_age(edad: i32) -> bool {
    (1..=120).contains(&edad)
}

pub const MAX_BIOGRAFIA_LEN: usize = 500;
pub const MAX_INTERES_OTRO_LEN: usize = 40;

/// Fixed interest catalog offered by the completion form
pub const INTERESES_CATALOGO: &[&str] =
    &["Arte", "Deporte", "Música", "Estilo de Vida", "Tecnología", "Comunidades", "Otros"];

/// Interest choice that unlocks the free-text field
pub const INTERES_OTROS: &str = "Otros";

/// The "Otros" interest requires non-empty, letters-only free text of at
/// most 40 characters
pub fn is_valid_interes_otro(interes_otro: Option<&str>) -> bool {
    match interes_otro {
        Some(text) if !text.is_empty() => text.chars().count() <= MAX_INTERES_OTRO_LEN && is_letters_only(text),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_email_format() {
        assert!(is_valid_email("maria@example.com"));
        assert!(is_valid_email("a.b+c@sub.dominio.co"));
        assert!(!is_valid_email("maria"));
        assert!(!is_valid_email("maria@"));
        assert!(!is_valid_email("maria@example"));
        assert!(!is_valid_email("mar ia@example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn rejects_disposable_domains() {
        assert!(is_disposable_email("x@mailinator.com"));
        assert!(is_disposable_email("x@mail.YOPMAIL.com"));
        assert!(!is_disposable_email("x@gmail.com"));
        assert!(!is_disposable_email("no-at-sign"));
    }

    #[test]
    fn validates_usernames() {
        assert!(is_valid_username("maria_22"));
        assert!(is_valid_username("abc"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("a".repeat(21).as_str()));
        assert!(!is_valid_username("maria perez"));
        assert!(!is_valid_username("maría"));
    }

    #[test]
    fn validates_passwords() {
        assert!(is_valid_password("Segura#1"));
        assert!(is_valid_password("Otra.Clave9"));
        assert!(!is_valid_password("Corta#1"));
        assert!(!is_valid_password("sinmayuscula#1"));
        assert!(!is_valid_password("SINMINUSCULA#1"));
        assert!(!is_valid_password("SinNumero#"));
        assert!(!is_valid_password("SinEspecial9"));
        // '!' is outside the allowed special set
        assert!(!is_valid_password("Segura!19"));
    }

    #[test]
    fn validates_names_and_interest_text() {
        assert!(is_letters_only("María José"));
        assert!(!is_letters_only("María 22"));
        assert!(is_valid_interes_otro(Some("Astronomía")));
        assert!(!is_valid_interes_otro(Some("")));
        assert!(!is_valid_interes_otro(None));
        assert!(!is_valid_interes_otro(Some("Algo con número 3")));
        assert!(!is_valid_interes_otro(Some("a".repeat(41).as_str())));
    }
}
