use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]+\.[A-Za-z]+@university\.com$").expect("valid email regex")
});
static PASSWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z]{4,}\d{3,}$").expect("valid password regex"));

/// `first.last@university.com`, letters only on each side of the dot.
pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Capital letter, at least four more letters, then at least three digits.
pub fn valid_password(password: &str) -> bool {
    PASSWORD_RE.is_match(password)
}

/// Display name derived from the local part: `john.smith@..` -> `John Smith`.
pub fn email_to_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    match local.split_once('.') {
        Some((first, last)) => format!("{} {}", capitalize(first), capitalize(last)),
        None => capitalize(local),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
