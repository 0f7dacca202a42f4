//! Built-in rule set.
//!
//! Used when no rule-definition file is configured, and written out as the
//! initial content of a new rule file.

use crate::definition::{RuleDefinition, RuleDefinitions};
use sift_core::RiskLevel::{self, High, Low, Medium};

/// (name, regex, description, risk level)
const BUILTIN: &[(&str, &str, &str, RiskLevel)] = &[
    (
        "mobile_cn",
        r"\b1[3-9]\d{9}\b",
        "Mainland China mobile phone number",
        High,
    ),
    (
        "id_card_cn",
        r"\b\d{17}[\dXx]\b",
        "Mainland China resident identity card number",
        High,
    ),
    (
        "email",
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        "Email address",
        Medium,
    ),
    ("bank_card", r"\b\d{16,19}\b", "Bank card number", High),
    (
        "domain",
        r"(?i)\b(?:[a-zA-Z0-9-]+\.)+(?:com|net|org|io|co|edu|gov|mil|biz|info|me|us|ca|uk|de|fr|it|es|au|nz|jp|kr|cn|ru|br|in|mx|nl)\b",
        "Domain name",
        Low,
    ),
    (
        "path",
        r"(?:https?://|/|\.\./|\./|/[\w-]+)/(?:[\w/.?%&=-]*|[\w-]+)",
        "File or URL path",
        Low,
    ),
    (
        "url",
        r"(?i)\b((?:https?|ftp|file)://[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,63}\b(?:[-a-zA-Z0-9@:%_+.~#?&/=]*))\b",
        "URL",
        Low,
    ),
    (
        "jwt",
        r"\bey[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\b",
        "JSON Web Token",
        High,
    ),
    (
        "jdbc",
        r"jdbc:[a-zA-Z]+://[^\s]*",
        "JDBC connection string",
        High,
    ),
    (
        "auth_header",
        r"(?i)\bAuthorization:\s*(?:Bearer|Basic|Digest)\s+(?:[A-Za-z0-9._~+/-]+=*|[\w%]{2}==)\b",
        "HTTP Authorization header",
        High,
    ),
    (
        "credentials",
        r#"(?:username|user|account)\s*[:=]\s*['"](.*?)['"]\s*,\s*(?:password|pass)\s*[:=]\s*['"](.*?)['"]"#,
        "Username and password pair",
        High,
    ),
    ("ticket", r"\bjsapi_ticket\b", "API ticket", Medium),
    (
        "crypto_algorithm",
        r"(?i)\b(AES|DES|3DES|RC4|RSA|ECC|SM2|SM3|SM4|Blowfish|HMAC)\b",
        "Cryptographic algorithm name",
        Low,
    ),
    (
        "secret_key",
        r#"(?i)(?:encryption|secret|private|api|auth|access|key)\s*[:=]\s*["']?([0-9a-fA-F]{32,})["']?"#,
        "Hex-encoded secret key",
        High,
    ),
    (
        "crypto_iv",
        r#"(?i)(?:iv|offset|init_vector)\s*[:=]\s*["']?([0-9a-fA-F]{8,})["']?"#,
        "Cipher IV or offset",
        Medium,
    ),
    (
        "swagger",
        r"(?i)\b((?:https?://)?(?:[a-zA-Z0-9.-]+)/(?:v1|v2|v3|docs|swagger|apidocs|api-docs|open-api)?/?(swagger|api-docs)(?:\.json)?)\b",
        "Swagger API documentation URL",
        Medium,
    ),
    (
        "oss_url",
        r#"https?://[^'")\s]*oss[^'")\s]+"#,
        "Object storage service URL",
        Medium,
    ),
    (
        "access_key",
        r#"(?i)\baccess_?key\s*[:=]\s*["']([^"']+)["']"#,
        "Access key",
        High,
    ),
    (
        "oss_key",
        r#"(?i)\boss\s*[_\s]*(?:key)?\s*[=:]\s*['"]([A-Z0-9]+)['"]"#,
        "Object storage access key",
        High,
    ),
    (
        "api_key",
        r#"(?i)\bapi_?key\s*[=:]\s*["']([^"']+)["']"#,
        "API key",
        High,
    ),
    (
        "api_secret",
        r#"(?i)\bapi_?secret\s*[=:]\s*["']([^"']+)["']"#,
        "API secret",
        High,
    ),
    (
        "app_key",
        r#"(?i)\bAppKey\s*:\s*["']([^"']+)["']"#,
        "Application key",
        High,
    ),
    (
        "app_secret",
        r#"(?i)\bAPPSECRET\s*:\s*["']([^"']+)["']"#,
        "Application secret",
        High,
    ),
    (
        "rsa_public_key",
        r"-----BEGIN(?:\s+\w+)?\s+PUBLIC\s+KEY-----\s*(.*?)\s*-----END(?:\s+\w+)?\s+PUBLIC\s+KEY-----",
        "PEM public key block",
        Medium,
    ),
    (
        "rsa_private_key",
        r"-----BEGIN(?:\s+RSA)?\s+PRIVATE\s+KEY-----\s*(.*?)\s*-----END(?:\s+RSA)?\s+PRIVATE\s+KEY-----",
        "PEM private key block",
        High,
    ),
];

/// The default rule definitions, all enabled.
#[must_use]
pub fn builtin_rules() -> RuleDefinitions {
    BUILTIN
        .iter()
        .map(|&(name, regex, description, risk_level)| {
            (
                name.to_string(),
                RuleDefinition::new(regex, description, risk_level),
            )
        })
        .collect()
}
