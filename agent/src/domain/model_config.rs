//! Reading and rewriting the active model in the inspection application's
//! config file, plus model name validation.
//!
//! The config file is INI-like; the active model lives in
//!
//! ```text
//! [current_model]
//! model = LineA_v2
//! model_path = C:\Models\LineA_v2
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::CommandError;

static CURRENT_MODEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern.
    #[allow(clippy::expect_used)]
    Regex::new(r"\[current_model\]\s*model\s*=\s*([^\s]+)").expect("valid regex")
});

static CURRENT_MODEL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(\[current_model\]\s*model\s*=[ \t]*)([^\r\n]*)").expect("valid regex")
});

static MODEL_PATH_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(model_path[ \t]*=[ \t]*)([^\r\n]*)").expect("valid regex")
});

/// Model folder names become path components; keep them to one safe segment.
static MODEL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._ -]{0,127}$").expect("valid regex")
});

/// Name of the model selected in `[current_model]`, if any.
#[must_use]
pub fn current_model(config: &str) -> Option<String> {
    CURRENT_MODEL_RE
        .captures(config)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Point `[current_model]` at `model_name` and every `model_path` at
/// `model_path`. Text that does not match is left untouched.
#[must_use]
pub fn set_current_model(config: &str, model_name: &str, model_path: &str) -> String {
    let updated = CURRENT_MODEL_LINE_RE.replace(config, |c: &regex::Captures<'_>| {
        format!("{}{model_name}", &c[1])
    });
    MODEL_PATH_LINE_RE
        .replace_all(&updated, |c: &regex::Captures<'_>| format!("{}{model_path}", &c[1]))
        .into_owned()
}

/// Reject names that could escape the model folder.
///
/// # Errors
///
/// Returns `InvalidModelName` for empty names, separators, or `..`.
pub fn validate_model_name(name: &str) -> Result<(), CommandError> {
    if MODEL_NAME_RE.is_match(name) && !name.contains("..") {
        Ok(())
    } else {
        Err(CommandError::InvalidModelName(name.to_string()))
    }
}
