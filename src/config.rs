pub const DISABLED_VAR: &str = "AWS_DISABLED";
pub const ENDPOINT_URL_VAR: &str = "AWS_ENDPOINT_URL";

/// Process-wide settings read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub disabled: bool,
    pub endpoint_url: Option<String>,
}

impl Environment {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            disabled: is_truthy(lookup(DISABLED_VAR).as_deref()),
            endpoint_url: lookup(ENDPOINT_URL_VAR).filter(|url| !url.is_empty()),
        }
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim().to_ascii_lowercase();
        v == "1" || v == "true"
    })
}
