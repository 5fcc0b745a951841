/// Per-call provider credentials
///
/// Lives for a single generation only. `Debug` never prints the key.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    base_url: Option<String>,
    model: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            model: model.into(),
        }
    }

    /// Set a base URL override; blank values are treated as absent
    pub fn with_base_url(mut self, base_url: Option<impl Into<String>>) -> Self {
        self.base_url = base_url
            .map(Into::into)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}
