//! Request steps and the scenario they form.
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One HTTP call of a scenario: URL, method, headers and an optional body.
///
/// Built once when the scenario is defined and never mutated afterwards; the
/// `with_*` helpers consume and return the value, so a step that is already
/// part of a [`Scenario`] cannot be changed. URL syntax is not validated here
/// and surfaces as an execution-time failure instead.
#[derive(Debug, Clone)]
pub struct RequestStep {
    pub url: String,
    pub method: Method,
    /// Header names are unique and case-sensitive as given.
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestStep {
    fn new(url: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, Method::Get)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(url, Method::Delete)
    }

    /// POST with a JSON body; presets `Content-Type: application/json`.
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(url, Method::Post)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    /// PUT with a JSON body; presets `Content-Type: application/json`.
    pub fn put(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(url, Method::Put)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    /// Set a header, replacing any previous value for the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.headers.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.headers.push((name, value));
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// An ordered, immutable sequence of request steps, shared read-only by every
/// concurrent session.
#[derive(Debug, Clone)]
pub struct Scenario {
    steps: Arc<[RequestStep]>,
}

impl Scenario {
    pub fn new(steps: Vec<RequestStep>) -> Self {
        Self {
            steps: steps.into(),
        }
    }

    pub fn steps(&self) -> &[RequestStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Unique step URLs in order of first appearance.
    pub fn endpoints(&self) -> Vec<&str> {
        let mut endpoints: Vec<&str> = Vec::new();
        for step in self.steps.iter() {
            if !endpoints.contains(&step.url.as_str()) {
                endpoints.push(&step.url);
            }
        }
        endpoints
    }
}

impl FromIterator<RequestStep> for Scenario {
    fn from_iter<I: IntoIterator<Item = RequestStep>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
