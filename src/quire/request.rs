//! The slice of an HTTP request the widget tree needs.
//!
//! Forms only care whether the request is a POST and which keys were
//! submitted. The context is handed to the initializer explicitly rather than
//! read from process state.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    method: Method,
    post: Vec<(String, String)>,
}

impl RequestContext {
    pub fn get() -> Self {
        Self::default()
    }

    /// A POST carrying `post` in submission order.
    pub fn post<I, K, V>(post: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: Method::Post,
            post: post
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::Post
    }

    /// The submitted value for `key`. The last occurrence wins.
    pub fn submitted(&self, key: &str) -> Option<&str> {
        self.post
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Submitted keys in submission order, without repeats.
    pub fn submitted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::with_capacity(self.post.len());
        for (key, _) in &self.post {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
        keys
    }
}
