use std::time::Duration;

use log::debug;

use crate::errors::Result;

/// Somewhere tile layer bytes can be fetched from by URL.
pub trait TileSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP source. Non-success statuses are transport errors.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(HttpSource { client })
    }
}

impl TileSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;
        debug!(url = url, bytes = bytes.len(); "Fetched layer");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
pub mod memory {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::TileSource;
    use crate::errors::{Error, ErrorKind, Result};

    /// Serves canned layer bytes by URL and remembers what was asked for.
    #[derive(Default)]
    pub struct MemorySource {
        pub layers: HashMap<String, Vec<u8>>,
        pub requested: RefCell<Vec<String>>,
    }

    impl MemorySource {
        pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
            self.layers.insert(url.to_string(), bytes);
            self
        }
    }

    impl TileSource for MemorySource {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.requested.borrow_mut().push(url.to_string());
            self.layers
                .get(url)
                .cloned()
                .ok_or_else(|| Error::new(ErrorKind::Transport, "404 Not Found"))
        }
    }
}
