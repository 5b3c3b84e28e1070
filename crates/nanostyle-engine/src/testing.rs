use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use nanostyle_contracts::encoding::ImageEncoding;

use crate::client::{GenerationRequest, ImageFetcher, ImageGenerator};
use crate::error::GenerationError;

pub(crate) struct StubGenerator {
    responses: RefCell<VecDeque<Result<Option<ImageEncoding>, GenerationError>>>,
    requests: RefCell<Vec<GenerationRequest>>,
    calls: Cell<usize>,
}

impl StubGenerator {
    pub(crate) fn returning(
        responses: Vec<Result<Option<ImageEncoding>, GenerationError>>,
    ) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
            calls: Cell::new(0),
        }
    }

    pub(crate) fn image(bytes: &[u8]) -> Self {
        Self::returning(vec![Ok(Some(ImageEncoding::new("image/png", bytes.to_vec())))])
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    pub(crate) fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.borrow().clone()
    }
}

impl ImageGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<ImageEncoding>, GenerationError> {
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::service("stub has no scripted response")))
    }
}

#[derive(Default)]
pub(crate) struct StubFetcher {
    failures: HashMap<String, String>,
    fetched: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub(crate) fn failing(url: &str, message: &str) -> Self {
        let mut failures = HashMap::new();
        failures.insert(url.to_string(), message.to_string());
        Self {
            failures,
            fetched: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    pub(crate) fn bytes_for(url: &str) -> Vec<u8> {
        url.as_bytes().to_vec()
    }
}

impl ImageFetcher for StubFetcher {
    fn fetch(&self, url: &str) -> Result<ImageEncoding, GenerationError> {
        self.fetched.borrow_mut().push(url.to_string());
        if let Some(message) = self.failures.get(url) {
            return Err(GenerationError::fetch_failed(message.clone()));
        }
        Ok(ImageEncoding::new("image/jpeg", Self::bytes_for(url)))
    }
}
