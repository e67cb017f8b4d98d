use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use url::Url;

use super::connector::{ApiConnector, BoxFuture, HttpRequest, HttpResponse, HttpTransport};

type TransportResult = Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>>;

enum Scripted {
    Response(HttpResponse),
    Failure(String),
}

#[derive(Default)]
struct State {
    requests: Vec<HttpRequest>,
    scripted: VecDeque<Scripted>,
}

/// In-memory transport for tests: records every request and replays
/// scripted responses in order.
#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<State>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_response(&self, status: u16, body: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .push_back(Scripted::Response(HttpResponse {
                status,
                body: body.into(),
            }));
    }

    pub(crate) fn push_failure(&self, message: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .push_back(Scripted::Failure(message.into()));
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.state
            .lock()
            .unwrap()
            .requests
            .last()
            .cloned()
            .expect("no request was recorded")
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

impl HttpTransport for FakeTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, TransportResult> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        let next = state
            .scripted
            .pop_front()
            .expect("no scripted response left for request");
        Box::pin(async move {
            match next {
                Scripted::Response(response) => Ok(response),
                Scripted::Failure(message) => {
                    let err: Box<dyn std::error::Error + Send + Sync> =
                        Box::new(io::Error::other(message));
                    Err(err)
                }
            }
        })
    }
}

pub(crate) fn connector(transport: FakeTransport) -> ApiConnector {
    connector_with(transport, false)
}

pub(crate) fn connector_with(transport: FakeTransport, dev_mode: bool) -> ApiConnector {
    let base_url = Url::parse("https://gateway.test").expect("static test URL parses");
    ApiConnector::new(Arc::new(transport), base_url, "test-token", dev_mode)
}
