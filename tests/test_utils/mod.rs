//! Shared helpers for the integration tests: a mock story service that
//! counts calls, a couple of image fixtures and a one-shot HTTP server.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use storylens_cli::api::join_url;
use storylens_cli::{ApiClient, RawFile, RequestError, SelectedImage, StoryResponse, StoryService};

pub const ORIGIN: &str = "http://localhost:8000";

/// Smallest valid PNG signature plus a few bytes, good enough as a payload.
pub fn png_file() -> RawFile {
    RawFile::new(
        "cat.png",
        "image/png",
        vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 13],
    )
}

pub fn text_file() -> RawFile {
    RawFile::new("notes.txt", "text/plain", b"not an image".to_vec())
}

/// What the mock answers to an upload.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Story { story: String, audio_url: String },
    Status(u16),
}

/// Story service that never touches the network.
pub struct MockStoryService {
    response: MockResponse,
    narration: Vec<u8>,
    calls: Cell<usize>,
    uploads: RefCell<Vec<SelectedImage>>,
    fetched: RefCell<Vec<String>>,
}

impl MockStoryService {
    pub fn new_success(story: &str, audio_url: &str) -> Self {
        Self::new(MockResponse::Story {
            story: story.into(),
            audio_url: audio_url.into(),
        })
    }

    pub fn new_failure(status: u16) -> Self {
        Self::new(MockResponse::Status(status))
    }

    fn new(response: MockResponse) -> Self {
        MockStoryService {
            response,
            narration: b"ID3 fake mp3".to_vec(),
            calls: Cell::new(0),
            uploads: RefCell::new(Vec::new()),
            fetched: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    pub fn uploads(&self) -> Vec<SelectedImage> {
        self.uploads.borrow().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    pub fn narration(&self) -> &[u8] {
        &self.narration
    }
}

impl StoryService for MockStoryService {
    fn upload_photo(&self, image: &SelectedImage) -> Result<StoryResponse, RequestError> {
        self.calls.set(self.calls.get() + 1);
        self.uploads.borrow_mut().push(image.clone());
        match &self.response {
            MockResponse::Story { story, audio_url } => Ok(StoryResponse {
                story: story.clone(),
                audio_url: audio_url.clone(),
            }),
            MockResponse::Status(status) => Err(RequestError::Status {
                status: *status,
                body: "Internal Server Error".into(),
            }),
        }
    }

    fn narration_url(&self, audio_path: &str) -> String {
        join_url(ORIGIN, audio_path)
    }

    fn fetch_narration(&self, url: &str) -> Result<Vec<u8>, RequestError> {
        self.fetched.borrow_mut().push(url.to_string());
        match &self.response {
            MockResponse::Story { .. } => Ok(self.narration.clone()),
            MockResponse::Status(status) => Err(RequestError::Status {
                status: *status,
                body: String::new(),
            }),
        }
    }
}

/// API client for a local test server. Proxies from the environment are
/// ignored so loopback requests stay local.
pub fn local_api(origin: &str) -> ApiClient {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .expect("build reqwest client");
    ApiClient::with_client(client, origin)
}

/// A request captured by `serve_once`.
pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

/// Accept one connection on a random local port, answer it with `status`
/// and `body`, and hand back what the client sent.
pub fn serve_once(status: &str, body: &str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let origin = format!("http://{}", listener.local_addr().expect("local addr"));
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let captured = read_request(&mut stream);
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().ok();
        captured
    });
    (origin, handle)
}

fn read_request(stream: &mut impl Read) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).expect("read request");
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.eq_ignore_ascii_case("content-length") {
            value.trim().parse::<usize>().ok()
        } else {
            None
        }
    });

    loop {
        let body_len = buf.len() - header_end;
        let done = match content_length {
            Some(len) => body_len >= len,
            None => buf.ends_with(b"0\r\n\r\n"),
        };
        if done {
            break;
        }
        let n = stream.read(&mut chunk).expect("read body");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        head,
        body: buf[header_end..].to_vec(),
    }
}

pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
