//! In-process tags server speaking the line protocol
//!
//! Each connection carries one command terminated by `\r\n`; the server
//! records it, writes the reply and closes the connection.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use semfora_tags::Endpoint;

type ReplyFn = dyn Fn(&str) -> String + Send + Sync;

pub struct FakeTagsServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FakeTagsServer {
    /// Start a server whose reply is computed from each request.
    pub fn start(reply: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake server");
        let addr = listener.local_addr().expect("No local address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shutdown = Arc::new(AtomicBool::new(false));
        let reply: Arc<ReplyFn> = Arc::new(reply);

        let handle = {
            let requests = Arc::clone(&requests);
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || {
                for stream in listener.incoming() {
                    if shutdown.load(Ordering::SeqCst) {
                        break;
                    }
                    if let Ok(stream) = stream {
                        serve_one(stream, &requests, reply.as_ref());
                    }
                }
            })
        };

        Self {
            addr,
            requests,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Start a server that answers every command with the same text.
    pub fn with_reply(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::start(move |_| reply.clone())
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new("127.0.0.1", self.port())
    }

    /// `127.0.0.1:<port>` for `--server` arguments and config files
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port())
    }

    /// Commands received so far, without the line terminator
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeTagsServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // Wake the accept loop so it sees the flag.
        let _ = TcpStream::connect(self.addr);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve_one(stream: TcpStream, requests: &Mutex<Vec<String>>, reply: &ReplyFn) {
    let mut reader = BufReader::new(match stream.try_clone() {
        Ok(s) => s,
        Err(_) => return,
    });
    let mut line = String::new();
    if reader.read_line(&mut line).is_err() || line.is_empty() {
        return;
    }
    let command = line.trim_end_matches(['\r', '\n']).to_string();
    let answer = reply(&command);
    requests.lock().unwrap().push(command);

    let mut stream = stream;
    let _ = stream.write_all(answer.as_bytes());
    let _ = stream.flush();
}

/// A localhost port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener.local_addr().expect("No local address").port()
}

/// Endpoint on [`closed_port`]; connecting to it is refused.
pub fn dead_endpoint() -> Endpoint {
    Endpoint::new("127.0.0.1", closed_port())
}
