use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Minimal in-process registry: canned responses keyed by request path,
/// with per-path hit counting so tests can assert how often a package or
/// tarball was fetched.
pub struct MockRegistry {
    base: String,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

pub struct Route {
    content_type: &'static str,
    body: Vec<u8>,
}

impl MockRegistry {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock registry");
        let addr = listener.local_addr().expect("mock registry addr");
        let routes: Arc<Mutex<HashMap<String, Route>>> = Arc::default();
        let hits: Arc<Mutex<HashMap<String, usize>>> = Arc::default();
        {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&hits);
            thread::spawn(move || {
                for stream in listener.incoming() {
                    let Ok(stream) = stream else { continue };
                    let routes = Arc::clone(&routes);
                    let hits = Arc::clone(&hits);
                    thread::spawn(move || handle(stream, &routes, &hits));
                }
            });
        }
        Self { base: format!("http://{addr}"), routes, hits }
    }

    pub fn base(&self) -> String {
        self.base.clone()
    }

    pub fn route(&self, path: &str, content_type: &'static str, body: Vec<u8>) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Route { content_type, body });
    }

    pub fn hits(&self, path: &str) -> usize {
        *self.hits.lock().unwrap().get(path).unwrap_or(&0)
    }

    /// Register metadata and tarballs for one package.
    pub fn publish(&self, name: &str, latest: Option<&str>, versions: &[VersionFixture]) {
        let mut version_docs = serde_json::Map::new();
        for fixture in versions {
            let deps: serde_json::Map<String, Value> = fixture
                .dependencies
                .iter()
                .map(|(k, v)| (k.to_string(), json!(v)))
                .collect();
            let tarball_path = format!("/tarballs/{name}-{}.tgz", fixture.version);
            version_docs.insert(
                fixture.version.to_string(),
                json!({
                    "dist": { "tarball": format!("{}{tarball_path}", self.base) },
                    "dependencies": deps,
                }),
            );
            self.route(&tarball_path, "application/octet-stream", tarball(fixture.files));
        }
        let mut doc = json!({ "versions": version_docs });
        if let Some(latest) = latest {
            doc["dist-tags"] = json!({ "latest": latest });
        }
        self.route(&format!("/{name}"), "application/json", doc.to_string().into_bytes());
    }
}

pub struct VersionFixture<'a> {
    pub version: &'a str,
    pub dependencies: &'a [(&'a str, &'a str)],
    pub files: &'a [(&'a str, &'a str)],
}

impl Default for VersionFixture<'_> {
    fn default() -> Self {
        Self { version: "1.0.0", dependencies: &[], files: &[("package.json", "{}")] }
    }
}

fn handle(
    stream: TcpStream,
    routes: &Mutex<HashMap<String, Route>>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain headers; requests carry no body.
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => {}
            Err(_) => return,
        }
    }
    let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();
    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let mut stream = reader.into_inner();
    match routes.lock().unwrap().get(&path) {
        Some(route) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                route.content_type,
                route.body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&route.body);
        }
        None => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
    let _ = stream.flush();
}

/// Build a gzipped tarball with the registry convention of a single
/// `package/` root directory wrapping every entry.
pub fn tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let gz = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(gz);
    for (rel, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("package/{rel}"), contents.as_bytes())
            .expect("append tar entry");
    }
    let gz = builder.into_inner().expect("finish tar");
    gz.finish().expect("finish gzip")
}
