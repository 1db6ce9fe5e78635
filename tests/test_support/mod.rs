#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

/// A running `rosterd` on an ephemeral port; killed on drop.
pub struct Server {
    child: Child,
    pub addr: SocketAddr,
}

impl Server {
    pub fn connect(&self) -> TcpStream {
        let stream = TcpStream::connect(self.addr).expect("connect rosterd");
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .expect("read timeout");
        stream
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_server(data_dir: &Path) -> Server {
    let exe = env!("CARGO_BIN_EXE_rosterd");
    let mut child = Command::new(exe)
        .args(["--host", "127.0.0.1", "--port", "0", "--data-dir"])
        .arg(data_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn rosterd");
    let stdout = child.stdout.take().expect("child stdout");
    let mut line = String::new();
    BufReader::new(stdout)
        .read_line(&mut line)
        .expect("read ready line");
    let addr = line
        .trim()
        .strip_prefix("ready ")
        .unwrap_or_else(|| panic!("unexpected startup line: {line:?}"))
        .parse()
        .expect("parse listen addr");
    Server { child, addr }
}

pub fn write_frame(stream: &mut TcpStream, payload: &str) {
    let frame = format!("{:<10}{}", payload.len(), payload);
    stream.write_all(frame.as_bytes()).expect("write frame");
    stream.flush().expect("flush frame");
}

pub fn read_frame(stream: &mut TcpStream) -> String {
    let mut header = [0u8; 10];
    stream.read_exact(&mut header).expect("read header");
    let len: usize = std::str::from_utf8(&header)
        .expect("ascii header")
        .trim()
        .parse()
        .expect("numeric header");
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).expect("read body");
    String::from_utf8(body).expect("utf-8 body")
}

pub fn request(stream: &mut TcpStream, payload: &str) -> String {
    write_frame(stream, payload);
    read_frame(stream)
}

pub fn request_json(stream: &mut TcpStream, payload: &str) -> serde_json::Value {
    let reply = request(stream, payload);
    serde_json::from_str(&reply).unwrap_or_else(|e| panic!("{payload}: {e}: {reply}"))
}

/// Registers teacher Ana (T1/pw) and logs this connection in.
pub fn login(stream: &mut TcpStream) {
    let registered = request(stream, "cadastrar_professor;Ana;T1;pw");
    assert!(
        registered == "✅ Professor cadastrado." || registered.contains("Matrícula já cadastrada"),
        "{registered}"
    );
    assert_eq!(request(stream, "login_professor;T1;pw"), "SUCESSO_LOGIN:Ana");
}
