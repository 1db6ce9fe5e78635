use crate::ipc::{self, AppState, Session};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use uuid::Uuid;

/// Accepts forever, one handler thread per connection.
pub fn serve(listener: TcpListener, state: Arc<AppState>) -> anyhow::Result<()> {
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            }
        };
        let state = Arc::clone(&state);
        let spawned = std::thread::Builder::new()
            .name("rosterd-conn".into())
            .spawn(move || handle_connection(stream, &state));
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to spawn connection handler");
        }
    }
    Ok(())
}

/// Frame in, command, frame out, until the peer closes or sends something
/// that is not a frame. The socket is shut down on every exit path.
pub fn handle_connection(mut stream: TcpStream, state: &AppState) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".into());
    let span = tracing::info_span!("conn", id = %Uuid::new_v4(), peer = %peer);
    let _enter = span.enter();
    tracing::info!("client connected");

    let mut session = Session::default();
    loop {
        let payload = match ipc::read_frame(&mut stream) {
            Ok(Some(p)) => p,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "dropping connection");
                break;
            }
        };
        let reply = ipc::handle_command(state, &mut session, &payload);
        if let Err(e) = ipc::write_frame(&mut stream, &ipc::to_wire(&reply)) {
            tracing::warn!(error = %e, "failed to send response");
            break;
        }
    }

    if let Some(name) = session.logout() {
        tracing::debug!(teacher = %name, "session ended with connection");
    }
    let _ = stream.shutdown(Shutdown::Both);
    tracing::info!("client disconnected");
}
