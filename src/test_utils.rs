use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Accept connections and never answer, to exercise client timeouts.
pub async fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });
    addr
}

/// A Deezer search body with one track per `(id, preview)` pair.
pub fn deezer_body(tracks: &[(i64, Option<&str>)]) -> String {
    let data: Vec<_> = tracks
        .iter()
        .map(|(id, preview)| {
            json!({
                "id": id,
                "title": format!("Track {id}"),
                "artist": {"id": id * 10, "name": format!("Artist {id}")},
                "preview": preview,
            })
        })
        .collect();
    json!({ "data": data, "total": tracks.len() }).to_string()
}

/// Write a 440 Hz, 16-bit WAV tone.
pub fn write_sine_wav(path: &Path, sample_rate: u32, channels: u16, seconds: f32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (sample_rate as f32 * seconds) as u32;
    for n in 0..frames {
        let t = n as f32 / sample_rate as f32;
        let value = (t * 440.0 * std::f32::consts::TAU).sin() * 0.5;
        for _ in 0..channels {
            writer.write_sample((value * i16::MAX as f32) as i16).unwrap();
        }
    }
    writer.finalize().unwrap();
}

pub const MULTIPART_BOUNDARY: &str = "moodtune-test-boundary";

/// A multipart/form-data body holding a single file field.
pub fn multipart_body(field: &str, filename: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
