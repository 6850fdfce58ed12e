//! Host events read as JSON lines from a blocking source such as stdin

use crate::runtime::HostEvent;
use std::io::BufRead;
use tokio::sync::mpsc;

/// Parse `reader` line by line on a dedicated thread
///
/// Blank lines are skipped and malformed lines are logged and dropped. The
/// thread is detached: the loop consuming the receiver can finish on
/// `unload` while a read is still blocked, and the thread exits on its own
/// once the receiver is gone and the next line or EOF arrives.
pub fn spawn_line_reader<R>(reader: R, capacity: usize) -> mpsc::Receiver<HostEvent>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));

    std::thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Host event stream failed: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HostEvent>(&line) {
                Ok(event) => {
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!("Skipping malformed host event: {}", e),
            }
        }
        tracing::debug!("Host event reader finished");
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{run, FrameSource, RuntimeConfig};
    use crate::session::{SessionState, TrailSession};
    use crate::surface::MemorySurface;
    use std::io::{BufReader, Cursor, Read};
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    /// Serves `data`, then blocks until `gate` is dropped, like a pipe the host keeps open
    struct OpenPipe {
        data: Cursor<Vec<u8>>,
        gate: std_mpsc::Receiver<()>,
    }

    impl Read for OpenPipe {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.data.read(buf)?;
            if n > 0 {
                return Ok(n);
            }
            // Err means the sender was dropped: report EOF
            let _ = self.gate.recv();
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_lines_are_parsed_and_garbage_skipped() {
        let input = concat!(
            "{\"type\":\"ready\"}\n",
            "\n",
            "not json\n",
            "{\"type\":\"pointerMove\",\"x\":40,\"y\":0}\n",
            "{\"type\":\"frame\"}\n",
        );
        let mut rx = spawn_line_reader(Cursor::new(input.as_bytes().to_vec()), 4);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(
            events,
            vec![
                HostEvent::Ready,
                HostEvent::PointerMove { x: 40.0, y: 0.0 },
                HostEvent::Frame,
            ]
        );
    }

    #[tokio::test]
    async fn test_unload_finishes_while_source_stays_open() {
        let (gate_tx, gate) = std_mpsc::channel();
        let pipe = OpenPipe {
            data: Cursor::new(
                b"{\"type\":\"pointerMove\",\"x\":100,\"y\":0}\n{\"type\":\"unload\"}\n".to_vec(),
            ),
            gate,
        };
        let rx = spawn_line_reader(BufReader::new(pipe), 8);
        let config = RuntimeConfig {
            document_ready: true,
            frame_source: FrameSource::External,
        };

        let (session, report) = tokio::time::timeout(
            Duration::from_secs(5),
            run(TrailSession::new(MemorySurface::new()), config, rx),
        )
        .await
        .expect("unload should end the loop without waiting for the source to close");

        assert_eq!(session.state(), SessionState::TornDown);
        assert_eq!(report.pointer_moves, 1);
        drop(gate_tx);
    }
}
