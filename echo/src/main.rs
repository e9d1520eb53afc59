use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;
use xchannel::{Channel, ChannelConfig, ChannelEvents, LoopbackChannel, Payload};

const MESSAGE_COUNT: usize = 1000;
const MESSAGE_SIZE: usize = 1024; // 1 KB

fn main() -> xchannel::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (client, server) = LoopbackChannel::pair(ChannelConfig::default().with_label("echo"));

    // Server echoes every payload straight back from inside its handler.
    let weak = Arc::downgrade(&server);
    server.on_message(move |payload: &Payload| {
        let Some(server) = weak.upgrade() else {
            return;
        };
        if let Err(e) = server.send(payload) {
            warn!("Echo failed: {}", e);
        }
    });
    server.on_closed(|| info!("Server side closed"));

    client.on_open(|| info!("Client side open"));
    client.on_error(|message: &str| warn!("Client error: {}", message));
    client.on_available(|| log::trace!("Echo queued on client"));

    client.open();

    info!("Sending {} messages of {} bytes...", MESSAGE_COUNT, MESSAGE_SIZE);
    let start = Instant::now();
    let mut received = 0usize;
    for i in 0..MESSAGE_COUNT {
        let payload = if i % 2 == 0 {
            Payload::Binary(vec![0xAB; MESSAGE_SIZE])
        } else {
            Payload::Text("x".repeat(MESSAGE_SIZE))
        };
        client.send(&payload)?;

        while let Some(echo) = client.receive() {
            if echo != payload {
                warn!("Echo {} does not match", i);
            }
            received += echo.len();
        }
    }
    let elapsed = start.elapsed();

    let stats = client.stats();
    info!("=== Echo Complete ===");
    info!("Messages sent: {}", stats.messages_sent);
    info!("Total echoed: {} KB", received / 1024);
    info!("Time: {:.3} seconds", elapsed.as_secs_f64());

    client.close();
    info!("Server closed: {}", server.is_closed());
    Ok(())
}
