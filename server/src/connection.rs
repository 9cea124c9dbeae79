use cosweep_protocol::{ClientMessage, ServerMessage, decode_line, encode_line};
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::hub::{HubHandle, Session};

/// Serves one client until it disconnects: relays every broadcast and forwards its requests.
pub async fn handle(stream: TcpStream, hub: HubHandle) -> anyhow::Result<()> {
    let peer = stream.peer_addr()?;
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    let Session { loaded, mut events } = hub.connect().await?;
    send(&mut writer, &loaded).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match decode_line::<ClientMessage>(&line) {
                    Ok(message) => hub.request(message)?,
                    Err(err) => log::debug!("{}: dropping malformed request: {}", peer, err),
                }
            }
            received = events.recv() => match relayed(&hub, &mut events, received, peer).await? {
                Some(message) => send(&mut writer, &message).await?,
                None => break,
            },
        }
    }

    Ok(())
}

/// Message to forward for one broadcast receive, `None` once the engine is gone.
///
/// A receiver that fell behind missed diffs, so it is replaced by a fresh session and the client starts over from
/// the full board.
async fn relayed(
    hub: &HubHandle,
    events: &mut broadcast::Receiver<ServerMessage>,
    received: Result<ServerMessage, RecvError>,
    peer: SocketAddr,
) -> anyhow::Result<Option<ServerMessage>> {
    match received {
        Ok(message) => Ok(Some(message)),
        Err(RecvError::Lagged(skipped)) => {
            log::warn!("{}: lagged behind by {} events, resending board", peer, skipped);
            let Session { loaded, events: fresh } = hub.connect().await?;
            *events = fresh;
            Ok(Some(loaded))
        }
        Err(RecvError::Closed) => Ok(None),
    }
}

async fn send(writer: &mut OwnedWriteHalf, message: &ServerMessage) -> anyhow::Result<()> {
    writer.write_all(encode_line(message)?.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::Hub;
    use cosweep_core::{CellDiff, CellView, GameConfig};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn peer() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 4000))
    }

    #[tokio::test]
    async fn lagging_receiver_gets_a_fresh_board() -> anyhow::Result<()> {
        let hub = Hub::spawn(GameConfig::new((4, 4), 3)?, SmallRng::seed_from_u64(5))?;
        let Session { mut events, .. } = hub.connect().await?;

        // an odd number of toggles leaves the cell flagged
        for _ in 0..301 {
            hub.request(ClientMessage::Flag { x: 1.0, y: 2.0 })?;
        }
        // queued after the toggles, so every one of them has been applied
        hub.connect().await?;

        let received = events.recv().await;
        assert!(matches!(received, Err(RecvError::Lagged(_))));
        let relayed_message = relayed(&hub, &mut events, received, peer()).await?;
        let Some(ServerMessage::Loaded(snapshot)) = relayed_message else {
            anyhow::bail!("expected game:loaded after lagging");
        };
        assert_eq!(snapshot.flags_count, 1);
        assert_eq!(snapshot.visible_cells, vec![CellDiff::new((1, 2), CellView::Flagged)]);

        hub.request(ClientMessage::Flag { x: 1.0, y: 2.0 })?;
        let received = events.recv().await;
        assert_eq!(
            relayed(&hub, &mut events, received, peer()).await?,
            Some(ServerMessage::Update {
                diff: vec![CellDiff::new((1, 2), CellView::Closed)],
                ended: None,
            })
        );
        Ok(())
    }
}
