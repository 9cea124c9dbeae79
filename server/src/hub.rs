use anyhow::Context;
use cosweep_core::{CellDiff, Ended, GameConfig, GameEngine, GameObserver, Snapshot, TimerId};
use cosweep_protocol::{ClientMessage, ServerMessage};
use rand::rngs::SmallRng;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::scheduler::TokioScheduler;

/// Messages buffered per client before it is considered lagging.
const EVENT_BUFFER: usize = 256;

/// Work items for the engine task, handled strictly one after another.
pub enum Command {
    Connect { reply: oneshot::Sender<Session> },
    Request(ClientMessage),
    Tick(TimerId),
}

/// What a newly connected client gets: the board as it is now and every event after it.
pub struct Session {
    pub loaded: ServerMessage,
    pub events: broadcast::Receiver<ServerMessage>,
}

/// Forwards engine events to every subscribed connection.
struct Relay {
    events: broadcast::Sender<ServerMessage>,
}

impl Relay {
    fn publish(&self, message: ServerMessage) {
        // no receivers just means nobody is connected
        let _ = self.events.send(message);
    }
}

impl GameObserver for Relay {
    fn on_started(&mut self, snapshot: &Snapshot) {
        log::info!("New round started");
        self.publish(ServerMessage::Started(snapshot.clone()));
    }

    fn on_update(&mut self, diff: &[CellDiff], ended: Option<Ended>) {
        if let Some(ended) = ended {
            log::info!("Round over: {:?}", ended.outcome);
        }
        self.publish(ServerMessage::Update {
            diff: diff.to_vec(),
            ended,
        });
    }

    fn on_restart_countdown(&mut self, seconds_left: u32) {
        self.publish(ServerMessage::RestartCountdown { seconds_left });
    }
}

/// Cheap handle used by connections to reach the engine task.
#[derive(Clone)]
pub struct HubHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl HubHandle {
    pub async fn connect(&self) -> anyhow::Result<Session> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Connect { reply })
            .ok()
            .context("engine task stopped")?;
        response.await.context("engine task dropped the connection")
    }

    pub fn request(&self, message: ClientMessage) -> anyhow::Result<()> {
        self.commands
            .send(Command::Request(message))
            .ok()
            .context("engine task stopped")
    }
}

/// Sole owner of the engine. Requests and ticks arrive on one queue so they never interleave.
pub struct Hub {
    engine: GameEngine<TokioScheduler>,
    commands: mpsc::UnboundedReceiver<Command>,
    events: broadcast::Sender<ServerMessage>,
}

impl Hub {
    /// Builds the engine and runs it on its own task.
    pub fn spawn(config: GameConfig, rng: SmallRng) -> anyhow::Result<HubHandle> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let mut engine = GameEngine::new(config, TokioScheduler::new(tx.clone()), rng)
            .context("invalid board configuration")?;
        engine.subscribe(Relay {
            events: events.clone(),
        });

        let hub = Self {
            engine,
            commands: rx,
            events,
        };
        tokio::spawn(hub.run());
        Ok(HubHandle { commands: tx })
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Connect { reply } => {
                    let session = Session {
                        loaded: ServerMessage::Loaded(self.engine.load_snapshot()),
                        events: self.events.subscribe(),
                    };
                    if reply.send(session).is_err() {
                        log::debug!("Client left before receiving the board");
                    }
                }
                Command::Request(message) => self.handle_request(message),
                Command::Tick(timer) => self.engine.tick(timer),
            }
        }
        log::debug!("Engine task finished");
    }

    fn handle_request(&mut self, message: ClientMessage) {
        let (x, y) = match message {
            ClientMessage::Open { x, y } | ClientMessage::Flag { x, y } => (x, y),
        };
        let Some(coords) = self.engine.coordinate(x, y) else {
            log::debug!("Dropping {:?}: invalid coordinates", message);
            return;
        };

        let diff = match message {
            ClientMessage::Open { .. } => self.engine.open(coords),
            ClientMessage::Flag { .. } => self.engine.flag(coords),
        };
        log::trace!("{:?} changed {} cells", message, diff.len());
    }
}
