//! Engine actor: an isolated Tokio task that owns one [`Game`].
//!
//! Three sources feed the actor: commands from front ends, signals from
//! the live [`TurnClock`], and verdicts from dictionary lookups running on
//! their own tasks. The actor applies them to the game strictly one at a
//! time, so a timeout and a verdict can never interleave halfway through a
//! resolution. Which of the two counts is decided by the turn epoch inside
//! `Game`.

use std::sync::Arc;

use shiritori_clock::{ClockSignal, TurnClock};
use shiritori_dictionary::{DictionaryError, DictionaryGateway, Lookup};
use shiritori_protocol::{Command, GameEvent, GameState, Seat, TurnEpoch};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::{EngineError, Game, GameConfig, LetterSource, RngLetters, Transition};

/// Notice shown while a word is out for lookup.
const VALIDATING_NOTICE: &str = "Validating with dictionary…";

/// Channel sender for delivering events to one subscriber.
pub type EventSender = mpsc::UnboundedSender<GameEvent>;

/// Messages the outside world sends to the actor.
enum EngineCommand {
    /// Apply a game command and report what happened.
    Play {
        command: Command,
        reply: oneshot::Sender<Result<Transition, EngineError>>,
    },
    /// Add an observer. It gets the current snapshot right away.
    Subscribe { sender: EventSender },
    /// Request the current game state.
    Snapshot { reply: oneshot::Sender<GameState> },
    /// Stop the actor.
    Shutdown,
}

/// A finished dictionary lookup, tagged with the turn it was made for.
struct Verdict {
    epoch: TurnEpoch,
    result: Result<Lookup, DictionaryError>,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running engine. Cheap to clone.
///
/// Every method fails with [`EngineError::Unavailable`] once the actor
/// has stopped.
#[derive(Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Applies any [`Command`] and returns the transition it caused.
    pub async fn send(&self, command: Command) -> Result<Transition, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(EngineCommand::Play {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::Unavailable)?;
        reply_rx.await.map_err(|_| EngineError::Unavailable)?
    }

    pub async fn start_game(&self) -> Result<Transition, EngineError> {
        self.send(Command::StartGame).await
    }

    pub async fn new_game(&self) -> Result<Transition, EngineError> {
        self.send(Command::NewGame).await
    }

    /// Submits a word for the turn identified by `epoch`, usually the
    /// epoch of the last snapshot the player saw.
    pub async fn submit_word(
        &self,
        text: impl Into<String>,
        epoch: TurnEpoch,
    ) -> Result<Transition, EngineError> {
        self.send(Command::SubmitWord {
            text: text.into(),
            epoch,
        })
        .await
    }

    pub async fn pass_turn(&self) -> Result<Transition, EngineError> {
        self.send(Command::PassTurn).await
    }

    pub async fn randomize_start_letter(&self) -> Result<Transition, EngineError> {
        self.send(Command::RandomizeStartLetter).await
    }

    pub async fn rename_player(
        &self,
        seat: Seat,
        name: impl Into<String>,
    ) -> Result<Transition, EngineError> {
        self.send(Command::RenamePlayer {
            seat,
            name: name.into(),
        })
        .await
    }

    /// Registers `sender` for events. The current snapshot is sent first.
    pub async fn subscribe(&self, sender: EventSender) -> Result<(), EngineError> {
        self.sender
            .send(EngineCommand::Subscribe { sender })
            .await
            .map_err(|_| EngineError::Unavailable)
    }

    /// Current game state.
    pub async fn snapshot(&self) -> Result<GameState, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(EngineCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| EngineError::Unavailable)?;
        reply_rx.await.map_err(|_| EngineError::Unavailable)
    }

    /// Stops the engine and its clock. Lookups still in flight are dropped.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.sender
            .send(EngineCommand::Shutdown)
            .await
            .map_err(|_| EngineError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and spawns an engine.
///
/// ```no_run
/// # async fn demo(gateway: shiritori_dictionary::FreeDictionaryClient) {
/// use shiritori_engine::{EngineBuilder, GameConfig};
///
/// let engine = EngineBuilder::new()
///     .config(GameConfig::default())
///     .spawn(gateway);
/// engine.start_game().await.unwrap();
/// # }
/// ```
pub struct EngineBuilder {
    config: GameConfig,
    letters: Option<Box<dyn LetterSource>>,
    channel_size: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            letters: None,
            channel_size: 64,
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Source of start letters. Defaults to an OS-seeded RNG.
    pub fn letters(mut self, letters: impl LetterSource) -> Self {
        self.letters = Some(Box::new(letters));
        self
    }

    /// Capacity of the command channel. Senders wait when it is full.
    pub fn channel_size(mut self, size: usize) -> Self {
        self.channel_size = size.max(1);
        self
    }

    /// Spawns the actor on the current Tokio runtime.
    pub fn spawn<D: DictionaryGateway>(self, gateway: D) -> EngineHandle {
        let letters = self
            .letters
            .unwrap_or_else(|| Box::new(RngLetters::from_os_rng()));
        let game = Game::new(self.config, letters);

        let (sender, commands) = mpsc::channel(self.channel_size);
        let (clock_tx, clock_rx) = mpsc::unbounded_channel();

        let actor = EngineActor {
            game,
            gateway: Arc::new(gateway),
            clock: None,
            clock_tx,
            clock_rx,
            lookups: JoinSet::new(),
            subscribers: Vec::new(),
            commands,
        };
        tokio::spawn(actor.run());

        EngineHandle { sender }
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct EngineActor<D> {
    game: Game,
    gateway: Arc<D>,
    /// Clock for the live epoch, if a turn is open.
    clock: Option<TurnClock>,
    clock_tx: mpsc::UnboundedSender<ClockSignal>,
    clock_rx: mpsc::UnboundedReceiver<ClockSignal>,
    lookups: JoinSet<Verdict>,
    subscribers: Vec<EventSender>,
    commands: mpsc::Receiver<EngineCommand>,
}

impl<D: DictionaryGateway> EngineActor<D> {
    async fn run(mut self) {
        info!(epoch = %self.game.epoch(), "engine started");

        loop {
            tokio::select! {
                cmd = self.commands.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                Some(signal) = self.clock_rx.recv() => {
                    self.handle_clock(signal);
                }
                Some(joined) = self.lookups.join_next() => match joined {
                    Ok(verdict) => self.handle_verdict(verdict),
                    // The clock still runs, so the turn ends by timeout.
                    Err(e) => warn!(error = %e, "dictionary lookup task failed"),
                },
            }
        }

        if let Some(mut clock) = self.clock.take() {
            clock.cancel();
        }
        self.lookups.abort_all();
        info!(epoch = %self.game.epoch(), "engine stopped");
    }

    /// Returns `false` when the actor should stop.
    fn handle_command(&mut self, cmd: EngineCommand) -> bool {
        match cmd {
            EngineCommand::Play { command, reply } => {
                debug!(?command, "command received");
                let result = self.game.handle(command);
                match &result {
                    Ok(transition) => self.apply(transition.clone()),
                    Err(e) => debug!(code = e.code(), "command rejected"),
                }
                let _ = reply.send(result);
            }
            EngineCommand::Subscribe { sender } => {
                let snapshot = self.snapshot_event(None);
                if sender.send(snapshot).is_ok() {
                    self.subscribers.push(sender);
                    debug!(subscribers = self.subscribers.len(), "subscriber added");
                }
            }
            EngineCommand::Snapshot { reply } => {
                let _ = reply.send(self.game.state().clone());
            }
            EngineCommand::Shutdown => {
                info!("engine shutting down");
                return false;
            }
        }
        true
    }

    fn handle_clock(&mut self, signal: ClockSignal) {
        match signal {
            ClockSignal::Tick {
                epoch,
                seconds_left,
            } => {
                if epoch == self.game.epoch() {
                    self.broadcast(GameEvent::Clock {
                        epoch,
                        seconds_left,
                    });
                }
            }
            ClockSignal::Expired { epoch } => {
                let transition = self.game.apply_timeout(epoch);
                self.apply(transition);
            }
        }
    }

    fn handle_verdict(&mut self, verdict: Verdict) {
        let transition = self.game.apply_lookup(verdict.epoch, verdict.result);
        self.apply(transition);
    }

    /// Carries out what the game asked for, then tells the subscribers.
    fn apply(&mut self, transition: Transition) {
        if transition.restarts_clock() {
            self.restart_clock();
        }
        match transition {
            Transition::TurnStarted | Transition::Updated => {
                self.broadcast(self.snapshot_event(None));
            }
            Transition::Resolved(resolution) => {
                self.broadcast(self.snapshot_event(Some(resolution.notice)));
            }
            Transition::LookupNeeded { word, epoch } => {
                self.spawn_lookup(word, epoch);
                self.broadcast(self.snapshot_event(Some(VALIDATING_NOTICE.to_string())));
            }
            Transition::Stale => {}
        }
    }

    /// Cancels the clock of the turn that just ended and arms one for
    /// the live epoch.
    fn restart_clock(&mut self) {
        if let Some(mut old) = self.clock.take() {
            debug!(old = %old.epoch(), live = %self.game.epoch(), "re-arming turn clock");
            old.cancel();
        }
        self.clock = Some(TurnClock::start(
            self.game.config().clock_config(),
            self.game.epoch(),
            self.clock_tx.clone(),
        ));
    }

    fn spawn_lookup(&mut self, word: String, epoch: TurnEpoch) {
        let gateway = Arc::clone(&self.gateway);
        debug!(%epoch, %word, "dictionary lookup started");
        self.lookups.spawn(async move {
            let result = gateway.lookup(&word).await;
            Verdict { epoch, result }
        });
    }

    fn snapshot_event(&self, notice: Option<String>) -> GameEvent {
        GameEvent::Snapshot {
            state: self.game.state().clone(),
            notice,
        }
    }

    /// Sends to every subscriber, dropping the ones that hung up.
    fn broadcast(&mut self, event: GameEvent) {
        self.subscribers
            .retain(|sender| sender.send(event.clone()).is_ok());
    }
}
