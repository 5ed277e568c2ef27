use pico_args::Arguments;
use shiritori::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

const HELP: &str = "\
Play Shiritori in a terminal

USAGE:
  shiritori-console [OPTIONS]

OPTIONS:
  --turn-seconds   N      Seconds per turn                 [default: 15]
  --min-length     N      Fewest letters a word may have   [default: 4]
  --seed           N      Seed for start letters           [default: random]
  --player1        NAME   First player's name              [default: Player 1]
  --player2        NAME   Second player's name             [default: Player 2]
  --dictionary-url URL    Dictionary endpoint              [default: dictionaryapi.dev]

FLAGS:
  -h, --help              Print help information

COMMANDS (while playing):
  /start  /new  /pass  /random  /name 1|2 NAME  /help  /quit
  anything else is submitted as a word
";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Start,
    New,
    Pass,
    Random,
    Rename(Seat, String),
    Help,
    Quit,
    Word(String),
}

/// Parses one line typed by a player. Blank lines are ignored.
fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Input::Word(line.to_string())));
    };

    let (cmd, arg) = rest.split_once(' ').unwrap_or((rest, ""));
    let input = match cmd {
        "start" => Input::Start,
        "new" => Input::New,
        "pass" => Input::Pass,
        "random" => Input::Random,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        "name" => {
            let (seat, name) = arg.trim().split_once(' ').ok_or("usage: /name 1|2 NAME")?;
            let seat = match seat {
                "1" => Seat::First,
                "2" => Seat::Second,
                other => return Err(format!("no player {other}, use 1 or 2")),
            };
            Input::Rename(seat, name.trim().to_string())
        }
        other => return Err(format!("unknown command /{other}")),
    };
    Ok(Some(input))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn render_snapshot(state: &GameState, notice: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(notice) = notice {
        out.push_str(notice);
        out.push('\n');
    }

    let [p1, p2] = &state.players;
    out.push_str(&format!(
        "{}: {}  |  {}: {}\n",
        p1.name, p1.score, p2.name, p2.score
    ));

    match state.phase {
        Phase::NotStarted => {
            out.push_str(&format!(
                "Start letter is '{}'. Type /start to play.",
                state.required_letter
            ));
        }
        Phase::Validating => out.push_str("Checking the dictionary..."),
        Phase::AwaitingInput => {
            if let Some(entry) = state.history.last() {
                if let (Some(word), Some(definition)) = (&entry.word, &entry.definition) {
                    match &entry.phonetic {
                        Some(phonetic) => {
                            out.push_str(&format!("{word} {phonetic}: {definition}\n"))
                        }
                        None => out.push_str(&format!("{word}: {definition}\n")),
                    }
                }
            }
            out.push_str(&format!(
                "{}, your word starting with '{}':",
                state.current_player().name,
                state.required_letter
            ));
        }
        Phase::Ended => out.push_str("Game over."),
    }
    out
}

/// Prints events as they arrive and keeps `epoch` pointed at the live turn.
async fn print_events(
    mut events: mpsc::UnboundedReceiver<GameEvent>,
    epoch: watch::Sender<TurnEpoch>,
) {
    while let Some(event) = events.recv().await {
        match event {
            GameEvent::Snapshot { state, notice } => {
                epoch.send_replace(state.epoch);
                println!("\n{}", render_snapshot(&state, notice.as_deref()));
            }
            GameEvent::Clock { seconds_left, .. } => {
                if seconds_left <= 5 || seconds_left % 5 == 0 {
                    println!("  ({seconds_left}s left)");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

struct Args {
    config: GameConfig,
    seed: Option<u64>,
    dictionary: DictionaryConfig,
}

fn parse_args(mut pargs: Arguments) -> Result<Args, pico_args::Error> {
    let defaults = GameConfig::default();
    let [player1, player2] = defaults.player_names.clone();

    let config = GameConfig {
        turn_seconds: pargs
            .opt_value_from_str("--turn-seconds")?
            .unwrap_or(defaults.turn_seconds),
        min_word_length: pargs
            .opt_value_from_str("--min-length")?
            .unwrap_or(defaults.min_word_length),
        player_names: [
            pargs.opt_value_from_str("--player1")?.unwrap_or(player1),
            pargs.opt_value_from_str("--player2")?.unwrap_or(player2),
        ],
        ..defaults
    };
    let seed = pargs.opt_value_from_str("--seed")?;

    let mut dictionary = DictionaryConfig::default().covering_turn(config.turn_seconds);
    if let Some(url) = pargs.opt_value_from_str("--dictionary-url")? {
        dictionary.base_url = url;
    }

    Ok(Args {
        config,
        seed,
        dictionary,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }
    let args = parse_args(pargs)?;

    shiritori::logging::init();
    tracing::info!(
        turn_seconds = args.config.turn_seconds,
        min_length = args.config.min_word_length,
        dictionary = %args.dictionary.base_url,
        "starting console"
    );

    let gateway = FreeDictionaryClient::new(args.dictionary)?;
    let builder = EngineBuilder::new().config(args.config);
    let builder = match args.seed {
        Some(seed) => builder.letters(RngLetters::seeded(seed)),
        None => builder,
    };
    let engine = builder.spawn(gateway);

    let (epoch_tx, epoch_rx) = watch::channel(TurnEpoch::default());
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    engine.subscribe(events_tx).await?;
    tokio::spawn(print_events(events_rx, epoch_tx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(msg) => {
                println!("! {msg}");
                continue;
            }
        };

        let result = match input {
            Input::Start => engine.start_game().await,
            Input::New => engine.new_game().await,
            Input::Pass => engine.pass_turn().await,
            Input::Random => engine.randomize_start_letter().await,
            Input::Rename(seat, name) => engine.rename_player(seat, name).await,
            Input::Word(word) => {
                let epoch = *epoch_rx.borrow();
                engine.submit_word(word, epoch).await
            }
            Input::Help => {
                print!("{HELP}");
                continue;
            }
            Input::Quit => break,
        };

        if let Err(e) = result {
            println!("! {e}");
        }
    }

    engine.shutdown().await?;
    Ok(())
}
