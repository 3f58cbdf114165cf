use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use dice_roller::{Engine, Error, RandomSource, RngSource, Session, SessionRoll, Settings};


/// Roll dice expressions such as `2d6 + 3` or `(4d6, drop lowest 1)`
#[derive(Parser, Debug)]
#[command(name = "dice-roller")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Expressions to roll; reads them from stdin when none are given
    expressions: Vec<String>,

    /// Seed for reproducible rolls
    #[arg(short, long, env = "DICE_ROLLER_SEED")]
    seed: Option<u64>,

    /// Settings file (TOML)
    #[arg(short, long, env = "DICE_ROLLER_CONFIG")]
    config: Option<PathBuf>,

    /// Debug output, repeat for more (-d -d)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}


fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let mut roller = Roller { engine: settings.engine(), session: settings.session(), settings };
    let ok = match cli.seed {
        Some(seed) => roller.run(&cli.expressions, &mut RngSource::new(StdRng::seed_from_u64(seed))),
        None => roller.run(&cli.expressions, &mut RngSource::thread()),
    };

    if !ok {
        process::exit(1);
    }
}

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Nothing,
    Quit,
    Reroll,
    History,
    Clear,
    Favorites,
    /// `:fav` alone saves the last expression.
    AddFavorite(Option<String>),
    RemoveFavorite(String),
    Roll(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        match word {
            "" => Command::Nothing,
            ":q" | ":quit" => Command::Quit,
            "!!" => Command::Reroll,
            ":history" => Command::History,
            ":clear" => Command::Clear,
            ":favorites" => Command::Favorites,
            ":fav" if rest.is_empty() => Command::AddFavorite(None),
            ":fav" => Command::AddFavorite(Some(rest.to_string())),
            ":unfav" => Command::RemoveFavorite(rest.to_string()),
            _ => Command::Roll(line.to_string()),
        }
    }
}

struct Roller {
    settings: Settings,
    engine: Engine,
    session: Session,
}

impl Roller {
    fn run<R: RandomSource>(&mut self, expressions: &[String], rng: &mut R) -> bool {
        if expressions.is_empty() {
            self.interactive(rng);
            return true;
        }

        let mut ok = true;
        for expression in expressions {
            let result = self.session.roll(expression, &self.engine, rng);
            ok &= self.show(result);
        }
        ok
    }

    fn interactive<R: RandomSource>(&mut self, rng: &mut R) {
        prompt();

        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };

            match Command::parse(&line) {
                Command::Nothing => {}
                Command::Quit => break,
                Command::Reroll => {
                    let result = self.session.reroll_last(&self.engine, rng);
                    self.show(result);
                }
                Command::History => {
                    for entry in self.session.history() {
                        println!("{} = {}", entry.expression, entry.total);
                    }
                }
                Command::Clear => {
                    self.session.clear_history();
                    println!("* Roll history cleared. *");
                }
                Command::Favorites => {
                    for (i, favorite) in self.session.favorites().iter().enumerate() {
                        println!("{}. {favorite}", i + 1);
                    }
                }
                Command::AddFavorite(expression) => {
                    let expression = expression.or_else(|| self.session.last_expression().map(str::to_string));
                    match self.session.add_favorite(expression.as_deref().unwrap_or_default()) {
                        Ok(true) => println!("* Added to favorites. *"),
                        Ok(false) => println!("* Already a favorite. *"),
                        Err(e) => eprintln!("Error: {e}"),
                    }
                }
                Command::RemoveFavorite(expression) => {
                    if self.session.remove_favorite(&expression) {
                        println!("* Removed from favorites. *");
                    } else {
                        eprintln!("Error: not a favorite: {expression}");
                    }
                }
                Command::Roll(expression) => {
                    let result = self.session.roll(&expression, &self.engine, rng);
                    self.show(result);
                }
            }

            prompt();
        }
    }

    fn show(&self, result: Result<SessionRoll, Error>) -> bool {
        match result {
            Ok(roll) => {
                if roll.history_cleared {
                    println!("* Roll history cleared after {} rolls. *", self.settings.clear_after);
                }
                println!("{}\n", roll.outcome.report());
                true
            }
            Err(e) => {
                eprintln!("Error: {e}");
                false
            }
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG wins over -d when set
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
    tracing::debug!(?level, "logging initialised");
}
