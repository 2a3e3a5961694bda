use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lr1view::{
    api::{ParserResponse, RequestShape},
    grammar::{serialize, validate},
    symbols::SymbolTable,
    view::ResultView,
    ActiveView, GrammarModel, Logger, ViewError, ViewerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "lr1view")]
#[command(about = "Render LR(1) item sets, parsing tables and parse traces", long_about = None)]
struct Args {
    /// Viewer config (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Validate a grammar and print its canonical form
    Check {
        #[arg(value_name = "GRAMMAR")]
        grammar: PathBuf,
    },

    /// Print the request body that would be sent to the producer
    Request {
        #[arg(value_name = "GRAMMAR")]
        grammar: PathBuf,
        /// Input string to parse
        #[arg(short, long, default_value = "")]
        input: String,
        /// Put productions directly under `grammar`
        #[arg(long)]
        flat: bool,
    },

    /// Render a recorded producer response
    Show {
        #[arg(value_name = "RESPONSE")]
        response: PathBuf,
        /// Grammar of the request; decides terminal vs non-terminal
        #[arg(short, long, value_name = "GRAMMAR")]
        grammar: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = ViewArg::All)]
        view: ViewArg,
        /// Show only this step of the simulation (1-based)
        #[arg(short, long)]
        step: Option<usize>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ViewArg {
    Sets,
    Table,
    Simulation,
    All,
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("can't read {}", path.display()))
}

fn load_grammar(path: &Path) -> Result<GrammarModel> {
    let mut model = GrammarModel::new();
    model.set_text(&read_file(path)?);
    model.apply_text()?;
    Ok(model)
}

fn show(
    mut logger: Logger,
    response: &Path,
    grammar: Option<&Path>,
    view: ViewArg,
    step: Option<usize>,
) -> Result<()> {
    let response: ParserResponse = serde_json::from_str(&read_file(response)?)
        .map_err(|e| ViewError::MalformedResponse(e.to_string()))?;
    let symbols = match grammar {
        Some(path) => validate(&read_file(path)?)?.symbols(),
        None => SymbolTable::heuristic(),
    };
    let result = ResultView::new(response, &symbols);
    for diag in result.diagnostics() {
        logger.diagnostic(&diag);
    }

    let mut replay = result.replay();
    if let Some(n) = step {
        if n == 0 {
            bail!("steps are numbered from 1");
        }
        replay.select(n - 1);
    }

    let views = match view {
        ViewArg::Sets => vec![ActiveView::Sets],
        ViewArg::Table => vec![ActiveView::Table],
        ViewArg::Simulation => vec![ActiveView::Simulation],
        ViewArg::All => ActiveView::ALL.to_vec(),
    };
    for v in views {
        println!("== {} ==", v.title());
        if v == ActiveView::Simulation && step.is_none() {
            print!("{}", replay.to_text());
        } else {
            print!("{}", result.render(v, &replay));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };
    let logger = Logger::new(config.buffer_log_level, config.stderr_log_level);

    match args.command {
        Command::Check { grammar } => {
            let grammar = validate(&read_file(&grammar)?)?;
            println!("{}", serialize(&grammar));
        }
        Command::Request {
            grammar,
            input,
            flat,
        } => {
            let mut model = load_grammar(&grammar)?;
            model.set_input(&input);
            let shape = if flat {
                RequestShape::Flat
            } else {
                config.request_shape
            };
            println!("{}", model.request()?.to_json(shape));
        }
        Command::Show {
            response,
            grammar,
            view,
            step,
        } => show(logger, &response, grammar.as_deref(), view, step)?,
    }
    Ok(())
}
