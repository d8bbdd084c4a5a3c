//! Command-line front end: generate one maze, draw it and optionally export it

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mazeweave::{
    config::{
        DEFAULT_BRAID_PERCENTAGE, DEFAULT_EXPORT_FILE, DEFAULT_HEIGHT, DEFAULT_LOG_DIR,
        DEFAULT_LOG_FILE, DEFAULT_WIDTH,
    },
    generators::{Generator, Params, generate_maze, get_rng},
};
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GeneratorKind {
    RecurBacktrack,
    HuntAndKill,
    Labyrinth,
    Room,
    Passage,
    Spiral,
    Frontier,
    Braid,
    LongPath,
    EvenBacktrack,
}

#[derive(Parser)]
#[command(name = "mazeweave")]
#[command(author, version, about = "Generate grid mazes in the terminal")]
struct Cli {
    /// Maze width in cells
    #[arg(short = 'W', long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Maze height in cells
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Generation algorithm
    #[arg(short, long, value_enum, default_value_t = GeneratorKind::RecurBacktrack)]
    generator: GeneratorKind,

    /// Random seed for reproducible mazes
    #[arg(short, long)]
    seed: Option<u64>,

    /// Share of dead ends removed by the braid generator, between 0 and 1
    #[arg(short, long, default_value_t = DEFAULT_BRAID_PERCENTAGE)]
    percentage: f64,

    /// Turn spirals counter-clockwise
    #[arg(long)]
    counter_clockwise: bool,

    /// Write the maze as a bit grid
    #[arg(short, long, value_name = "PATH", num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
    export: Option<PathBuf>,

    /// Do not draw the maze
    #[arg(long)]
    no_render: bool,

    /// Log debug details
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn generator(&self) -> Generator {
        let corners = vec![
            (0, 0),
            (0, self.height.saturating_sub(1)),
            (self.width.saturating_sub(1), self.height.saturating_sub(1)),
            (self.width.saturating_sub(1), 0),
        ];
        match self.generator {
            GeneratorKind::RecurBacktrack => Generator::RecurBacktrack,
            GeneratorKind::HuntAndKill => Generator::HuntAndKill,
            GeneratorKind::Labyrinth => Generator::Labyrinth,
            GeneratorKind::Room => Generator::Room,
            GeneratorKind::Passage => Generator::Passage {
                start: Some(corners[0]),
                end: Some(corners[2]),
            },
            GeneratorKind::Spiral => Generator::Spiral {
                exits: corners,
                clockwise: !self.counter_clockwise,
            },
            GeneratorKind::Frontier => Generator::Frontier,
            GeneratorKind::Braid => Generator::Braid {
                base: Box::new(Generator::RecurBacktrack),
                percentage: self.percentage,
            },
            GeneratorKind::LongPath => Generator::LongPath { cancel: None },
            GeneratorKind::EvenBacktrack => Generator::EvenBacktrack,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let file_appender = tracing_appender::rolling::never(DEFAULT_LOG_DIR, DEFAULT_LOG_FILE);
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let generator = cli.generator();
    let mut rng = get_rng(cli.seed);
    let carved = generate_maze(cli.width, cli.height, &generator, Params::default(), &mut rng)
        .inspect_err(|e| tracing::error!("[main] generation failed: {}", e))?;

    if !cli.no_render {
        carved.maze.render()?;
    }
    if let Some(path) = &cli.export {
        carved.maze.export(path)?;
    }
    Ok(())
}
