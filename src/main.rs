use clap::{Parser, Subcommand};
use dbgqubo::cli;
use dbgqubo::error::DbgQuboError;
use dbgqubo::qubo::QuboWeights;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "QUBO encoding of assembly graph path problems")]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the assembly graph and print its statistics
    Info {
        /// Segment/link record file
        input: PathBuf,
    },
    /// Encode the graph as a QUBO matrix and write it as JSON
    Qubo {
        input: PathBuf,
        /// Output matrix file
        #[clap(short, long, default_value = "qubo.json")]
        output: PathBuf,
        /// Scale of the edge weight term
        #[clap(long, default_value_t = 10.0)]
        delta: f64,
        /// Out-degree penalty
        #[clap(long, default_value_t = 1.0)]
        alpha: f64,
        /// In-degree penalty
        #[clap(long, default_value_t = 1.0)]
        beta: f64,
        /// Flow conservation penalty
        #[clap(long, default_value_t = 5.0)]
        gamma: f64,
        /// Designated start node (name, e.g. S1 or cS1)
        #[clap(long)]
        start: Option<String>,
        /// Designated finish node
        #[clap(long)]
        finish: Option<String>,
    },
    /// Greedy first-neighbor walk from a start node
    Greedy {
        input: PathBuf,
        /// Start node name
        #[clap(short, long)]
        start: String,
        /// Overlap length used when stitching sequences
        #[clap(short, long, default_value_t = 0)]
        kmer: usize,
    },
    /// Exhaustive longest simple path search
    Longest {
        input: PathBuf,
        /// Start node name (path leaves this node)
        #[clap(short, long)]
        start: Option<String>,
        /// Finish node name (path ends at this node)
        #[clap(short, long)]
        finish: Option<String>,
        /// Score paths by reconstructed sequence length instead of node count
        #[clap(long)]
        by_length: bool,
        #[clap(short, long, default_value_t = 0)]
        kmer: usize,
    },
    /// Decompose the graph at its bridge nodes
    Decompose { input: PathBuf },
    /// Turn a solver bit vector into a path and its DNA sequence
    Interpret {
        input: PathBuf,
        /// File holding the solver's 0/1 bit string
        bits: PathBuf,
        /// QUBO matrix artifact; when given, the solution's energy is reported
        #[clap(short, long)]
        matrix: Option<PathBuf>,
        #[clap(short, long, default_value_t = 0)]
        kmer: usize,
    },
}

fn main() -> Result<(), DbgQuboError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();
    match opts.command {
        Command::Info { input } => cli::info_cmd(input),
        Command::Qubo {
            input,
            output,
            delta,
            alpha,
            beta,
            gamma,
            start,
            finish,
        } => {
            let weights = QuboWeights {
                delta,
                alpha,
                beta,
                gamma,
            };
            cli::qubo_cmd(input, weights, start.as_deref(), finish.as_deref(), output)
        }
        Command::Greedy { input, start, kmer } => cli::greedy_cmd(input, &start, kmer),
        Command::Longest {
            input,
            start,
            finish,
            by_length,
            kmer,
        } => cli::longest_cmd(input, start.as_deref(), finish.as_deref(), by_length, kmer),
        Command::Decompose { input } => cli::decompose_cmd(input),
        Command::Interpret {
            input,
            bits,
            matrix,
            kmer,
        } => cli::interpret_cmd(input, bits, matrix, kmer),
    }
}
