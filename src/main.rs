//! bayes-sift CLI: train and query a Bayesian text classifier stored in a file.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use bayes_sift::{Classifier, ClassifierConfig};

#[derive(Parser)]
#[command(name = "bayes-sift", version, about = "Bayesian text classifier")]
struct Cli {
    /// Model file.
    #[arg(long, global = true, default_value = "model.bayes")]
    model: PathBuf,

    /// TOML config file (categories, scoring, training, extractor).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, untrained model file.
    Init {
        /// Category to create (repeatable); added to those in the config.
        #[arg(long = "category", short = 'c')]
        categories: Vec<String>,

        /// Overwrite an existing model file.
        #[arg(long)]
        force: bool,
    },

    /// Add a category. Re-adding an existing one discards its training.
    AddCategory { name: String },

    /// Train a document into a category.
    Train {
        category: String,
        #[command(flatten)]
        input: DocumentInput,
    },

    /// Remove a previously trained document from a category.
    Untrain {
        category: String,
        #[command(flatten)]
        input: DocumentInput,
    },

    /// Print the best category for a document.
    Classify {
        #[command(flatten)]
        input: DocumentInput,
    },

    /// Print naive log-probability scores, best first.
    Scores {
        #[command(flatten)]
        input: DocumentInput,
    },

    /// Print weighted document probability times prior, per category.
    Probabilities {
        #[command(flatten)]
        input: DocumentInput,
    },

    /// Print Fisher membership scores, per category.
    Fisher {
        #[command(flatten)]
        input: DocumentInput,
    },

    /// List categories.
    Categories,

    /// Show per-category training statistics.
    Info,

    /// Export the model as JSON.
    Export,
}

/// Document text: `--text`, `--file`, or standard input.
#[derive(Args)]
struct DocumentInput {
    /// Document text.
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// File holding the document text.
    #[arg(long)]
    file: Option<PathBuf>,
}

impl DocumentInput {
    fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(file)) => std::fs::read_to_string(file).into_diagnostic(),
            (None, None) => std::io::read_to_string(std::io::stdin()).into_diagnostic(),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ClassifierConfig> {
    Ok(match path {
        Some(path) => ClassifierConfig::load(path)?,
        None => ClassifierConfig::default(),
    })
}

/// Build a classifier from config and restore the model file into it.
fn open(cli: &Cli) -> Result<Classifier> {
    if !cli.model.exists() {
        miette::bail!(
            help = "run `bayes-sift init --category <name>` first",
            "no model at {}",
            cli.model.display()
        );
    }
    let config = load_config(cli.config.as_deref())?;
    let mut classifier = Classifier::from_config(&config)?;
    classifier.restore_file(&cli.model)?;
    Ok(classifier)
}

fn print_scores<'a>(scores: impl IntoIterator<Item = (&'a bayes_sift::Category, &'a f64)>) {
    for (category, score) in scores {
        println!("  {category}: {score:.6}");
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { categories, force } => {
            if cli.model.exists() && !force {
                miette::bail!(
                    help = "pass --force to overwrite it",
                    "model {} already exists",
                    cli.model.display()
                );
            }
            let mut config = load_config(cli.config.as_deref())?;
            config.categories.extend(categories.iter().cloned());
            let classifier = Classifier::from_config(&config)?;
            classifier.save(&cli.model)?;
            println!(
                "Initialized {} with {} categories",
                cli.model.display(),
                classifier.categories().len()
            );
        }

        Commands::AddCategory { name } => {
            let mut classifier = open(&cli)?;
            let (category, reset) = classifier.add_category(name);
            classifier.save(&cli.model)?;
            if reset {
                println!("Reset category \"{category}\"");
            } else {
                println!("Added category \"{category}\"");
            }
        }

        Commands::Train { category, input } => {
            let mut classifier = open(&cli)?;
            classifier.train(category, &input.read()?)?;
            classifier.save(&cli.model)?;
        }

        Commands::Untrain { category, input } => {
            let mut classifier = open(&cli)?;
            classifier.untrain(category, &input.read()?)?;
            classifier.save(&cli.model)?;
        }

        Commands::Classify { input } => {
            let classifier = open(&cli)?;
            println!("{}", classifier.classify(&input.read()?)?);
        }

        Commands::Scores { input } => {
            let classifier = open(&cli)?;
            let ranked = classifier.ranked_scores(&input.read()?)?;
            println!("Naive scores:");
            print_scores(ranked.iter().map(|(c, s)| (c, s)));
        }

        Commands::Probabilities { input } => {
            let classifier = open(&cli)?;
            println!("Probabilities:");
            print_scores(&classifier.probabilities(&input.read()?)?);
        }

        Commands::Fisher { input } => {
            let classifier = open(&cli)?;
            println!("Fisher probabilities:");
            print_scores(&classifier.fisher_probabilities(&input.read()?)?);
        }

        Commands::Categories => {
            let classifier = open(&cli)?;
            for category in classifier.categories() {
                println!("{category}");
            }
        }

        Commands::Info => {
            let classifier = open(&cli)?;
            let store = classifier.store();
            println!("Model: {}", cli.model.display());
            println!("  documents: {}", store.total_documents());
            println!("  words:     {}", store.total_words());
            if let Some(vocabulary) = classifier.vocabulary() {
                println!("  vocabulary: {} words", vocabulary.len());
            }
            println!("Categories ({}):", store.len());
            for s in classifier.summary() {
                println!(
                    "  {}: {} documents, {} words, {} distinct features (prior {:.4})",
                    s.category,
                    s.documents,
                    s.words,
                    s.distinct_features,
                    store.category_prior(s.category.as_str())
                );
            }
        }

        Commands::Export => {
            let classifier = open(&cli)?;
            println!("{}", classifier.export_json()?);
        }
    }

    Ok(())
}
