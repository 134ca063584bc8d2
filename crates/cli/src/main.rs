use clap::{Parser, Subcommand};
use medcat_core::{
    config::resolve_catalog_file, CatalogService, Column, CoreConfig, Frequency, LoadOutcome,
    Record, Table, DEFAULT_SUMMARY_LIMIT,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "medcat")]
#[command(about = "Medication catalog CLI")]
struct Cli {
    /// Backing catalog file (overrides MEDCAT_CATALOG_FILE)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all medications
    List,
    /// Show the searchable columns
    Columns,
    /// Search one column for a case-insensitive substring
    Search {
        /// Column header or English name (e.g. Classe, Class)
        column: String,
        /// Text to look for
        term: String,
    },
    /// Add a medication
    Add {
        /// Medication name (required)
        name: String,
        #[arg(long, default_value = "")]
        class: String,
        #[arg(long, default_value = "")]
        indication: String,
        /// Comma-separated reactions
        #[arg(long, default_value = "")]
        adverse_reactions: String,
        #[arg(long, default_value = "")]
        presentation: String,
        #[arg(long, default_value = "")]
        dosage: String,
    },
    /// Import a delimited file (delimiter is detected)
    Import {
        /// File to import
        file: PathBuf,
    },
    /// Most frequent adverse reactions
    TopReactions {
        #[arg(long, default_value_t = DEFAULT_SUMMARY_LIMIT)]
        limit: usize,
    },
    /// Medications per class
    Classes {
        #[arg(long, default_value_t = DEFAULT_SUMMARY_LIMIT)]
        limit: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let catalog_file = resolve_catalog_file(
        cli.catalog
            .or_else(|| std::env::var_os("MEDCAT_CATALOG_FILE").map(PathBuf::from)),
    );
    let service = CatalogService::new(Arc::new(CoreConfig::new(catalog_file)?));

    let Some(command) = cli.command else {
        println!("Use 'medcat --help' for commands");
        return Ok(());
    };

    let outcome = service.load();
    if let LoadOutcome::Defaulted { reason, .. } = &outcome {
        eprintln!(
            "Note: starting with an empty catalog at {} ({:?})",
            service.store().path().display(),
            reason
        );
    }
    let mut table = outcome.into_table();

    match command {
        Commands::List => print_table(&table),
        Commands::Columns => {
            for column in Column::ALL {
                println!("{} ({})", column.header(), column.name());
            }
        }
        Commands::Search { column, term } => match service.search(&table, &column, &term) {
            Ok(found) => print_table(&found),
            Err(e) => eprintln!("Error searching: {}", e),
        },
        Commands::Add {
            name,
            class,
            indication,
            adverse_reactions,
            presentation,
            dosage,
        } => {
            let record = Record {
                medication: name,
                class,
                indication,
                adverse_reactions,
                presentation,
                dosage,
            };
            let medication = record.medication.clone();
            match service.add(&mut table, record) {
                Ok(()) => println!("Added {} ({} medications)", medication, table.len()),
                Err(e) if e.is_recoverable() => eprintln!("Warning: {}", e),
                Err(e) => eprintln!("Error adding medication: {}", e),
            }
        }
        Commands::Import { file } => match service.import_file(&mut table, &file) {
            Ok(summary) => println!(
                "Imported {} rows ({} new, {} duplicates dropped), {} medications in total",
                summary.rows_read,
                summary.rows_added,
                summary.duplicates_dropped,
                summary.total_rows
            ),
            Err(e) if e.is_recoverable() => eprintln!("Warning: {}", e),
            Err(e) => eprintln!("Error importing {}: {}", file.display(), e),
        },
        Commands::TopReactions { limit } => {
            print_frequencies(&service.reaction_frequencies(&table, limit))
        }
        Commands::Classes { limit } => print_frequencies(&service.class_counts(&table, limit)),
    }

    Ok(())
}

fn print_table(table: &Table) {
    if table.is_empty() {
        println!("No results found.");
        return;
    }

    for record in table {
        for column in Column::ALL {
            println!("{}: {}", column.name(), record.get(column));
        }
        println!("---");
    }
}

fn print_frequencies(entries: &[Frequency]) {
    if entries.is_empty() {
        println!("No data.");
        return;
    }

    let width = entries.iter().map(|f| f.label.len()).max().unwrap_or(0);
    for entry in entries {
        println!(
            "{:<width$}  {:>4}  {}",
            entry.label,
            entry.count,
            "#".repeat(entry.count),
            width = width
        );
    }
}
