use chrono::Utc;
use clap::{Args, Subcommand};
use lacto_core::codec::export_file_name;
use lacto_core::{FermentLedger, FileStore};
use std::fs;
use std::path::{Path, PathBuf};

use super::confirm;

#[derive(Args)]
pub struct DataCommand {
    #[command(subcommand)]
    pub command: DataSubcommand,
}

#[derive(Subcommand)]
pub enum DataSubcommand {
    /// Replace every ferment with the contents of an export file
    Import {
        /// JSON file holding an array of ferments
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Write every ferment to a JSON file
    Export {
        /// Output path, or - for stdout (defaults to a timestamped file name)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Remove every stored ferment
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl DataCommand {
    pub fn run(
        &self,
        ledger: &mut FermentLedger<FileStore>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DataSubcommand::Import { file, force } => {
                let json = fs::read_to_string(file)
                    .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;

                if !ledger.is_empty()
                    && !*force
                    && !confirm(&format!(
                        "Replace all {} ferment(s) with the contents of {}?",
                        ledger.len(),
                        file.display()
                    ))?
                {
                    println!("Cancelled.");
                    return Ok(());
                }

                let count = ledger.import_json(&json)?;
                println!("Imported {} ferment(s) from {}", count, file.display());
                Ok(())
            }

            DataSubcommand::Export { output } => {
                let json = ledger.export_json()?;
                match output.as_deref() {
                    Some(path) if path == Path::new("-") => println!("{}", json),
                    _ => {
                        let path = output
                            .clone()
                            .unwrap_or_else(|| PathBuf::from(export_file_name(Utc::now())));
                        fs::write(&path, json)
                            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
                        println!("Exported {} ferment(s) to {}", ledger.len(), path.display());
                    }
                }
                Ok(())
            }

            DataSubcommand::Clear { force } => {
                if !*force
                    && !confirm(&format!("Delete all {} ferment(s)?", ledger.len()))?
                {
                    println!("Cancelled.");
                    return Ok(());
                }

                ledger.clear()?;
                println!("All ferment data cleared.");
                Ok(())
            }
        }
    }
}
