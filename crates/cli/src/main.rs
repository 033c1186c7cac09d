use clap::{Parser, Subcommand};
use filestore_core::constants::{METADATA_PATH_ENV, STORAGE_DIR_ENV};
use filestore_core::{
    open_files_service, resolve_media_type, CoreConfig, FileNameUpdate, FilesService,
    ListRequest, NonEmptyText, UploadedFile,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "filestore")]
#[command(about = "filestore command line client")]
struct Cli {
    /// Directory holding the blobs
    #[arg(long, global = true, env = STORAGE_DIR_ENV)]
    storage_dir: Option<String>,
    /// Metadata JSON file
    #[arg(long, global = true, env = METADATA_PATH_ENV)]
    metadata_path: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a local file
    Upload {
        /// File to upload
        path: PathBuf,
        /// Media type (sniffed from the content when omitted)
        #[arg(long)]
        mime: Option<String>,
        /// Original name to record instead of the path's file name
        #[arg(long)]
        name: Option<String>,
    },
    /// Write a stored file's bytes to disk
    Download {
        id: String,
        /// Destination path
        out: PathBuf,
    },
    /// Show a file's metadata
    Info { id: String },
    /// List stored files in upload order
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 10)]
        page_size: i64,
    },
    /// Change a file's display name
    Rename { id: String, name: String },
    /// Delete a file and its metadata
    Delete { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let cfg = CoreConfig::from_values(cli.storage_dir, cli.metadata_path)?;
    let service = open_files_service(&cfg).await?;

    let output = execute(&service, cli.command).await?;
    println!("{}", output);
    Ok(())
}

/// Runs one subcommand and returns what should be printed.
async fn execute(service: &FilesService, command: Commands) -> Result<String, Box<dyn Error>> {
    let output = match command {
        Commands::Upload { path, mime, name } => {
            let content = tokio::fs::read(&path)
                .await
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            let original_name = match name {
                Some(name) => name,
                None => path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| format!("{} has no file name", path.display()))?,
            };
            let media = resolve_media_type(mime.as_deref(), &content);

            let view = service
                .upload(UploadedFile::new(original_name, content, media.into_inner()))
                .await?;
            serde_json::to_string_pretty(&view)?
        }
        Commands::Download { id, out } => {
            let file = service.download(&id).await?;
            tokio::fs::write(&out, &file.content)
                .await
                .map_err(|e| format!("cannot write {}: {}", out.display(), e))?;
            format!(
                "Wrote {} bytes ({}) to {}",
                file.content.len(),
                file.mimetype,
                out.display()
            )
        }
        Commands::Info { id } => serde_json::to_string_pretty(&service.get_metadata(&id).await?)?,
        Commands::List { page, page_size } => {
            let files = service.list(ListRequest { page_size, page }).await?;
            if files.is_empty() {
                "No files found.".to_owned()
            } else {
                serde_json::to_string_pretty(&files)?
            }
        }
        Commands::Rename { id, name } => {
            let name = NonEmptyText::new(name)?;
            let view = service
                .update_metadata(FileNameUpdate {
                    id,
                    name: name.into_inner(),
                })
                .await?;
            serde_json::to_string_pretty(&view)?
        }
        Commands::Delete { id } => {
            service.delete(&id).await?;
            format!("Deleted {}", id)
        }
    };

    Ok(output)
}
