use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod ask;
pub mod coach;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Ask for help once and print the reply
    Ask {
        /// Base URL of a running server
        #[arg(long, default_value = "http://127.0.0.1:2222")]
        url: String,

        /// File containing the code snippet
        #[arg(long)]
        code_file: Option<String>,

        /// What you are stuck on
        #[arg(long)]
        ask: Option<String>,

        /// Image file or http(s) URL, can be repeated
        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// Start an interactive coaching session
    Coach {
        /// Base URL of a running server
        #[arg(long, default_value = "http://127.0.0.1:2222")]
        url: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Ask {
            url,
            code_file,
            ask,
            images,
        }) => {
            ask::run(url, code_file, ask, images).await?;
        }
        Some(Command::Coach { url }) => {
            coach::run(url).await?;
        }
        None => {}
    }

    Ok(())
}
