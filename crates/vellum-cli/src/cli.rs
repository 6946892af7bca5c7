use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vellum",
    about = "Vellum: per-client object retrieval server",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// List a client's indexed objects
    List(ListArgs),
    /// Stream an object to stdout
    Cat(CatArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Listen address, overrides the config file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Data root, overrides the config file
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    pub client: String,
    #[arg(long, default_value = "./data")]
    pub root: PathBuf,
}

#[derive(Args)]
pub struct CatArgs {
    pub client: String,
    pub object_id: String,
    #[arg(long, default_value = "./data")]
    pub root: PathBuf,
    /// Print the object headers to stderr before the body
    #[arg(long)]
    pub headers: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_cat() {
        let cli = Cli::parse_from([
            "vellum",
            "cat",
            "acme",
            "6f1c2b0e-8d4a-4c55-9a1e-3b7f0c9d2e11",
            "--headers",
        ]);
        match cli.command {
            Command::Cat(args) => {
                assert_eq!(args.client, "acme");
                assert!(args.headers);
                assert_eq!(args.root, PathBuf::from("./data"));
            }
            _ => panic!("expected cat"),
        }
    }

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::parse_from(["vellum", "serve", "--bind", "0.0.0.0:9000", "--root", "/srv"]);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.bind.unwrap().port(), 9000);
                assert_eq!(args.root.unwrap(), PathBuf::from("/srv"));
                assert!(args.config.is_none());
            }
            _ => panic!("expected serve"),
        }
    }
}
