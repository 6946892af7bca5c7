use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use tokio::io::AsyncWriteExt;
use tokio_stream::StreamExt;

use vellum_index::{IndexResolver, JsonIndexResolver};
use vellum_server::{ObjectBody, RetrievalConfig, RetrievalRequest, Retriever, ServerConfig, VellumServer};
use vellum_store::LocalContentStore;
use vellum_types::{http_date_from_epoch, ClientId};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::List(args) => cmd_list(args).await,
        Command::Cat(args) => cmd_cat(args).await,
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(root) = args.root {
        config.data_root = root;
    }
    tracing::debug!(?config, "resolved server config");
    println!(
        "{} Vellum on {} (root: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        config.data_root.display()
    );
    VellumServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let client = ClientId::new(args.client);
    let index = JsonIndexResolver::new(&args.root)
        .lookup(&client)
        .await
        .with_context(|| format!("reading index for {client}"))?;
    if index.is_empty() {
        println!("No objects for {}.", client.to_string().yellow());
        return Ok(());
    }
    for d in &index {
        let date = http_date_from_epoch(d.date).unwrap_or_else(|_| d.date.to_string());
        println!("{}  {}  {}", d.object_id.to_string().yellow(), date.dimmed(), d.title);
    }
    println!("\n{} objects", index.len().to_string().bold());
    Ok(())
}

async fn cmd_cat(args: CatArgs) -> anyhow::Result<()> {
    let retriever = Retriever::new(
        Arc::new(JsonIndexResolver::new(&args.root)),
        Arc::new(LocalContentStore::new(&args.root)),
        RetrievalConfig::immediate(),
    );
    let request = RetrievalRequest::new(args.object_id, Some(ClientId::new(args.client)));
    let retrieval = retriever.retrieve(request).await?;

    if args.headers {
        eprintln!("{} {}", "title:".cyan(), retrieval.headers.title_text());
        eprintln!("{} {}", "date:".cyan(), retrieval.headers.date_text());
    }

    let mut stdout = tokio::io::stdout();
    match retrieval.body {
        ObjectBody::Sample(text) => stdout.write_all(text.as_bytes()).await?,
        ObjectBody::Stream(mut stream) => {
            while let Some(chunk) = stream.next().await {
                stdout.write_all(&chunk?).await?;
            }
        }
    }
    stdout.flush().await?;
    Ok(())
}
