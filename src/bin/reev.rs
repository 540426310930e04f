//! reev - reevd CLI client
//!
//! Create, inspect and modify posts on a running reevd.

use clap::{Parser, Subcommand};
use reev::client::ServiceClient;
use reev::{
    CreateRequest, DeleteRequest, NewPost, Post, PostApi, ReadAllRequest, ReadRequest,
    UpdateRequest,
};

/// Reev CLI client
#[derive(Parser)]
#[command(name = "reev")]
#[command(version = reev::PKG_VERSION)]
#[command(about = "Reev post service client")]
struct Args {
    /// Server address
    #[arg(short, long, env = "REEVD_ADDRESS", default_value = "http://127.0.0.1:9090")]
    address: String,

    /// API version to request (empty: whatever the server implements)
    #[arg(long, default_value = reev::API_VERSION)]
    api: String,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a post
    Create {
        /// Post title
        title: String,
        /// Post description
        description: String,
    },

    /// Show one post
    Read {
        /// Post id
        id: i64,
    },

    /// Replace title and description of a post
    Update {
        /// Post id
        id: i64,
        /// New title
        title: String,
        /// New description
        description: String,
    },

    /// Delete a post
    Delete {
        /// Post id
        id: i64,
    },

    /// List all posts
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let client = ServiceClient::connect(&args.address).await?;
    let api = args.api;

    match args.command {
        Command::Create { title, description } => {
            let response = client
                .create(CreateRequest {
                    api,
                    post: NewPost::new(title, description),
                })
                .await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("created post {}", response.id);
            }
        }

        Command::Read { id } => {
            let response = client.read(ReadRequest { api, id }).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response.post)?);
            } else {
                print_post(&response.post);
            }
        }

        Command::Update {
            id,
            title,
            description,
        } => {
            let response = client
                .update(UpdateRequest {
                    api,
                    post: Post::new(id, title, description),
                })
                .await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("updated {} post(s)", response.updated);
            }
        }

        Command::Delete { id } => {
            let response = client.delete(DeleteRequest { api, id }).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("deleted {} post(s)", response.deleted);
            }
        }

        Command::List => {
            let response = client.read_all(ReadAllRequest { api }).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response.posts)?);
            } else if response.posts.is_empty() {
                println!("no posts");
            } else {
                for post in &response.posts {
                    print_post(post);
                }
            }
        }
    }

    Ok(())
}

fn print_post(post: &Post) {
    println!("[{}] {}", post.id, post.title);
    println!("    {}", post.description);
}
