//! CLI entry point for mdsite

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdsite::commands::new::PostOptions;
use mdsite::commands::render::RenderOutput;
use mdsite::server::ServeOptions;

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(version)]
#[command(about = "Markdown posts to HTML fragments for a small personal site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Add a new post or project
    #[command(subcommand)]
    New(NewCommand),

    /// Render markdown posts to HTML fragments
    #[command(alias = "b")]
    Build {
        /// Ignore the build cache
        #[arg(short, long)]
        force: bool,

        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Render one markdown file to stdout
    Render {
        /// Markdown file
        file: PathBuf,

        /// Keep the leading `# Title` line
        #[arg(long)]
        keep_heading: bool,

        /// Print the front-matter as JSON instead of HTML
        #[arg(short, long)]
        metadata: bool,
    },

    /// List posts or projects
    List {
        /// Type of content to list (posts, projects)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Remove rendered fragments and the build cache
    Clean,

    /// Start a local preview server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
enum NewCommand {
    /// Create posts/<slug>.md and list it in posts.json
    Post {
        /// Title of the new post
        title: String,

        /// Brief description
        #[arg(long)]
        description: Option<String>,

        /// URL slug (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,

        /// Display date (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Overwrite an existing markdown file
        #[arg(short, long)]
        force: bool,
    },

    /// List a project in projects.json
    Project {
        /// Project title
        title: String,

        /// Project URL (GitHub, live demo, etc.)
        #[arg(short, long)]
        url: String,

        /// Brief description
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdsite=debug,info"
    } else {
        "mdsite=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            mdsite::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New(NewCommand::Post {
            title,
            description,
            slug,
            date,
            force,
        }) => {
            let site = mdsite::Site::new(&base_dir)?;
            let options = PostOptions {
                description,
                slug,
                date,
                force,
            };
            let path = mdsite::commands::new::create_post(&site, &title, &options)?;
            println!("Your new post is ready! Edit {:?} to add your content.", path);
        }

        Commands::New(NewCommand::Project {
            title,
            url,
            description,
        }) => {
            let site = mdsite::Site::new(&base_dir)?;
            mdsite::commands::new::create_project(&site, &title, &url, description.as_deref())?;
            println!("Your new project has been added!");
        }

        Commands::Build { force, watch } => {
            let site = mdsite::Site::new(&base_dir)?;
            tracing::info!("Rendering posts...");
            mdsite::commands::build::run_with_options(&site, force)?;

            if watch {
                mdsite::commands::build::watch(&site)?;
            }
        }

        Commands::Render {
            file,
            keep_heading,
            metadata,
        } => {
            let site = mdsite::Site::new(&base_dir)?;
            let output = if metadata {
                RenderOutput::Metadata
            } else {
                RenderOutput::Html { keep_heading }
            };
            println!("{}", mdsite::commands::render::run(&site, &file, output)?);
        }

        Commands::List { r#type } => {
            let site = mdsite::Site::new(&base_dir)?;
            mdsite::commands::list::run(&site, &r#type)?;
        }

        Commands::Clean => {
            let site = mdsite::Site::new(&base_dir)?;
            tracing::info!("Removing rendered fragments...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Serve {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = mdsite::Site::new(&base_dir)?;

            // Build first
            site.build()?;

            let options = ServeOptions {
                ip: ip.unwrap_or_else(|| site.config.server.ip.clone()),
                port: port.unwrap_or(site.config.server.port),
                watch: !r#static,
                open,
            };
            tracing::info!("Starting server at http://{}:{}", options.ip, options.port);
            mdsite::server::start(&site, options).await?;
        }

        Commands::Version => {
            println!("mdsite version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
