use clap::{CommandFactory, Parser, Subcommand};
use todo_list::config::Config;
use todo_list::migrate::MigrationRunner;
use todo_list::task::TaskService;
use todo_list::{db, repl, web};

#[derive(Parser, Debug)]
#[command(name = "todo-list", version, about = "A minimal todo-list manager")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Rollback latest database migration
    Rollback,
    /// Start the web app
    Web,
    /// Launch the cli app
    Cli,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let args = Cli::parse();

    let Some(command) = args.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = Config::from_env()?;
    let db = db::connect(&config).await?;

    match command {
        Commands::Migrate => MigrationRunner::new(&db).up().await?,
        Commands::Rollback => MigrationRunner::new(&db).down().await?,
        Commands::Web => web::start_web_server(&config, db).await?,
        Commands::Cli => {
            let service = TaskService::new(&db);
            let stdin = std::io::BufReader::new(std::io::stdin());
            let mut stdout = std::io::stdout();
            repl::run(&service, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}
