use std::error::Error;

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{Engine, EngineError, UserNew};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

mod prompt;

#[derive(Parser, Debug)]
#[command(name = "storekeep_admin")]
#[command(about = "Admin utilities for Storekeep (schema, users, ledger company)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./storekeep.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply or inspect schema migrations.
    Migrate(MigrateArgs),
    User(User),
    Company(Company),
}

#[derive(Args, Debug)]
struct MigrateArgs {
    #[arg(value_enum, default_value_t = MigrateAction::Up)]
    action: MigrateAction,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MigrateAction {
    Up,
    Down,
    Fresh,
    Status,
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user; the password is asked on the terminal.
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long, default_value = "")]
    email: String,
    /// Grant company management. Financials additionally require the
    /// username `admin`.
    #[arg(long)]
    staff: bool,
}

#[derive(Args, Debug)]
struct Company {
    #[command(subcommand)]
    command: CompanyCommand,
}

#[derive(Subcommand, Debug)]
enum CompanyCommand {
    /// Create the ledger company that accumulates sales revenue.
    Create(CompanyCreateArgs),
}

#[derive(Args, Debug)]
struct CompanyCreateArgs {
    #[arg(long)]
    name: String,
}

async fn migrate(
    db: &DatabaseConnection,
    action: MigrateAction,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match action {
        MigrateAction::Up => migration::Migrator::up(db, None).await?,
        MigrateAction::Down => migration::Migrator::down(db, None).await?,
        MigrateAction::Fresh => migration::Migrator::fresh(db).await?,
        MigrateAction::Status => migration::Migrator::status(db).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = Database::connect(&cli.database_url).await?;

    if let Command::Migrate(args) = &cli.command {
        migrate(&db, args.action).await?;
        println!("migrations: {:?} done", args.action);
        return Ok(());
    }

    migration::Migrator::up(&db, None).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Migrate(_) => {}
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt::new_password()?;

            let mut cmd = UserNew::new(&args.username, args.email, password);
            if args.staff {
                cmd = cmd.staff();
            }

            match engine.create_user(cmd).await {
                Ok(user) => println!("created user: {} (id {})", user.username, user.id),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Company(Company {
            command: CompanyCommand::Create(args),
        }) => match engine.create_ledger_company(&args.name).await {
            Ok(company) => println!(
                "created ledger company: {} (id {})",
                company.company_name, company.id
            ),
            Err(EngineError::ExistingKey(_)) => {
                eprintln!("ledger company already exists");
                std::process::exit(1);
            }
            Err(err) => return Err(err.into()),
        },
    }

    Ok(())
}
