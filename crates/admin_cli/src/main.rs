use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::users;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};

#[derive(Parser, Debug)]
#[command(name = "mecenate_admin")]
#[command(about = "Admin utilities for Mecenate (bootstrap users)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./mecenate.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    /// Also read from `MECENATE_ADMIN_PASSWORD` to keep it out of the
    /// shell history.
    #[arg(long, env = "MECENATE_ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
    /// Grant project-management rights.
    #[arg(long)]
    superuser: bool,
}

async fn connect(database_url: &str) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn create_user(
    db: &DatabaseConnection,
    args: UserCreateArgs,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let existing = users::Entity::find_by_id(&args.username).one(db).await?;
    if existing.is_some() {
        return Err(format!("user '{}' already exists", args.username).into());
    }

    let user = users::ActiveModel {
        username: Set(args.username.clone()),
        password: Set(args.password),
        is_superuser: Set(args.superuser),
    };
    users::Entity::insert(user).exec(db).await?;

    println!(
        "created user '{}'{}",
        args.username,
        if args.superuser { " (superuser)" } else { "" }
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = connect(&cli.database_url).await?;

    match cli.command {
        Command::User(user) => match user.command {
            UserCommand::Create(args) => create_user(&db, args).await?,
        },
    }

    Ok(())
}
