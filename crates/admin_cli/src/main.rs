use std::error::Error;

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{
    Engine, EngineError, MoneyCents, PartyType,
    commands::{NewPartyCmd, NewUserCmd},
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "khata_admin")]
#[command(about = "Admin utilities for Khata (bootstrap users/parties, ledger maintenance)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./khata.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Party(Party),
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
    email: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: Option<String>,
}

#[derive(Args, Debug)]
struct Party {
    #[command(subcommand)]
    command: PartyCommand,
}

#[derive(Subcommand, Debug)]
enum PartyCommand {
    Create(PartyCreateArgs),
    /// Rebuild a party's balance and running balances from its transactions.
    Recompute(PartyRecomputeArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PartyKind {
    Customer,
    Supplier,
}

impl From<PartyKind> for PartyType {
    fn from(value: PartyKind) -> Self {
        match value {
            PartyKind::Customer => PartyType::Customer,
            PartyKind::Supplier => PartyType::Supplier,
        }
    }
}

#[derive(Args, Debug)]
struct PartyCreateArgs {
    /// Owner user id.
    #[arg(long)]
    user: String,
    #[arg(long)]
    name: String,
    #[arg(long = "type", value_enum)]
    party_type: PartyKind,
    #[arg(long)]
    phone: Option<String>,
    /// Decimal amount, e.g. `250.00` (credit) or `-99.50` (debit).
    #[arg(long, allow_hyphen_values = true, value_parser = parse_money)]
    opening_balance: Option<MoneyCents>,
}

#[derive(Args, Debug)]
struct PartyRecomputeArgs {
    #[arg(long)]
    user: String,
    #[arg(long)]
    party: Uuid,
}

fn parse_money(raw: &str) -> Result<MoneyCents, String> {
    raw.parse::<MoneyCents>().map_err(|err| err.to_string())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let created = engine
                .new_user(NewUserCmd {
                    email: args.email,
                    name: args.name,
                    phone: args.phone,
                })
                .await;
            match created {
                Ok(user) => println!("created user: {} ({})", user.email, user.id),
                Err(EngineError::ExistingKey(email)) => {
                    eprintln!("user already exists: {email}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Party(Party {
            command: PartyCommand::Create(args),
        }) => {
            let mut cmd = NewPartyCmd::new(&args.user, &args.name, args.party_type.into());
            if let Some(phone) = args.phone {
                cmd = cmd.phone(phone);
            }
            if let Some(opening) = args.opening_balance {
                cmd = cmd.opening_balance_minor(opening.cents());
            }

            let party = engine.new_party(cmd).await?;
            println!(
                "created party: {} ({}) balance {}",
                party.name,
                party.id,
                MoneyCents::new(party.balance_minor)
            );
        }
        Command::Party(Party {
            command: PartyCommand::Recompute(args),
        }) => {
            let balance = engine
                .recompute_party_balance(&args.user, args.party)
                .await?;
            println!(
                "recomputed party {}: balance {}",
                args.party,
                MoneyCents::new(balance)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_party_create_with_negative_opening() {
        let cli = Cli::try_parse_from([
            "khata_admin",
            "--database-url",
            "sqlite::memory:",
            "party",
            "create",
            "--user",
            "u1",
            "--name",
            "Meena Traders",
            "--type",
            "supplier",
            "--opening-balance",
            "-99.50",
        ])
        .unwrap();

        let Command::Party(Party {
            command: PartyCommand::Create(args),
        }) = cli.command
        else {
            panic!("expected party create");
        };
        assert_eq!(args.opening_balance, Some(MoneyCents::new(-9950)));
        assert!(matches!(args.party_type, PartyKind::Supplier));
    }

    #[test]
    fn rejects_sub_cent_opening_balance() {
        let res = Cli::try_parse_from([
            "khata_admin",
            "party",
            "create",
            "--user",
            "u1",
            "--name",
            "Ravi",
            "--type",
            "customer",
            "--opening-balance",
            "1.005",
        ]);
        assert!(res.is_err());
    }
}
