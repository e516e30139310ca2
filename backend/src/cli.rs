use clap::{Arg, ArgMatches, Command, command};
use dioxus::logger::tracing::{info, trace, warn};
use dioxus::prelude::ServerFnError;
use dotenv::dotenv;
use jokes_shared::datatypes::{Secret, User};
use sqlx::migrate::Migrator;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, IsTerminal, Write},
    path::{Path, PathBuf},
};

use crate::models::{NewJoke, NewUser, UserDbOperations as _};
use crate::{get_db, init_db, init_public_url, init_secret};

pub(crate) static MIGRATOR: Migrator = sqlx::migrate!();

const ENV_FILE: &str = ".env";

/// Settings of the jokes server, read from the command line, the environment or `.env`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db: PathBuf,
    pub public_url: String,
    pub internal_ip: String,
    pub port: u16,
    pub secret: Secret,
}

impl ServerConfig {
    /// The lines of an `.env` file that reproduces this configuration.
    #[must_use]
    pub fn to_env_strings(&self) -> Vec<String> {
        vec![
            format!("JOKES_DATABASE=\"{}\"\n", self.db.display()),
            format!("JOKES_PORT={}\n", self.port),
            format!("JOKES_PUBLIC_URL=\"{}\"\n", self.public_url),
            format!("JOKES_IP=\"{}\"\n", self.internal_ip),
            "# Passwords are hashed with JOKES_SECRET, changing it locks every jokester out.\n"
                .to_owned(),
            format!(
                "JOKES_SECRET=\"{}\"\n",
                self.secret.secret.as_deref().unwrap_or_default()
            ),
        ]
    }
}

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JokesCommand {
    RunServer,
    MigrateDatabase,
    GenerateEnv,
    CreateUser,
    Demo,
}

impl JokesCommand {
    const ALL: [Self; 5] = [
        Self::RunServer,
        Self::MigrateDatabase,
        Self::GenerateEnv,
        Self::CreateUser,
        Self::Demo,
    ];

    const fn name(self) -> &'static str {
        match self {
            Self::RunServer => "runserver",
            Self::MigrateDatabase => "migrate-database",
            Self::GenerateEnv => "generate-env",
            Self::CreateUser => "create-user",
            Self::Demo => "demo",
        }
    }

    const fn about(self) -> &'static str {
        match self {
            Self::RunServer => "Run the jokes site",
            Self::MigrateDatabase => "Create the database if needed, apply pending migrations and exit",
            Self::GenerateEnv => "Write the current settings to a .env file and exit",
            Self::CreateUser => "Create a jokester who can log in and add jokes",
            Self::Demo => "Create a fresh database with a demo jokester and a few jokes",
        }
    }

    fn from_matches(matches: &ArgMatches) -> Option<Self> {
        let (name, _) = matches.subcommand()?;
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    /// Commands that only work on an already migrated database.
    const fn needs_database(self) -> bool {
        matches!(self, Self::RunServer | Self::CreateUser)
    }
}

fn generate_cli() -> Command {
    let cli = command!()
        .arg(
            Arg::new("database")
                .long("db")
                .help("The path of the sqlite database")
                .env("JOKES_DATABASE")
                .default_value("./jokes.db")
                .global(true),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .help("The port the jokes site listens on")
                .env("JOKES_PORT")
                .value_parser(clap::value_parser!(u16))
                .global(true),
        )
        .arg(
            Arg::new("public_url")
                .long("public-url")
                .short('u')
                .help("The address visitors use, the feed links to it")
                .env("JOKES_PUBLIC_URL")
                .default_value("http://127.0.0.1:8080")
                .global(true),
        )
        .arg(
            Arg::new("internal_ip")
                .long("hostip")
                .short('i')
                .help("The ip the jokes site binds to")
                .env("JOKES_IP")
                .global(true),
        )
        .arg(
            Arg::new("secret")
                .long("secret")
                .help(concat!(
                    "The secret mixed into every password hash.",
                    " Command line parameters are visible to all users of the machine,",
                    " prefer the JOKES_SECRET environment variable."
                ))
                .env("JOKES_SECRET")
                .default_value("")
                .global(true),
        );

    JokesCommand::ALL
        .into_iter()
        .zip(1_usize..)
        .fold(cli, |cli, (jokes_command, order)| {
            cli.subcommand(
                Command::new(jokes_command.name())
                    .about(jokes_command.about())
                    .display_order(order)
                    .hide(jokes_command == JokesCommand::Demo),
            )
        })
}

/// Collect the [`ServerConfig`] from the parsed arguments.
fn parse_args_to_config(matches: &ArgMatches) -> Result<ServerConfig, ServerFnError> {
    let secret = matches
        .get_one::<String>("secret")
        .cloned()
        .unwrap_or_default();
    let secret = match secret.len() {
        0 => {
            warn!("No JOKES_SECRET set, using a random one for this run.");
            warn!("Passwords hashed during this run stop working on the next start.");
            Secret::random()
        }
        1..5 => {
            warn!("The JOKES_SECRET is too short, using a random one for this run.");
            Secret::random()
        }
        _ => Secret::new(secret),
    };
    let db = matches
        .get_one::<String>("database")
        .map(PathBuf::from)
        .ok_or_else(|| ServerFnError::new("No database path was configured"))?;
    let public_url = matches
        .get_one::<String>("public_url")
        .cloned()
        .ok_or_else(|| ServerFnError::new("No public url was configured"))?;
    let internal_ip = matches
        .get_one::<String>("internal_ip")
        .cloned()
        .or_else(|| dioxus::cli_config::server_ip().map(|ip| ip.to_string()))
        .unwrap_or_else(|| "127.0.0.1".to_owned());
    let port = matches
        .get_one::<u16>("port")
        .copied()
        .or_else(dioxus::cli_config::server_port)
        .unwrap_or(8080);
    Ok(ServerConfig {
        db,
        public_url,
        internal_ip,
        port,
        secret,
    })
}

/// `dx serve` starts the server without a subcommand and picks the address itself.
fn launched_by_dioxus() -> bool {
    std::env::var("DIOXUS_CLI_ENABLED").is_ok_and(|enabled| enabled.parse().unwrap_or(false))
}

/// Parse the command line and run the requested command.
///
/// Returns the configuration when the server should start, `Ok(None)` when a
/// maintenance command finished.
pub async fn setup() -> Result<Option<ServerConfig>, ServerFnError> {
    dotenv().ok();
    let matches = generate_cli().get_matches();
    let mut server_config = parse_args_to_config(&matches)?;
    init_secret(server_config.secret.clone());
    init_public_url(server_config.public_url.clone());

    let jokes_command = match JokesCommand::from_matches(&matches) {
        Some(jokes_command) => jokes_command,
        None if launched_by_dioxus() => {
            if let (Some(ip), Some(port)) = (
                dioxus::cli_config::server_ip(),
                dioxus::cli_config::server_port(),
            ) {
                server_config.internal_ip = ip.to_string();
                server_config.port = port;
            }
            JokesCommand::RunServer
        }
        None => {
            println!("{}", generate_cli().render_usage());
            return Err(ServerFnError::new("No command given, try `runserver`"));
        }
    };
    trace!("Running {}", jokes_command.name());

    if jokes_command.needs_database() {
        connect_existing_database(&server_config.db).await?;
    }

    match jokes_command {
        JokesCommand::RunServer => {
            let jokesters = User::count_users(&get_db().await?).await?;
            if jokesters < 1 {
                warn!("Nobody can add jokes yet, create a jokester with `create-user`.");
            }
            return Ok(Some(server_config));
        }
        JokesCommand::MigrateDatabase => apply_migrations(&server_config.db).await?,
        JokesCommand::GenerateEnv => write_env_file(&server_config)?,
        JokesCommand::CreateUser => request_user_credentials(&server_config.secret).await?,
        JokesCommand::Demo => generate_demo_data(&server_config).await?,
    }
    Ok(None)
}

async fn connect_existing_database(db: &Path) -> Result<(), ServerFnError> {
    if !db.exists() {
        return Err(ServerFnError::new(format!(
            "No database at {}, create one with `migrate-database` or `demo`",
            db.display()
        )));
    }
    init_db(&db.to_string_lossy()).await
}

fn read_line(prompt: &str) -> Result<String, ServerFnError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let line = io::stdin()
        .lock()
        .lines()
        .next()
        .ok_or_else(|| ServerFnError::new("No input"))??;
    Ok(line.trim().to_owned())
}

/// Ask for the name and the password of a new jokester.
async fn request_user_credentials(secret: &Secret) -> Result<(), ServerFnError> {
    let username = read_line("Username: ")?;
    let password = if io::stdin().is_terminal() {
        rpassword::prompt_password(format!("Password for {username}: "))?
    } else {
        rpassword::read_password_from_bufread(&mut BufReader::new(io::stdin()))?
    };

    let new_user = NewUser::new(username, &password, secret)?;
    new_user.insert_user(&get_db().await?).await?;
    info!("Created the jokester {}", new_user.username);
    Ok(())
}

/// Create the database file if needed and apply the embedded migrations.
async fn apply_migrations(db: &Path) -> Result<(), ServerFnError> {
    if !db.exists() {
        info!("Creating the database {}", db.display());
        File::create(db)?;
    }
    init_db(&db.to_string_lossy()).await?;
    MIGRATOR.run(&get_db().await?).await?;
    info!("The database {} is up to date", db.display());
    Ok(())
}

/// Save the configuration to `.env`, an existing file is never overwritten.
fn write_env_file(server_config: &ServerConfig) -> Result<(), ServerFnError> {
    if Path::new(ENV_FILE).exists() {
        return Err(ServerFnError::new("There already is a .env file, not touching it"));
    }
    let mut file = File::create(ENV_FILE)?;
    for line in server_config.to_env_strings() {
        file.write_all(line.as_bytes())?;
    }
    info!("Wrote the settings to {ENV_FILE}");
    Ok(())
}

const DEMO_JOKES: [(&str, &str); 6] = [
    (
        "Road worker",
        "I never wanted to believe that my Dad was stealing from his job as a road worker. But when I got home, all the signs were there.",
    ),
    (
        "Frisbee",
        "I was wondering why the frisbee was getting bigger, then it hit me.",
    ),
    (
        "Trees",
        "Why do trees seem suspicious on sunny days? Dunno, they're just a bit shady.",
    ),
    (
        "Skeletons",
        "Why don't skeletons ride roller coasters? They don't have the stomach for it.",
    ),
    (
        "Hippos",
        "Why don't you find hippopotamuses hiding in trees? They're really good at it.",
    ),
    (
        "Dinner",
        "What did one plate say to the other plate? Dinner is on me!",
    ),
];

async fn generate_demo_data(server_config: &ServerConfig) -> Result<(), ServerFnError> {
    if server_config.db.exists() {
        return Err(ServerFnError::new(format!(
            "{} already exists, the demo only fills a new database",
            server_config.db.display()
        )));
    }
    if !Path::new(ENV_FILE).exists() {
        write_env_file(server_config)?;
    }
    apply_migrations(&server_config.db).await?;

    let db = get_db().await?;
    let kody = NewUser::new("kody".to_string(), "twixrox", &server_config.secret)?;
    kody.insert_user(&db).await?;
    let kody = User::get_user_by_name(&db, "kody")
        .await?
        .ok_or_else(|| ServerFnError::new("The demo user was not created"))?;

    for (name, content) in DEMO_JOKES {
        NewJoke::new(name.to_owned(), content.to_owned(), kody.id)
            .insert(&db)
            .await?;
    }
    info!(
        "Demo data created, log in as kody with the password twixrox ({} jokes)",
        DEMO_JOKES.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_file_contains_every_setting() {
        let config = ServerConfig {
            db: PathBuf::from("./jokes.db"),
            public_url: "https://jokes.example".to_owned(),
            internal_ip: "0.0.0.0".to_owned(),
            port: 8080,
            secret: Secret::new("very-secret".to_owned()),
        };
        let lines = config.to_env_strings();
        for key in [
            "JOKES_DATABASE=",
            "JOKES_PORT=8080",
            "JOKES_PUBLIC_URL=",
            "JOKES_IP=",
            "JOKES_SECRET=\"very-secret\"",
        ] {
            assert!(
                lines.iter().any(|l| l.starts_with(key)),
                "{key} is missing in the env file"
            );
        }
        assert!(!lines.iter().any(|l| l.contains("*****SECRET*****")));
    }

    #[test]
    fn cli_knows_its_subcommands() {
        let help = generate_cli().render_long_help().to_string();
        for s in [
            "runserver",
            "migrate-database",
            "generate-env",
            "create-user",
            "--db",
            "--port",
            "--public-url",
        ] {
            assert!(help.contains(s), "{s} was not found in the help");
        }
    }

    #[test]
    fn subcommands_map_to_commands() {
        for jokes_command in JokesCommand::ALL {
            let matches = generate_cli()
                .try_get_matches_from(["jokes", jokes_command.name()])
                .unwrap();
            assert_eq!(JokesCommand::from_matches(&matches), Some(jokes_command));
        }
        let matches = generate_cli().try_get_matches_from(["jokes"]).unwrap();
        assert_eq!(JokesCommand::from_matches(&matches), None);
        assert!(generate_cli().try_get_matches_from(["jokes", "backend"]).is_err());
    }

    #[test]
    fn only_server_and_user_creation_need_a_database() {
        let needing: Vec<_> = JokesCommand::ALL
            .into_iter()
            .filter(|c| c.needs_database())
            .collect();
        assert_eq!(needing, [JokesCommand::RunServer, JokesCommand::CreateUser]);
    }

    #[test]
    fn demo_is_hidden_from_the_help() {
        let help = generate_cli().render_long_help().to_string();
        assert!(!help.contains(JokesCommand::Demo.about()));
    }

    #[test]
    fn short_secrets_are_replaced() {
        let matches = generate_cli()
            .try_get_matches_from(["jokes", "--secret", "abc", "runserver"])
            .unwrap();
        let config = parse_args_to_config(&matches).unwrap();
        assert!(config.secret.is_random);
        assert_ne!(config.secret.secret.as_deref(), Some("abc"));

        let matches = generate_cli()
            .try_get_matches_from(["jokes", "--secret", "a-long-secret", "-p", "9000", "runserver"])
            .unwrap();
        let config = parse_args_to_config(&matches).unwrap();
        assert!(!config.secret.is_random);
        assert_eq!(config.port, 9000);
    }
}
