use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use scholaris_cli::admin::create_admin;
use scholaris_cli::seeder::{self, SeedConfig};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "scholaris-cli")]
#[command(about = "Scholaris CLI - Administrative tools for Scholaris", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Login name (3-20 characters)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake people, classes and a lesson timetable
    Seed {
        /// Number of teachers
        #[arg(long, default_value = "10")]
        teachers: usize,

        /// Number of parents
        #[arg(long, default_value = "40")]
        parents: usize,

        /// Number of classes
        #[arg(long, default_value = "6")]
        classes: usize,

        /// Number of students per class
        #[arg(long, default_value = "20")]
        students_per_class: usize,

        /// Length of the generated academic module in weeks
        #[arg(long, default_value = "8")]
        module_weeks: u32,
    },
    /// Clear all data except admin accounts
    ClearSeed,
}

fn fail(context: &str, error: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}: {}", context, error);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match scholaris_db::init_db_pool().await {
        Ok(pool) => pool,
        Err(e) => fail("Database unavailable", format!("{:#}", e)),
    };
    if let Err(e) = scholaris_db::run_migrations(&pool).await {
        fail("Migrations failed", format!("{:#}", e));
    }

    match cli.command {
        Commands::CreateAdmin { username, password } => {
            handle_create_admin(&pool, username, password).await
        }
        Commands::Seed {
            teachers,
            parents,
            classes,
            students_per_class,
            module_weeks,
        } => {
            let config = SeedConfig::default()
                .with_teachers(teachers)
                .with_parents(parents)
                .with_classes(classes)
                .with_students_per_class(students_per_class)
                .with_module_weeks(module_weeks);
            if let Err(e) = seeder::seed_all(&pool, config).await {
                fail("Error seeding database", e);
            }
        }
        Commands::ClearSeed => {
            if let Err(e) = seeder::clear_all(&pool).await {
                fail("Error clearing seeded data", e);
            }
        }
    }
}

async fn handle_create_admin(pool: &PgPool, username: Option<String>, password: Option<String>) {
    let username = match username {
        Some(username) => username,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .unwrap_or_else(|e| fail("Failed to read username", e)),
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| fail("Failed to read password", e)),
    };

    match create_admin(pool, username.trim(), &password).await {
        Ok(id) => {
            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", username.trim());
            println!("   Id: {}", id);
        }
        Err(e) => fail("Error creating admin", e),
    }
}
