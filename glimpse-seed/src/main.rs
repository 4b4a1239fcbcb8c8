use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use glimpse_server::db::{repositories::ProfileRepository, Database};
use glimpse_types::Profile;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use uuid::Uuid;

/// Glimpse Actor Pool Seeder
///
/// This tool provisions the synthetic actor profiles the engagement
/// generator draws reactions, comments, and shares from. It can also lay
/// down the demo creators and sample content for local development.
#[derive(Parser, Debug)]
#[command(name = "glimpse-seed")]
#[command(about = "Seed the Glimpse database with synthetic actor profiles", long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "./glimpse.db")]
    database: String,

    /// Number of synthetic actor profiles to create
    #[arg(short, long, default_value_t = 24)]
    bots: usize,

    /// Also seed the demo creators and sample content
    #[arg(long)]
    demo: bool,

    /// Fixed seed for the handle generator (reproducible pools)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Perform a dry run without making changes
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,
}

/// Statistics collected during seeding
#[derive(Debug, Default)]
struct SeedStats {
    /// Number of actor profiles created
    bots_created: usize,
    /// Slots abandoned after repeated handle collisions
    handles_skipped: usize,
    /// Errors encountered during seeding
    errors: Vec<String>,
}

impl SeedStats {
    /// Create a new empty statistics tracker
    fn new() -> Self {
        Self::default()
    }

    /// Record a created actor profile
    fn record_created(&mut self) {
        self.bots_created += 1;
    }

    /// Record a slot given up on after handle collisions
    fn record_skip(&mut self) {
        self.handles_skipped += 1;
    }

    /// Record an error
    fn record_error(&mut self, error: String) {
        self.errors.push(error);
    }
}

const HANDLE_ADJECTIVES: &[&str] = &[
    "amber", "breezy", "cosmic", "dusty", "ember", "fable", "golden", "hazy", "indigo", "juniper",
    "kindred", "lunar", "mellow", "nomad", "opal", "prism", "quiet", "rustic", "solar", "tidal",
    "urban", "velvet", "wander", "zephyr",
];

const HANDLE_NOUNS: &[&str] = &[
    "aperture", "bloom", "canvas", "drift", "echo", "frame", "glow", "horizon", "isle", "jade",
    "koi", "lens", "mosaic", "nova", "orbit", "pixel", "quartz", "ripple", "shutter", "trail",
    "umbra", "vista", "wave", "zenith",
];

/// Generate a plausible handle in one of the platform's common shapes
fn generate_handle<R: Rng>(rng: &mut R) -> String {
    let adjective = HANDLE_ADJECTIVES.choose(rng).copied().unwrap_or("glimpse");
    let noun = HANDLE_NOUNS.choose(rng).copied().unwrap_or("actor");
    match rng.gen_range(0..3) {
        0 => format!("{}.{}", adjective, noun),
        1 => format!("{}_{}", adjective, noun),
        _ => format!("{}{}{}", adjective, noun, rng.gen_range(10..100)),
    }
}

/// Generate one synthetic actor profile
fn generate_bot_profile<R: Rng>(rng: &mut R) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        username: generate_handle(rng),
        full_name: None,
        avatar_url: None,
        bio: None,
        followers_count: Some(rng.gen_range(50..2000)),
        following_count: rng.gen_range(80..900),
        is_bot: true,
        created_at: Utc::now(),
    }
}

/// Load every username already in the database
fn existing_usernames(db: &Database) -> Result<HashSet<String>> {
    let conn = db
        .pool
        .get()
        .context("Failed to get database connection")?;

    let mut stmt = conn
        .prepare("SELECT username FROM profiles")
        .context("Failed to prepare query")?;

    let names = stmt
        .query_map([], |row| row.get(0))
        .context("Failed to execute query")?
        .collect::<Result<HashSet<String>, _>>()
        .context("Failed to collect usernames")?;

    Ok(names)
}

/// Create `count` actor profiles, skipping slots whose handles keep colliding
fn seed_actor_pool<R: Rng>(
    db: &Database,
    count: usize,
    rng: &mut R,
    dry_run: bool,
    stats: &mut SeedStats,
) -> Result<()> {
    let profile_repo = ProfileRepository::new(db.pool.clone());
    let mut taken = existing_usernames(db)?;

    for _ in 0..count {
        let mut profile = generate_bot_profile(rng);

        // A few retries on handle collisions, then give up on this slot
        let mut attempts = 0;
        while taken.contains(&profile.username) && attempts < 5 {
            profile.username = generate_handle(rng);
            attempts += 1;
        }
        if taken.contains(&profile.username) {
            stats.record_skip();
            continue;
        }

        if !dry_run {
            if let Err(e) = profile_repo.create(&profile) {
                let error_msg = format!("Error creating actor {}: {:#}", profile.username, e);
                eprintln!("ERROR: {}", error_msg);
                stats.record_error(error_msg);
                continue;
            }
        }

        taken.insert(profile.username.clone());
        stats.record_created();
    }

    Ok(())
}

/// Open the database and make sure the schema exists
fn connect_database(path: &str) -> Result<Database> {
    println!("Opening database: {}", path);

    let db = Database::new(path).context("Failed to open database connection")?;

    db.initialize()
        .context("Failed to initialize database schema")?;

    println!("Database ready - schema applied");

    Ok(db)
}

/// Display seeding statistics in a formatted way
fn display_stats(stats: &SeedStats, dry_run: bool) {
    println!();
    println!("Seeding Summary");
    println!("===============");
    println!();
    println!("Actor profiles created: {}", stats.bots_created);
    println!("Slots skipped (handle collisions): {}", stats.handles_skipped);

    if !stats.errors.is_empty() {
        println!();
        println!("Errors encountered: {}", stats.errors.len());
        for (i, error) in stats.errors.iter().enumerate() {
            println!("  {}. {}", i + 1, error);
        }
    }

    println!();
    if dry_run {
        println!("This was a dry run - no changes were made to the database.");
    } else {
        println!("Seeding completed successfully!");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Glimpse Actor Pool Seeder");
    println!("=========================");
    println!();
    println!("Database: {}", args.database);
    println!("Actors to create: {}", args.bots);
    println!("Dry run: {}", args.dry_run);
    println!();

    // Connect to database
    let db = connect_database(&args.database)?;

    let profile_repo = ProfileRepository::new(db.pool.clone());
    let existing = profile_repo
        .count_bots()
        .context("Failed to count existing actors")?;
    println!("Existing actor profiles: {}", existing);

    // Show confirmation prompt unless --yes flag is provided
    if !args.yes && !args.dry_run {
        println!("This will add up to {} synthetic actor profiles.", args.bots);
        println!("Do you want to continue? (y/N): ");

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read user input")?;

        let input = input.trim().to_lowercase();
        if input != "y" && input != "yes" {
            println!("Seeding cancelled.");
            return Ok(());
        }
    }

    let mut rng: SmallRng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let mut stats = SeedStats::new();

    println!();
    println!("Creating actor profiles...");
    seed_actor_pool(&db, args.bots, &mut rng, args.dry_run, &mut stats)?;

    if args.demo {
        if args.dry_run {
            println!("Dry run - skipping demo content");
        } else {
            db.seed_demo_data().context("Failed to seed demo content")?;
            println!("Demo creators and sample content seeded");
        }
    }

    // Display stats
    display_stats(&stats, args.dry_run);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_seed_creates_requested_actors() {
        let db = Database::in_memory().expect("Failed to create in-memory database");
        db.initialize().expect("Failed to initialize database");

        let mut rng = SmallRng::seed_from_u64(42);
        let mut stats = SeedStats::new();
        seed_actor_pool(&db, 10, &mut rng, false, &mut stats).expect("Failed to seed actors");

        // Fresh database, generous handle space: every slot should land
        assert_eq!(stats.bots_created, 10);
        assert_eq!(stats.handles_skipped, 0);
        assert!(stats.errors.is_empty());

        let profile_repo = ProfileRepository::new(db.pool.clone());
        let count = profile_repo.count_bots().expect("Failed to count bots");
        assert_eq!(count, 10);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let db = Database::in_memory().expect("Failed to create in-memory database");
        db.initialize().expect("Failed to initialize database");

        let mut rng = SmallRng::seed_from_u64(7);
        let mut stats = SeedStats::new();
        seed_actor_pool(&db, 8, &mut rng, true, &mut stats).expect("Failed to dry-run seed");

        assert_eq!(stats.bots_created, 8);

        let profile_repo = ProfileRepository::new(db.pool.clone());
        let count = profile_repo.count_bots().expect("Failed to count bots");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_existing_usernames_are_respected() {
        let db = Database::in_memory().expect("Failed to create in-memory database");
        db.initialize().expect("Failed to initialize database");

        let profile_repo = ProfileRepository::new(db.pool.clone());
        let mut rng = SmallRng::seed_from_u64(3);
        let existing = generate_bot_profile(&mut rng);
        profile_repo
            .create(&existing)
            .expect("Failed to create profile");

        let names = existing_usernames(&db).expect("Failed to load usernames");
        assert!(names.contains(&existing.username));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_handle_generation_is_reproducible() {
        let handles = |seed: u64| -> Vec<String> {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..20).map(|_| generate_handle(&mut rng)).collect()
        };

        assert_eq!(handles(7), handles(7));
        assert_ne!(handles(7), handles(8));
    }

    proptest! {
        // Handles must stay inside the platform's username shape no matter
        // what the generator draws
        #[test]
        fn prop_handles_are_well_formed(seed in any::<u64>()) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let handle = generate_handle(&mut rng);

            prop_assert!(!handle.is_empty());
            prop_assert!(handle.len() <= 32);
            prop_assert!(handle
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '_'));
        }
    }
}
