//! # Seed Data Generator
//!
//! Populates the database with a realistic household for development.
//!
//! ## Usage
//! ```bash
//! # Seed three months of history for demo-user (default)
//! cargo run -p finsense-db --bin seed
//!
//! # Different user and history length
//! cargo run -p finsense-db --bin seed -- --user 6f1c... --months 6
//!
//! # Specify database path
//! cargo run -p finsense-db --bin seed -- --db ./data/finsense.db
//! ```
//!
//! ## Generated Data
//! - Profile with a declared monthly income
//! - Per month: salary, rent, and a spread of daily expenses
//! - Budgets for Food, Transportation, Entertainment and Shopping
//! - Two savings goals, one of them already completed

use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::env;

use finsense_core::{
    compute_summary, BudgetPeriod, HealthLabel, NewBudget, NewGoal, NewTransaction,
    ProfileUpdate, TransactionType,
};
use finsense_db::{Database, DbConfig};

/// Recurring expenses: (category, description, amount in paise, day stride)
const DAILY_EXPENSES: &[(&str, &str, i64, i64)] = &[
    ("Food", "Groceries", 185_000, 4),
    ("Food", "Lunch", 32_000, 2),
    ("Transportation", "Metro card", 50_000, 7),
    ("Entertainment", "Movies", 90_000, 11),
    ("Shopping", "Clothes", 240_000, 13),
    ("Utilities", "Electricity", 160_000, 30),
    ("Healthcare", "Pharmacy", 45_000, 17),
];

/// Budgets: (category, monthly limit in paise)
const BUDGETS: &[(&str, i64)] = &[
    ("Food", 1_200_000),
    ("Transportation", 300_000),
    ("Entertainment", 250_000),
    ("Shopping", 400_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut months: u32 = 3;
    let mut user_id = String::from("demo-user");
    let mut db_path = String::from("./finsense_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--months" | "-m" => {
                if i + 1 < args.len() {
                    months = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "--user" | "-u" => {
                if i + 1 < args.len() {
                    user_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("FinSense Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -m, --months <N>   Months of history to generate (default: 3)");
                println!("  -u, --user <ID>    User id to seed (default: demo-user)");
                println!("  -d, --db <PATH>    Database file path (default: ./finsense_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 FinSense Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("User:     {}", user_id);
    println!("Months:   {}", months);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.transactions().count(&user_id).await?;
    if existing > 0 {
        println!("⚠ User already has {} transactions", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file or pick another --user.");
        return Ok(());
    }

    db.profiles()
        .update(
            &user_id,
            &ProfileUpdate {
                full_name: Some("Demo User".to_string()),
                monthly_income_cents: Some(7_500_000),
                ..Default::default()
            },
        )
        .await?;
    println!("✓ Profile created");

    // Transactions
    println!();
    println!("Generating transactions...");

    let today = Utc::now().date_naive();
    let start = std::time::Instant::now();
    let mut generated = 0usize;

    for offset in (0..months).rev() {
        let Some(month_start) = first_of_month_back(today, offset) else {
            continue;
        };

        for txn in month_transactions(month_start, today) {
            if let Err(e) = db.transactions().insert(&user_id, &txn).await {
                eprintln!("Failed to insert {} on {}: {}", txn.category, txn.date, e);
                continue;
            }
            generated += 1;
        }
    }

    println!("✓ Generated {} transactions in {:?}", generated, start.elapsed());

    // Budgets
    for (category, limit_cents) in BUDGETS {
        let input = NewBudget {
            category: category.to_string(),
            limit_cents: *limit_cents,
            period: BudgetPeriod::Monthly,
            color: None,
        };
        if let Err(e) = db.budgets().insert(&user_id, &input).await {
            eprintln!("Failed to insert budget {}: {}", category, e);
        }
    }
    println!("✓ Created {} budgets", BUDGETS.len());

    // Goals
    let emergency = db
        .goals()
        .insert(
            &user_id,
            &NewGoal {
                title: "Emergency Fund".to_string(),
                target_cents: 20_000_000,
                current_cents: 6_500_000,
                deadline: today.checked_add_signed(Duration::days(270)),
                color: None,
            },
        )
        .await?;
    let vacation = db
        .goals()
        .insert(
            &user_id,
            &NewGoal {
                title: "Goa Trip".to_string(),
                target_cents: 4_000_000,
                current_cents: 0,
                deadline: None,
                color: None,
            },
        )
        .await?;
    db.goals()
        .update_progress(&user_id, &vacation.id, vacation.target_cents)
        .await?;
    println!("✓ Created goals: {}, {}", emergency.title, vacation.title);

    // Verify
    println!();
    println!("Computing health score...");
    let profile = db.profiles().get_or_create(&user_id).await?;
    let summary = compute_summary(
        &db.transactions().list(&user_id).await?,
        &db.budgets().list(&user_id).await?,
        &db.goals().list(&user_id).await?,
        Some(&profile),
        today,
    );
    println!(
        "  This month: income {}, expenses {}, savings {}",
        summary.total_income, summary.total_expenses, summary.total_savings
    );
    println!(
        "  Health score: {} ({})",
        summary.health_score,
        HealthLabel::from_score(summary.health_score)
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// First day of the month `offset` months before `today`'s month.
fn first_of_month_back(today: NaiveDate, offset: u32) -> Option<NaiveDate> {
    let months_since_zero = today.year() * 12 + today.month0() as i32 - offset as i32;
    let year = months_since_zero.div_euclid(12);
    let month = months_since_zero.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// One month of salary, rent and recurring expenses, stopping at `today`.
fn month_transactions(month_start: NaiveDate, today: NaiveDate) -> Vec<NewTransaction> {
    let mut txns = vec![
        entry(TransactionType::Income, "Salary", "Monthly salary", 7_500_000, month_start),
        entry(TransactionType::Expense, "Housing", "Rent", 2_200_000, month_start),
    ];

    if let Some(freelance_day) = month_start.with_day(20) {
        if freelance_day <= today {
            txns.push(entry(
                TransactionType::Income,
                "Freelance",
                "Side project",
                850_000,
                freelance_day,
            ));
        }
    }

    for (category, description, amount_cents, stride) in DAILY_EXPENSES {
        let mut day = month_start;
        while day.month() == month_start.month() && day <= today {
            txns.push(entry(
                TransactionType::Expense,
                category,
                description,
                *amount_cents,
                day,
            ));
            day += Duration::days(*stride);
        }
    }

    txns.retain(|t| t.date <= today);
    txns
}

fn entry(
    kind: TransactionType,
    category: &str,
    description: &str,
    amount_cents: i64,
    date: NaiveDate,
) -> NewTransaction {
    NewTransaction {
        kind,
        amount_cents,
        category: category.to_string(),
        description: Some(description.to_string()),
        date,
    }
}
