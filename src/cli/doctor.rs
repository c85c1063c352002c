//! CLI `doctor` command: database diagnostics and generator configuration.

use anyhow::{Context, Result};

use palace::config::PalaceConfig;
use palace::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &PalaceConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("Palace Health Report");
    println!("====================");
    println!();

    println!("Generator:");
    println!("  Model:           {}", config.generator.model);
    println!("  Endpoint:        {}", config.generator.base_url);
    let key_status = match config.generator.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => "set",
        _ => "MISSING (set GEMINI_API_KEY)",
    };
    println!("  API key:         {key_status}");
    println!("Translator:        {}", config.translator.base_url);
    println!();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `palace serve` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Users:           {}", report.user_count);
    println!("  Palaces:         {}", report.palace_count);
    println!("  Sessions:        {}", report.session_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Restore from a backup: cp backup.db {}", db_path.display());
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
