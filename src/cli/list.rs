use anyhow::Result;

use palace::config::PalaceConfig;
use palace::db;
use palace::scene::store;

/// Print a user's saved palaces, newest first.
pub fn list(config: &PalaceConfig, user_id: &str) -> Result<()> {
    let conn = db::open_database(config.resolved_db_path())?;
    let palaces = store::list_palaces(&conn, user_id)?;

    if palaces.is_empty() {
        println!("No palaces saved for {user_id}.");
        return Ok(());
    }

    println!("{} palace(s)", palaces.len());
    println!("{}", "=".repeat(40));
    for saved in &palaces {
        let scene = &saved.scene;
        println!(
            "{}  {}  {} @ {}",
            scene.created_at.format("%Y-%m-%d %H:%M"),
            saved.id,
            scene.topic,
            scene.location
        );
        if let Some(code) = &scene.language_code {
            println!("    translated: {code}");
        }
    }

    Ok(())
}
