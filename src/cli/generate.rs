//! CLI `generate` command: run the full pipeline once and print the scene.

use anyhow::{bail, Context, Result};

use palace::config::PalaceConfig;
use palace::scene::pipeline::PipelineError;
use palace::scene::types::GenerationRequest;
use palace::server;

pub async fn generate(
    config: &PalaceConfig,
    user_id: &str,
    topic: &str,
    location: &str,
    language: Option<&str>,
) -> Result<()> {
    let state = server::setup_shared_state(config)?;

    let language = match language {
        Some(code) => code.to_string(),
        None => state
            .identity
            .profile(user_id)
            .await
            .with_context(|| format!("unknown user {user_id}"))?
            .preferred_language
            .code()
            .to_string(),
    };
    let request = GenerationRequest::new(topic, location).with_language(language);

    let saved = match state.pipeline.run_generation(user_id, &request).await {
        Ok(saved) => saved,
        Err(e @ PipelineError::InvalidInput(_)) => bail!("{}", e.user_message()),
        Err(e) => return Err(e).context("palace generation failed"),
    };

    println!("Palace {}", saved.id);
    println!("Topic:     {}", saved.scene.topic);
    println!("Location:  {}", saved.scene.location);
    println!();
    println!("{}", saved.scene.english_scene);

    if let (Some(translated), Some(code)) =
        (&saved.scene.translated_scene, &saved.scene.language_code)
    {
        println!();
        println!("[{code}]");
        println!("{translated}");
    }

    Ok(())
}
