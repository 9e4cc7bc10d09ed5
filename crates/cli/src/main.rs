//! `shortgen` -- interactive terminal front end for the short-video
//! generation wizard.
//!
//! Walks through topic, style and voice selection, optionally previews the
//! script, then submits the job and prints progress until the video is
//! ready to download.
//!
//! # Environment variables
//!
//! | Variable                      | Default                 | Description                         |
//! |-------------------------------|-------------------------|-------------------------------------|
//! | `SHORTGEN_API_URL`            | `http://localhost:8000` | Backend base URL                    |
//! | `SHORTGEN_USER_ID`            | `demo_user`             | User id sent with generations       |
//! | `POLL_INTERVAL_SECS`          | `3`                     | Seconds between status checks       |
//! | `POLL_MAX_CONSECUTIVE_ERRORS` | `5`                     | Failed checks before giving up (`0` = never) |
//! | `POLL_MAX_BACKOFF_SECS`       | `30`                    | Longest delay between failing checks |
//! | `REQUEST_TIMEOUT_SECS`        | `30`                    | Per-request HTTP timeout            |
//! | `RUST_LOG`                    | `shortgen_cli=info,shortgen_client=info` | Log filter |

use std::path::PathBuf;
use std::sync::Arc;

use shortgen_client::api::GenerationApi;
use shortgen_client::config::ClientConfig;
use shortgen_client::controller::{PollOutcome, WizardController};
use shortgen_core::catalog::VOICES;
use shortgen_core::wizard::{TopicMode, WizardStep, TOTAL_STEPS};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod prompt;

use prompt::{Choice, Prompt};

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shortgen_cli=info,shortgen_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(
        api_url = %config.api_url,
        user_id = %config.user_id,
        poll_interval_secs = config.poll.interval.as_secs(),
        "Starting shortgen",
    );

    let api = GenerationApi::from_config(&config)?;
    let mut controller = WizardController::new(Arc::new(api), config.poll.clone());

    match controller.health().await {
        Ok(report) if report.is_healthy() => tracing::info!("Backend is healthy"),
        Ok(report) => tracing::warn!(status = %report.status, "Backend reports degraded health"),
        Err(e) => tracing::warn!(error = %e, "Backend health check failed"),
    }

    if let Err(e) = controller.load_catalog().await {
        println!("! {} (any style id will be accepted)", e.message());
    }

    let mut prompt = Prompt::new();
    loop {
        let step = controller.session().step();
        println!();
        println!(
            "[{}/{}] {} ({}%)",
            step.to_number(),
            TOTAL_STEPS,
            step.label(),
            step.progress_percent()
        );

        let flow = match step {
            WizardStep::TopicSelection => topic_step(&mut controller, &mut prompt).await?,
            WizardStep::StyleSelection => style_step(&mut controller, &mut prompt).await?,
            WizardStep::AudioSettings => audio_step(&mut controller, &mut prompt).await?,
            WizardStep::ScriptPreview => preview_step(&mut controller, &mut prompt).await?,
            WizardStep::GenerationInProgress => {
                generation_step(&mut controller, &mut prompt).await?
            }
            WizardStep::Completed => completed_step(&mut controller, &mut prompt).await?,
        };
        if let Some(message) = controller.session().error() {
            println!("! {message}");
        }
        if let Flow::Quit = flow {
            break;
        }
    }

    controller.reset();
    tracing::info!("Exiting shortgen");
    Ok(())
}

async fn topic_step(c: &mut WizardController, prompt: &mut Prompt) -> anyhow::Result<Flow> {
    let Some(mode) = prompt.ask("Find topics by [t]heme or enter a [d]irect topic?").await? else {
        return Ok(Flow::Quit);
    };
    match mode.as_str() {
        "q" => Ok(Flow::Quit),
        "d" => {
            if c.set_topic_mode(TopicMode::Direct).is_err() {
                return Ok(Flow::Continue);
            }
            let Some(topic) = prompt.ask("Topic:").await? else {
                return Ok(Flow::Quit);
            };
            if c.set_direct_topic(&topic).is_ok() {
                let _ = c.advance();
            }
            Ok(Flow::Continue)
        }
        _ => {
            if c.set_topic_mode(TopicMode::Theme).is_err() {
                return Ok(Flow::Continue);
            }
            let Some(theme) = prompt.ask("Theme (e.g. dieting, saving money):").await? else {
                return Ok(Flow::Quit);
            };
            let titles: Vec<String> = match c.suggest_topics(&theme).await {
                Ok(list) => {
                    for (i, topic) in list.iter().enumerate() {
                        println!(
                            "  {}. {} ({} views) - {}",
                            i + 1,
                            topic.title,
                            topic.estimated_views,
                            topic.description
                        );
                    }
                    list.iter().map(|t| t.title.clone()).collect()
                }
                Err(_) => return Ok(Flow::Continue),
            };
            if titles.is_empty() {
                println!("No suggestions for that theme.");
                return Ok(Flow::Continue);
            }
            match prompt.choose("Pick a topic:", titles.len()).await? {
                Choice::Index(i) => {
                    if c.select_suggestion(&titles[i]).is_ok() {
                        let _ = c.advance();
                    }
                }
                Choice::Other(_) => println!("Please enter a number from the list."),
                Choice::Quit => return Ok(Flow::Quit),
            }
            Ok(Flow::Continue)
        }
    }
}

async fn style_step(c: &mut WizardController, prompt: &mut Prompt) -> anyhow::Result<Flow> {
    let ids: Vec<String> = c
        .session()
        .catalog()
        .styles
        .iter()
        .map(|s| s.id.clone())
        .collect();
    for (i, style) in c.session().catalog().styles.iter().enumerate() {
        println!("  {}. {} - {}", i + 1, style.name, style.description);
    }

    let question = if ids.is_empty() {
        "Style id ([b]ack):"
    } else {
        "Pick a style ([b]ack):"
    };
    let id = match prompt.choose(question, ids.len()).await? {
        Choice::Quit => return Ok(Flow::Quit),
        Choice::Other(answer) if answer == "b" => {
            let _ = c.back();
            return Ok(Flow::Continue);
        }
        Choice::Index(i) => ids[i].clone(),
        Choice::Other(answer) => answer,
    };
    if c.select_style(&id).is_ok() {
        let _ = c.advance();
    }
    Ok(Flow::Continue)
}

async fn audio_step(c: &mut WizardController, prompt: &mut Prompt) -> anyhow::Result<Flow> {
    for (i, voice) in VOICES.iter().enumerate() {
        let marker = if voice.id == c.session().voice_id() { "*" } else { " " };
        println!(" {marker}{}. {}", i + 1, voice.name);
    }
    match prompt
        .choose("Pick a voice (enter keeps *, [b]ack):", VOICES.len())
        .await?
    {
        Choice::Quit => return Ok(Flow::Quit),
        Choice::Index(i) => {
            if c.select_voice(VOICES[i].id).is_err() {
                return Ok(Flow::Continue);
            }
        }
        Choice::Other(answer) if answer == "b" => {
            let _ = c.back();
            return Ok(Flow::Continue);
        }
        Choice::Other(answer) if answer.is_empty() => {}
        Choice::Other(_) => {
            println!("Please enter a number from the list.");
            return Ok(Flow::Continue);
        }
    }

    let Some(answer) = prompt.ask("Preview the script first? [y/N]").await? else {
        return Ok(Flow::Quit);
    };
    let preview = matches!(answer.as_str(), "y" | "yes");
    if c.set_preview_enabled(preview).is_err() {
        return Ok(Flow::Continue);
    }
    if preview {
        let _ = c.preview_script().await;
    } else if let Ok(job_id) = c.submit_generation().await {
        println!("Submitted generation {job_id}");
    }
    Ok(Flow::Continue)
}

async fn preview_step(c: &mut WizardController, prompt: &mut Prompt) -> anyhow::Result<Flow> {
    if let Some(draft) = c.session().draft() {
        println!("  \"{}\" ({:.0}s)", draft.title, draft.total_duration());
        for (i, scene) in draft.scenes.iter().enumerate() {
            println!("  {}. {} [{}]", i + 1, scene.text, scene.visual_concept);
        }
    }
    let Some(answer) = prompt
        .ask("[g]enerate, [r]egenerate preview, or [b]ack?")
        .await?
    else {
        return Ok(Flow::Quit);
    };
    match answer.as_str() {
        "q" => return Ok(Flow::Quit),
        "r" => {
            let _ = c.preview_script().await;
        }
        "b" => {
            let _ = c.back();
        }
        _ => {
            if let Ok(job_id) = c.submit_generation().await {
                println!("Submitted generation {job_id}");
            }
        }
    }
    Ok(Flow::Continue)
}

async fn generation_step(c: &mut WizardController, prompt: &mut Prompt) -> anyhow::Result<Flow> {
    while c.is_polling() {
        let update = tokio::select! {
            outcome = c.next_update() => Some(outcome),
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(outcome) = update else {
            println!("Cancelled; starting over.");
            c.reset();
            return Ok(Flow::Continue);
        };
        match outcome {
            Some(PollOutcome::InProgress { progress }) => {
                let step = c
                    .session()
                    .job()
                    .map(|job| job.current_step.clone())
                    .unwrap_or_default();
                println!("  {progress:>3}%  {step}");
            }
            Some(PollOutcome::Retrying { attempt }) => {
                println!("  status check failed (attempt {attempt}), retrying");
            }
            Some(PollOutcome::Completed) | None => return Ok(Flow::Continue),
            Some(PollOutcome::Failed(_)) | Some(PollOutcome::TrackingLost(_)) => break,
        }
    }

    if c.session().step() != WizardStep::GenerationInProgress {
        return Ok(Flow::Continue);
    }
    let Some(answer) = prompt.ask("[n]ew video or [q]uit?").await? else {
        return Ok(Flow::Quit);
    };
    if answer == "q" {
        return Ok(Flow::Quit);
    }
    c.reset();
    Ok(Flow::Continue)
}

async fn completed_step(c: &mut WizardController, prompt: &mut Prompt) -> anyhow::Result<Flow> {
    if let Ok(url) = c.download_url() {
        println!("  Video ready: {url}");
    }
    let Some(answer) = prompt
        .ask("Save to file (path), [n]ew video, or [q]uit?")
        .await?
    else {
        return Ok(Flow::Quit);
    };
    match answer.as_str() {
        "q" => Ok(Flow::Quit),
        "n" | "" => {
            c.reset();
            Ok(Flow::Continue)
        }
        path => {
            let dest = PathBuf::from(path);
            if let Ok(bytes) = c.download_to(&dest).await {
                println!("  Saved {bytes} bytes to {}", dest.display());
            }
            Ok(Flow::Continue)
        }
    }
}
