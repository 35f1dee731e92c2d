use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use fightline_core::{
    AppConfigExt, Encounter, Event, EventKind, Fight, FightId, MemorySource, Report,
};

use crate::context::{CliContext, LoadedReport, ReportHandle};

/// Render an error with its whole source chain
fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn seconds(ms: i64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}

fn require_fight(loaded: &LoadedReport, fight_id: FightId) -> Result<Arc<Fight>, String> {
    loaded
        .report
        .fight(fight_id)
        .map_err(|e| describe(&e))?
        .ok_or_else(|| format!("Fight {fight_id} not found in this report"))
}

/// Marker event `offset_ms` into a fight
fn moment(fight: &Fight, offset_ms: i64) -> Event {
    Event::marker(fight.start_time + offset_ms, fight.id)
}

pub async fn load(path: Option<&str>, encounter: Option<&str>, ctx: &CliContext) -> Result<(), String> {
    let (path, encounter, page_size) = {
        let config = ctx.config.read().await;
        let path = match path.or(config.dump_path.as_deref()) {
            Some(path) => PathBuf::from(path),
            None => return Err("No dump path given and none configured".to_string()),
        };
        let encounter = match encounter {
            Some(key) => key.parse::<Encounter>().map_err(|e| e.to_string())?,
            None => config.encounter().map_err(|e| describe(&e))?,
        };
        (path, encounter, config.effective_page_size())
    };

    let loaded = tokio::task::spawn_blocking(move || -> Result<LoadedReport, String> {
        let source = MemorySource::load(&path)
            .map_err(|e| describe(&e))?
            .with_page_size(page_size);
        let info = source.info().clone();
        let report = Report::open(info.code.clone(), encounter, Arc::new(source))
            .map_err(|e| describe(&e))?;
        Ok(LoadedReport { info, report })
    })
    .await
    .map_err(|e| e.to_string())??;

    let started = loaded
        .info
        .started_at()
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown start".to_string());
    println!(
        "Loaded {} \"{}\" ({}), {} {} fights",
        loaded.info.code,
        loaded.info.title,
        started,
        loaded.report.fights().len(),
        encounter.name()
    );
    ctx.set_report(loaded).await;
    Ok(())
}

pub async fn list_fights(ctx: &CliContext) -> Result<(), String> {
    let loaded = ctx.require_report().await?;
    let report = &loaded.report;
    let model = report.phase_model();

    let fights = report.fights();
    if fights.is_empty() {
        println!("No fights for {}", report.encounter().name());
        return Ok(());
    }

    println!("{:<6} {:>10} {:>10} {:>8}  Reached", "Fight", "Start", "Duration", "Boss %");
    println!("{}", "-".repeat(50));
    for fight in &fights {
        let reached = model.phase_name(fight.last_phase).unwrap_or("?");
        println!(
            "{:<6} {:>10} {:>10} {:>7.1}%  {}",
            fight.id,
            seconds(fight.start_time),
            seconds(fight.duration_ms()),
            fight.completion_percent,
            reached
        );
    }
    println!("\nTotal: {} fights", fights.len());
    Ok(())
}

pub async fn show_timeline(fight_id: FightId, ctx: &CliContext) -> Result<(), String> {
    let loaded = ctx.require_report().await?;
    let fight = require_fight(&loaded, fight_id)?;
    let report = &loaded.report;

    let timeline = report
        .timeline(fight_id)
        .map_err(|e| describe(&e))?
        .ok_or_else(|| format!("Fight {fight_id} not found in this report"))?;

    let model = report.phase_model();
    let master = report.master();
    for (phase, checkpoint) in timeline.iter().enumerate() {
        let name = model.phase_name(phase).unwrap_or("?");
        let at = if checkpoint.time < fight.start_time {
            "before pull".to_string()
        } else {
            seconds(checkpoint.time - fight.start_time)
        };
        let what = if checkpoint.is_marker() {
            "start".to_string()
        } else {
            format!("{} {}", checkpoint.kind, master.actor_display_name(checkpoint.target))
        };
        println!("{name:<4} {at:>12}  {what}");
    }
    Ok(())
}

pub async fn show_phase(fight_id: FightId, offset_ms: i64, ctx: &CliContext) -> Result<(), String> {
    let loaded = ctx.require_report().await?;
    let fight = require_fight(&loaded, fight_id)?;
    let event = moment(&fight, offset_ms);
    let report = &loaded.report;

    let name = report.phase_name(&event).map_err(|e| describe(&e))?;
    let relative = report.phase_relative_time(&event).map_err(|e| describe(&e))?;
    match (name, relative) {
        (Some(name), Some(relative)) => {
            println!("{} into fight {fight_id}: {name}, {} into the phase", seconds(offset_ms), seconds(relative));
        }
        _ => println!("No phase information for fight {fight_id}"),
    }
    Ok(())
}

pub async fn show_auras(
    fight_id: FightId,
    offset_ms: i64,
    named: bool,
    ctx: &CliContext,
) -> Result<(), String> {
    let loaded = ctx.require_report().await?;
    let fight = require_fight(&loaded, fight_id)?;
    let event = moment(&fight, offset_ms);
    let report = &loaded.report;

    if named {
        let active = report.active_at_named(&event).map_err(|e| describe(&e))?;
        if active.is_empty() {
            println!("No active auras");
        }
        for (target, auras) in active {
            println!("{target:<24} {}", auras.join(", "));
        }
    } else {
        let active = report.active_at(&event).map_err(|e| describe(&e))?;
        if active.is_empty() {
            println!("No active auras");
        }
        for (target, auras) in active {
            let ids: Vec<_> = auras.iter().map(i64::to_string).collect();
            println!("{target:<8} {}", ids.join(", "));
        }
    }
    Ok(())
}

pub async fn show_aura_targets(fight_id: FightId, name: &str, ctx: &CliContext) -> Result<(), String> {
    let loaded = ctx.require_report().await?;
    let fight = require_fight(&loaded, fight_id)?;
    let report = &loaded.report;

    let applications = report
        .aura(&[name.into()], fight_id)
        .map_err(|e| describe(&e))?;
    let targets = report.aura_on(name, fight_id).map_err(|e| describe(&e))?;
    if targets.is_empty() {
        println!("Nobody received {name} in fight {fight_id}");
        return Ok(());
    }
    for (apply, target) in applications.iter().zip(&targets) {
        println!("{:>10}  {target}", seconds(apply.time - fight.start_time));
    }
    Ok(())
}

pub async fn show_phase_starts(names: &[String], ctx: &CliContext) -> Result<(), String> {
    let loaded = ctx.require_report().await?;
    let report = &loaded.report;
    let names: Vec<&str> = names.iter().map(String::as_str).collect();

    let starts = report
        .labelled_phase_starts(&names)
        .map_err(|e| describe(&e))?;
    if starts.is_empty() {
        println!("No fight reached {}", names.join(" or "));
        return Ok(());
    }
    for (phase, start) in &starts {
        let fight_start = report.known_fight(start.fight).map(|f| f.start_time).unwrap_or_default();
        let at = if start.time < fight_start {
            "before pull".to_string()
        } else {
            seconds(start.time - fight_start)
        };
        println!("fight {:<4} {phase:<4} {at:>12}", start.fight);
    }
    Ok(())
}

pub async fn show_events(
    fight_id: FightId,
    kind: Option<&str>,
    limit: usize,
    instanced: bool,
    ctx: &CliContext,
) -> Result<(), String> {
    let loaded: ReportHandle = ctx.require_report().await?;
    let mut events = loaded.report.events(fight_id).map_err(|e| describe(&e))?;
    if let Some(kind) = kind {
        events = events.of_kind(EventKind::from(kind));
    }
    if instanced {
        events = events.filter(Event::has_instance);
    }

    let total = events.len();
    for event in events.named().iter().take(limit) {
        println!("{event}");
    }
    if total > limit {
        println!("... {} more", total - limit);
    }
    Ok(())
}

pub async fn show_settings(ctx: &CliContext) -> Result<(), String> {
    let config = ctx.config.read().await;
    println!(
        "dump path:         {}",
        config.dump_path.as_deref().unwrap_or("(none)")
    );
    println!("default encounter: {}", config.default_encounter);
    println!("page size:         {}", config.effective_page_size());
    println!("debug logging:     {}", config.debug_logging);
    Ok(())
}

pub async fn set_dump(path: &str, ctx: &CliContext) -> Result<(), String> {
    let dump = PathBuf::from(path);
    if !dump.is_file() {
        return Err(format!("Update failed. {} is not a file.", dump.display()));
    }

    let mut config = ctx.config.write().await;
    config.dump_path = Some(path.to_string());
    config.save().map_err(|e| describe(&e))?;
    println!("Default report dump set to {path}");
    Ok(())
}

pub fn exit() -> Result<(), String> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "quitting...").map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())
}
