use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::Value;
use wb_change::{ChangeCodec, EntityChangeFactory, RevisionMetadata};
use wb_diff::{Diff, DiffOp, PatchMode};
use wb_model::EntityDocument;
use wb_registry::{EntityDiffer, EntityPatcher, EntityTypeRegistry};
use wb_repo::RepoConfig;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let registry = Arc::new(EntityTypeRegistry::with_builtin_types());
    let config = match &cli.config {
        Some(path) => RepoConfig::load(path)?,
        None => RepoConfig::default(),
    };
    tracing::debug!(config = ?config, "loaded repository settings");
    let ctx = Session {
        registry,
        config,
        format: cli.format,
    };
    match cli.command {
        Command::Diff(args) => cmd_diff(&ctx, args),
        Command::Patch(args) => cmd_patch(&ctx, args),
        Command::ApplyDiff(args) => cmd_apply_diff(&ctx, args),
        Command::Change(args) => cmd_change(&ctx, args),
    }
}

struct Session {
    registry: Arc<EntityTypeRegistry>,
    config: RepoConfig,
    format: OutputFormat,
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_entity(ctx: &Session, path: &Path) -> anyhow::Result<Box<dyn EntityDocument>> {
    let value = read_json(path)?;
    ctx.registry
        .deserialize(&value)
        .with_context(|| format!("{} is not a valid entity", path.display()))
}

fn print_entity(ctx: &Session, entity: &dyn EntityDocument) -> anyhow::Result<()> {
    let value = ctx.registry.serialize(entity)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_diff(ctx: &Session, args: DiffArgs) -> anyhow::Result<()> {
    let old = read_entity(ctx, &args.old)?;
    let new = read_entity(ctx, &args.new)?;
    let diff = EntityDiffer::new(ctx.registry.clone()).diff_entities(old.as_ref(), new.as_ref())?;

    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diff)?),
        OutputFormat::Text if diff.is_empty() => println!("No changes."),
        OutputFormat::Text => {
            print_diff(&diff, 0);
            println!(
                "\n{} additions, {} removals, {} changes",
                count(&diff, "add").to_string().green(),
                count(&diff, "remove").to_string().red(),
                count(&diff, "change").to_string().yellow()
            );
        }
    }
    Ok(())
}

fn count(diff: &Diff, type_name: &str) -> usize {
    diff.ops()
        .map(|op| match op {
            DiffOp::Diff(nested) => count(nested, type_name),
            op if op.type_name() == type_name => 1,
            _ => 0,
        })
        .sum()
}

fn print_diff(diff: &Diff, depth: usize) {
    let indent = "  ".repeat(depth);
    let keyed: Vec<(String, &DiffOp)> = if diff.is_assoc() {
        diff.entries().map(|(k, op)| (k.to_string(), op)).collect()
    } else {
        diff.ops().map(|op| (String::new(), op)).collect()
    };
    for (key, op) in keyed {
        let label = if key.is_empty() { String::new() } else { format!("{key}: ") };
        match op {
            DiffOp::Add(new) => println!("{indent}{} {label}{new}", "+".green().bold()),
            DiffOp::Remove(old) => println!("{indent}{} {label}{old}", "-".red().bold()),
            DiffOp::Change { old, new } => {
                println!("{indent}{} {label}{old} → {new}", "~".yellow().bold())
            }
            DiffOp::Diff(nested) => {
                println!("{indent}{}", key.bold());
                print_diff(nested, depth + 1);
            }
        }
    }
}

fn cmd_patch(ctx: &Session, args: PatchArgs) -> anyhow::Result<()> {
    let entity = read_entity(ctx, &args.entity)?;
    let patch = read_json(&args.patch)?;
    match wb_patch::patch_entity(&ctx.registry, entity.as_ref(), &patch, &ctx.config.term_rules())
    {
        Ok(patched) => print_entity(ctx, patched.as_ref()),
        Err(err) => {
            eprintln!("{} {} ({})", "✗".red().bold(), err, err.code().yellow());
            let context = err.context();
            if !context.as_object().is_some_and(|c| c.is_empty()) {
                eprintln!("  {context}");
            }
            bail!("patch rejected: {}", err.code())
        }
    }
}

fn cmd_apply_diff(ctx: &Session, args: ApplyDiffArgs) -> anyhow::Result<()> {
    let entity = read_entity(ctx, &args.entity)?;
    let diff: Diff = serde_json::from_value(read_json(&args.diff)?)
        .with_context(|| format!("{} is not a valid diff", args.diff.display()))?;
    let mode = if args.force {
        PatchMode::Force
    } else {
        PatchMode::Strict
    };
    let patched = EntityPatcher::new(ctx.registry.clone()).apply(entity.as_ref(), &diff, mode)?;
    print_entity(ctx, patched.as_ref())
}

fn cmd_change(ctx: &Session, args: ChangeArgs) -> anyhow::Result<()> {
    let old = args.old.as_deref().map(|p| read_entity(ctx, p)).transpose()?;
    let new = args.new.as_deref().map(|p| read_entity(ctx, p)).transpose()?;

    let factory = EntityChangeFactory::new(ctx.registry.clone());
    let mut change = factory.new_for_entity_change(old.as_deref(), new.as_deref())?;
    change.set_fields(args.revision, chrono::Utc::now());
    change.set_metadata(RevisionMetadata {
        bot: args.bot,
        comment: args.comment,
        page_id: 0,
        parent_id: 0,
    });
    change.add_user_metadata(args.user_id, args.user_name, 0);

    match ctx.format {
        OutputFormat::Json => {
            let value = ChangeCodec::new(ctx.registry.clone()).serialize(&change)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!(
                "{} {} ({} operations)",
                change.type_string().cyan().bold(),
                change.entity_id().to_string().yellow(),
                change.diff().count()
            );
            let aspects = change.aspects();
            if !aspects.label_changes.is_empty() {
                println!("  labels: {}", aspects.label_changes.join(", "));
            }
            if !aspects.description_changes.is_empty() {
                println!("  descriptions: {}", aspects.description_changes.join(", "));
            }
            if !aspects.statement_changes.is_empty() {
                println!("  statements: {}", aspects.statement_changes.join(", "));
            }
            for site in aspects.site_link_changes.keys() {
                println!("  sitelink: {site}");
            }
            if aspects.other_changes {
                println!("  other changes");
            }
        }
    }
    Ok(())
}
