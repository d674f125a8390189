use clap::Parser;
use prodlog::application::{
    init::init, pending_batches, BatchSubmitter, Bound, ConfigService, EntryLifecycle,
    SaveOutcome,
};
use prodlog::cli::{
    format_entry_list, format_options, format_pending_list, format_status,
    format_validation_report, Cli, Commands, EntryArgs,
};
use prodlog::domain::{
    parse_date, Catalog, Category, ClockTime, FieldEdit, Session, Shift,
};
use prodlog::error::{ProdlogError, Result};
use prodlog::infrastructure::{
    Config, DraftStore, FileDraftStore, FilePreferenceStore, FileSystemRepository,
    FrequencyProvider, HttpSink, ListProvider, WorkspaceRepository,
};
use std::str::FromStr;
use std::time::Duration;

type Lifecycle = EntryLifecycle<FileDraftStore, FilePreferenceStore>;

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prodlog=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

struct Workspace {
    repo: FileSystemRepository,
    config: Config,
    lifecycle: Lifecycle,
}

impl Workspace {
    fn discover() -> Result<Self> {
        let repo = FileSystemRepository::discover()?;
        let config = repo.load_config()?;
        let lifecycle = EntryLifecycle::new(
            FileDraftStore::new(repo.clone()),
            FilePreferenceStore::new(repo.clone()),
        );
        Ok(Workspace {
            repo,
            config,
            lifecycle,
        })
    }

    fn session(&self) -> Session {
        self.lifecycle.start_session(chrono::Local::now().date_naive())
    }

    async fn catalog(&self) -> Result<Catalog> {
        let provider = ListProvider::new(
            self.repo.clone(),
            self.config.lists.clone(),
            self.config.timeout(),
        )?;
        Ok(provider.load().await)
    }
}

fn parse_shift(input: &str) -> Result<Shift> {
    Shift::from_str(input).map_err(ProdlogError::InvalidShift)
}

/// A bare number is a typed hour (clamped, keeps AM/PM); anything else is a clock time
fn set_bound(
    lifecycle: &Lifecycle,
    session: &mut Session,
    bound: Bound,
    input: &str,
) -> Result<()> {
    match input.trim().parse::<i64>() {
        Ok(hour) => lifecycle.type_hour(session, bound, hour),
        Err(_) => lifecycle.set_time(session, bound, ClockTime::parse(input)?),
    }
    Ok(())
}

async fn apply_fields(
    workspace: &Workspace,
    session: &mut Session,
    fields: EntryArgs,
) -> Result<()> {
    let lifecycle = &workspace.lifecycle;

    if let Some(date) = fields.date {
        lifecycle.set_date(session, parse_date(&date)?);
    }
    if let Some(shift) = fields.shift {
        lifecycle.set_shift(session, parse_shift(&shift)?);
    }
    if let Some(start) = fields.start {
        set_bound(lifecycle, session, Bound::Start, &start)?;
    }
    if let Some(end) = fields.end {
        set_bound(lifecycle, session, Bound::End, &end)?;
    }

    let selections = [
        (Category::Operator, fields.operator),
        (Category::Machine, fields.machine),
        (Category::Operation, fields.operation),
    ];
    if selections.iter().any(|(_, value)| value.is_some()) {
        let catalog = workspace.catalog().await?;
        for (category, value) in selections {
            let Some(value) = value else { continue };
            let name = catalog
                .resolve(category, &value)
                .ok_or_else(|| ProdlogError::UnknownOption {
                    category: category.to_string(),
                    value: value.clone(),
                })?;
            // Selecting the current value again would deselect it
            if session.draft.selection(category) != Some(name.as_str()) {
                lifecycle.edit(session, FieldEdit::Select(category, name));
            }
        }
    }

    let edits = [
        fields.qty.map(FieldEdit::Qty),
        fields.job_card_no.map(FieldEdit::JobCardNo),
        fields.sr_no.map(|n| FieldEdit::SrNo(Some(n))),
        fields.description.map(FieldEdit::Description),
        fields.remark1.map(FieldEdit::Remark1),
        fields.remark2.map(FieldEdit::Remark2),
    ];
    for edit in edits.into_iter().flatten() {
        lifecycle.edit(session, edit);
    }
    Ok(())
}

fn save(lifecycle: &Lifecycle, session: &mut Session) -> Result<()> {
    match lifecycle.save(session)? {
        SaveOutcome::Appended { index, entry } => {
            println!("Saved entry [{}] to {}", index, entry.key());
            Ok(())
        }
        SaveOutcome::Replaced { index, entry } => {
            println!("Updated entry [{}] in {}", index, entry.key());
            Ok(())
        }
        SaveOutcome::Rejected(report) => Err(ProdlogError::Validation(format!(
            "{} problem(s)\n{}",
            report.errors.len(),
            format_validation_report(&report)
        ))),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        println!("prodlog - Shop-floor production log entry");
        println!("Use --help for usage information");
        return Ok(());
    };

    match command {
        Commands::Init { path, api_base } => init(&path, api_base).map(|_| ()),
        Commands::Config { key, value, list } => {
            let repo = FileSystemRepository::discover()?;
            let service = ConfigService::new(repo);

            if list {
                let config = service.list()?;
                println!("api_base = {}", config.api_base);
                println!("timeout_secs = {}", config.timeout_secs);
                println!("lists = {}", config.lists);
                println!("created = {}", config.created.to_rfc3339());
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: prodlog config [--list | <key> [<value>]]");
                println!("Valid keys: api_base, timeout_secs, lists, created");
            }
            Ok(())
        }
        Commands::Date { date } => {
            let workspace = Workspace::discover()?;
            let mut session = workspace.session();
            workspace.lifecycle.set_date(&mut session, parse_date(&date)?);
            println!("Date set to {}", date.trim());
            Ok(())
        }
        Commands::Shift { shift } => {
            let workspace = Workspace::discover()?;
            let mut session = workspace.session();
            let shift = parse_shift(&shift)?;
            workspace.lifecycle.set_shift(&mut session, shift);
            println!(
                "Shift set to {} ({} - {})",
                shift, session.window.start, session.window.end
            );
            Ok(())
        }
        Commands::Time {
            start,
            end,
            step_start,
            step_end,
            toggle_start,
            toggle_end,
        } => {
            let workspace = Workspace::discover()?;
            let lifecycle = &workspace.lifecycle;
            let mut session = workspace.session();

            if let Some(start) = start {
                set_bound(lifecycle, &mut session, Bound::Start, &start)?;
            }
            if let Some(end) = end {
                set_bound(lifecycle, &mut session, Bound::End, &end)?;
            }
            if let Some(delta) = step_start {
                lifecycle.step_hour(&mut session, Bound::Start, delta);
            }
            if let Some(delta) = step_end {
                lifecycle.step_hour(&mut session, Bound::End, delta);
            }
            if toggle_start {
                lifecycle.toggle_period(&mut session, Bound::Start);
            }
            if toggle_end {
                lifecycle.toggle_period(&mut session, Bound::End);
            }

            let window = session.window;
            println!("{} - {} ({}h)", window.start, window.end, window.duration());
            Ok(())
        }
        Commands::Status => {
            let workspace = Workspace::discover()?;
            let drafts = workspace.lifecycle.drafts();
            let session = workspace.session();
            let batch_len = match session.key() {
                Some(key) => Some(drafts.list_all(&key)?.len()),
                None => None,
            };
            let pending = pending_batches(drafts)?.len();
            print!("{}", format_status(&session, batch_len, pending));
            Ok(())
        }
        Commands::Options { category, filter } => {
            let workspace = Workspace::discover()?;
            let category = Category::from_str(&category).map_err(ProdlogError::Config)?;
            let catalog = workspace.catalog().await?;
            let frequency = FrequencyProvider::new(
                workspace.config.get_api_base(),
                workspace.config.timeout(),
            )?
            .fetch()
            .await;

            let options = catalog.options(category, frequency.as_ref(), filter.as_deref());
            print!("{}", format_options(category, &options));
            Ok(())
        }
        Commands::Add { fields } => {
            let workspace = Workspace::discover()?;
            let mut session = workspace.session();
            apply_fields(&workspace, &mut session, fields).await?;
            save(&workspace.lifecycle, &mut session)
        }
        Commands::List => {
            let workspace = Workspace::discover()?;
            let session = workspace.session();
            let entries = workspace.lifecycle.review(&session)?;
            if let Some(key) = session.key() {
                println!("{}", key);
            }
            print!("{}", format_entry_list(&entries));
            if entries.is_empty() {
                println!();
            }
            Ok(())
        }
        Commands::Edit { index, fields } => {
            let workspace = Workspace::discover()?;
            let mut session = workspace.session();
            workspace.lifecycle.begin_edit(&mut session, index)?;
            apply_fields(&workspace, &mut session, fields).await?;
            save(&workspace.lifecycle, &mut session)
        }
        Commands::Delete { index, yes } => {
            let workspace = Workspace::discover()?;
            let session = workspace.session();
            let removed = workspace.lifecycle.delete(&session, index, yes)?;
            println!(
                "Deleted entry [{}] ({}, job {})",
                index, removed.description, removed.job_card_no
            );
            Ok(())
        }
        Commands::Submit { timeout } => {
            let workspace = Workspace::discover()?;
            let lifecycle = &workspace.lifecycle;
            let mut session = workspace.session();
            let key = session.key().ok_or(ProdlogError::MissingSessionKey)?;

            let limit = timeout
                .map(Duration::from_secs)
                .unwrap_or_else(|| workspace.config.timeout());
            let sink = HttpSink::new(workspace.config.get_api_base(), limit)?;
            let receipt = BatchSubmitter::new(lifecycle.drafts(), lifecycle.prefs(), &sink)
                .with_timeout(limit)
                .submit(&key)
                .await?;

            if receipt.sent == 0 {
                println!("Nothing to submit for {}", key);
            } else {
                session.mark_submitted();
                println!("Submitted {} entries for {}", receipt.inserted, key);
                if session.key().is_none() {
                    println!("Date and shift cleared; select them again for the next batch");
                }
            }
            Ok(())
        }
        Commands::Pending => {
            let workspace = Workspace::discover()?;
            let batches = pending_batches(workspace.lifecycle.drafts())?;
            print!("{}", format_pending_list(&batches));
            if batches.is_empty() {
                println!();
            }
            Ok(())
        }
    }
}
