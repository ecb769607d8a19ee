use anyhow::Result;
use clap::Parser;

use git_bump::config::Settings;
use git_bump::domain::BumpKind;
use git_bump::git::Git2Repository;
use git_bump::interrupt::InterruptFlag;
use git_bump::manifest::Manifest;
use git_bump::ui::{self, TerminalPrompter};
use git_bump::workflow::{BumpWorkflow, RunOutcome, WorkflowInputs};

#[derive(clap::Parser)]
#[command(
    name = "git-bump",
    about = "Bump the project version, commit, tag and optionally push"
)]
struct Args {
    #[arg(help = "Bump kind: major, minor, patch, premajor, preminor, prepatch, prerelease")]
    kind: Option<String>,

    #[arg(short, long, help = "Commit message for the bump commit")]
    message: Option<String>,

    #[arg(long, help = "Pre-release identifier (e.g. beta) for pre- bump kinds")]
    preid: Option<String>,

    #[arg(long, help = "Stash uncommitted changes without asking")]
    stash: bool,

    #[arg(short = 'b', long, help = "Bump even when the branch is not in the allow-list")]
    branch_override: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Custom settings file path")]
    config: Option<String>,

    #[arg(short, long, help = "Print each git operation as it happens")]
    verbose: bool,

    #[arg(long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("git-bump {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // CLI-provided kinds fail fast; omitted kinds are prompted for later
    let kind = match args.kind.as_deref() {
        Some(raw) => match raw.parse::<BumpKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        },
        None => None,
    };

    let settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let cwd = std::env::current_dir()?;
    let (mut repo, manifest) = match (Git2Repository::open(&cwd), Manifest::locate(&cwd)) {
        (Ok(repo), Ok(manifest)) => (repo, manifest),
        (Err(e), _) | (_, Err(e)) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let interrupt = InterruptFlag::new();
    if let Err(e) = interrupt.install_handler() {
        ui::display_warning(&format!("{} - Ctrl-C will abort without rollback", e));
    }

    let inputs = WorkflowInputs {
        kind,
        message: args.message,
        pre_id: args.preid,
        verbose: args.verbose,
        stash_on_dirty: args.stash,
        branch_override: args.branch_override,
        dry_run: args.dry_run,
    };

    let prompter = TerminalPrompter;
    let mut workflow = BumpWorkflow::new(&mut repo, &manifest, &prompter, &settings, interrupt);

    match workflow.run(inputs) {
        RunOutcome::Success => {
            ui::display_success("Done");
            Ok(())
        }
        RunOutcome::AbortedByUser => Ok(()),
        RunOutcome::Failed(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
