use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for diorama")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the headless simulation through every key binding
    Demo {
        /// Model to load, relative to the workspace root
        #[arg(long, default_value = "Soldier.glb")]
        model: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for step in [Step::Fmt, Step::Clippy, Step::Test, Step::Doc] {
                step.run()?;
            }
        }
        Commands::Fmt => Step::Fmt.run()?,
        Commands::Clippy => Step::Clippy.run()?,
        Commands::Test => Step::Test.run()?,
        Commands::Doc => Step::Doc.run()?,
        Commands::Build => Step::Build.run()?,
        Commands::Demo { model } => cargo(
            "diorama-cli simulate",
            &[
                "run", "-p", "diorama-cli", "--", "simulate", "--frames", "120", "--keys",
                "r,2,w,3,t,4,i,5", "--model", &model,
            ],
        )?,
    }

    Ok(())
}

#[derive(Clone, Copy)]
enum Step {
    Fmt,
    Clippy,
    Test,
    Doc,
    Build,
}

impl Step {
    fn run(self) -> Result<()> {
        match self {
            Step::Fmt => cargo("cargo fmt --check", &["fmt", "--all", "--", "--check"]),
            Step::Clippy => cargo(
                "cargo clippy",
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            ),
            Step::Test => cargo("cargo test", &["test", "--workspace"]),
            Step::Doc => cargo("cargo doc", &["doc", "--workspace", "--no-deps"]),
            Step::Build => cargo("cargo build", &["build", "--workspace"]),
        }
    }
}

fn cargo(what: &str, args: &[&str]) -> Result<()> {
    println!("==> Running {what}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{what} failed");
    }
    Ok(())
}
