use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use course_planner::data::loader::load_file;
use course_planner::{Planner, RuleSet};

/// Build every conflict-free weekly schedule and draw each one as a PNG.
#[derive(Debug, Parser)]
#[command(name = "course-planner", version, about)]
struct Args {
    /// Section catalog (.csv, .json or .parquet)
    catalog: PathBuf,
    /// JSON rule file
    rules: PathBuf,
    /// Directory in which the timestamped output folder is created
    #[arg(default_value = ".")]
    output_dir: PathBuf,
}

/// Load and validate both inputs. Any failure here means the input was bad.
fn setup(catalog_path: &Path, rules_path: &Path) -> Result<Planner> {
    let catalog = load_file(catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;
    let rules = RuleSet::load(rules_path)?;
    Ok(Planner::new(catalog, rules)?)
}

fn main() -> ExitCode {
    env_logger::init();

    // usage errors exit with status 2, --help and --version with 0
    let args = Args::parse();

    let mut planner = match setup(&args.catalog, &args.rules) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid input: {e:#}");
            return ExitCode::from(2);
        }
    };

    let found = match planner.generate_schedules() {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Invalid input: {e}");
            return ExitCode::from(2);
        }
    };

    if found == 0 {
        println!("No schedules satisfy your constraints");
        return ExitCode::SUCCESS;
    }

    match planner.draw_schedules(&args.output_dir) {
        Some((dir, written)) => {
            println!("Wrote {written} of {found} schedules to {}", dir.display());
            if written == found {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        None => ExitCode::SUCCESS,
    }
}
