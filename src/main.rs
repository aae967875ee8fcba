use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use pageplan::measure::metrics::MetricsSurface;
use pageplan::model::{PageGeometry, PagePlan};

#[derive(Clone, Copy, ValueEnum)]
enum Template {
    A4,
    Letter,
}

impl Template {
    fn geometry(self) -> PageGeometry {
        match self {
            Template::A4 => PageGeometry::a4(),
            Template::Letter => PageGeometry::letter(),
        }
    }
}

#[derive(Parser)]
#[command(
    name = "pageplan",
    version,
    about = "Plan a block report onto fixed-size pages"
)]
struct Args {
    /// Report markup file
    input: PathBuf,

    /// Page template to plan against
    #[arg(long, value_enum, default_value = "a4")]
    template: Template,

    /// Measure with this font file instead of searching system fonts
    #[arg(long)]
    font: Option<PathBuf>,

    /// Preferred font family when searching system fonts
    #[arg(long, conflicts_with = "font")]
    family: Option<String>,

    /// Body font size in points
    #[arg(long, default_value_t = 11.0)]
    size: f32,

    /// Emit the plan as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn print_table(plan: &PagePlan) {
    println!("+{:-<7}+{:-<12}+{:-<9}+{:-<6}+", "", "", "", "");
    println!(
        "| {:<5} | {:<10} | {:<7} | {:<4} |",
        "Page", "Blocks", "Footer", "Note"
    );
    println!("+{:-<7}+{:-<12}+{:-<9}+{:-<6}+", "", "", "", "");
    for page in &plan.pages {
        let span = if page.blocks.is_empty() {
            "-".to_string()
        } else if page.blocks.len() == 1 {
            format!("{}", page.blocks.start)
        } else {
            format!("{}-{}", page.blocks.start, page.blocks.end - 1)
        };
        println!(
            "| {:<5} | {:<10} | {:<7} | {:<4} |",
            page.index + 1,
            span,
            format!("{:?}", page.footer).to_lowercase(),
            if page.includes_note { "yes" } else { "" },
        );
    }
    println!("+{:-<7}+{:-<12}+{:-<9}+{:-<6}+", "", "", "", "");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let geometry = args.template.geometry();

    let mut surface = match &args.font {
        Some(path) => MetricsSurface::from_file(path, geometry, args.size)?,
        None => MetricsSurface::discover(args.family.as_deref(), geometry, args.size)?,
    };

    let plan = pageplan::plan_report_file(&args.input, &geometry, &mut surface)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_table(&plan);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
