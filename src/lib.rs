mod error;

pub mod markup;
pub mod measure;
pub mod model;
pub mod plan;

pub use error::Error;

use std::path::Path;
use std::time::Instant;

use measure::Measure;
use model::{PageGeometry, PagePlan};

/// Parse a report markup file and plan it onto pages in one call. The caller
/// supplies the measurement surface; one surface instance per concurrent
/// request (surfaces hold transient layout state).
pub fn plan_report_file<M: Measure + ?Sized>(
    input: &Path,
    geometry: &PageGeometry,
    measurer: &mut M,
) -> Result<PagePlan, Error> {
    let t0 = Instant::now();

    let source = markup::parse(input)?;
    let t_parse = t0.elapsed();

    let pages = plan::plan_report(&source, geometry, measurer)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, plan={:.1}ms, total={:.1}ms ({} blocks → {} pages)",
        t_parse.as_secs_f64() * 1000.0,
        (t_total - t_parse).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        source.blocks.len(),
        pages.len(),
    );

    Ok(PagePlan { source, pages })
}
