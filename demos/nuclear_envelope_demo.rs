#![allow(clippy::cast_precision_loss)]
//! Demo comparing a simulated null model against a synthetic condition with
//! injected NPC clusters.
//!
//! Run with `RUST_LOG=info cargo run --example nuclear_envelope_demo`.
//! Pass a directory as the first argument to also write `results.csv` there.

use porescope::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RADIUS: f64 = 1.25;

/// A background nucleus plus a few tight patches of pores.
fn clustered_nucleus(rng: &mut StdRng, patches: usize) -> Result<PointSet> {
    let background = generate_with_min_separation(150, RADIUS, 0.16, rng)?;
    let mut extra = Vec::new();
    for _ in 0..patches {
        let center = generate_sphere_points(1, RADIUS, rng)?.points()[0];
        for _ in 0..6 {
            let jitter = DVec3::new(
                rng.gen_range(-0.05..0.05),
                rng.gen_range(-0.05..0.05),
                rng.gen_range(-0.05..0.05),
            );
            extra.push((center + jitter).normalize() * RADIUS);
        }
    }
    Ok(background.concat(&PointSet::new(extra)))
}

/// Prints every sample as a one-line "frame".
struct ConsoleRenderer;

impl SceneRenderer for ConsoleRenderer {
    fn render(&mut self, view: &SampleView<'_>) -> Result<()> {
        println!(
            "  {:<14} {:>4} points  {:>4} hull faces  {:>3} clustered",
            view.sample_id,
            view.points.len(),
            view.hull_triangles().count(),
            view.clustered_indices().len()
        );
        Ok(())
    }
}

fn print_summary(summary: &GroupSummary) {
    let fmt = |s: &Summary| match (s.mean, s.stdev) {
        (Some(m), Some(sd)) => format!("{m:.3} ± {sd:.3}"),
        (Some(m), None) => format!("{m:.3}"),
        _ => "n/a".to_string(),
    };
    println!(
        "  {:<12} n={:<3} fraction clustered {}  sphericity {}  with cluster {}/{}",
        summary.group,
        summary.n_samples,
        fmt(&summary.fraction_clustered),
        fmt(&summary.sphericity),
        summary.nuclei_with_cluster,
        summary.n_samples
    );
}

fn main() -> Result<()> {
    init_logging();

    let analyzer = Analyzer::new(AnalysisOptions::default())?;

    println!("Null model:");
    let null = analyzer.summarize_simulations(25)?;
    println!(
        "  {} runs, retained {:.1} points, fraction clustered {:.3}",
        null.runs,
        null.retained_points.mean.unwrap_or(0.0),
        null.fraction_clustered.mean.unwrap_or(0.0)
    );

    let mut rng = StdRng::seed_from_u64(7);
    let mut samples = Vec::new();
    for i in 0..15 {
        samples.push(SampleInput::new(
            format!("clustered_{i:02}"),
            GroupLabel::ConditionA,
            clustered_nucleus(&mut rng, 2)?,
        ));
        samples.push(SampleInput::new(
            format!("sparse_{i:02}"),
            GroupLabel::ConditionB,
            clustered_nucleus(&mut rng, 0)?,
        ));
    }

    println!("Samples:");
    let mut renderer = ConsoleRenderer;
    let analyses = samples
        .iter()
        .take(4)
        .map(|s| analyzer.analyze_sample(s.sample_id.as_str(), s.group.clone(), &s.points))
        .collect::<Result<Vec<_>>>()?;
    renderer.render_all(analyses.iter().map(SampleAnalysis::view))?;

    let mut dataset = analyzer.analyze_batch(&samples)?;
    for analysis in analyzer.simulate_random_group(15)? {
        dataset.insert(analysis.into_record())?;
    }

    println!("Groups:");
    let report = analyzer.compare(&dataset);
    for summary in &report.groups {
        print_summary(summary);
    }
    if let Some(kw) = report.kruskal_wallis {
        println!("Kruskal-Wallis H = {:.3}, df = {}, p = {:.2e}", kw.h, kw.df, kw.p_value);
    }
    for pair in &report.pairwise {
        println!(
            "  {} vs {}: U = {:.1}, p = {:.2e}",
            pair.first, pair.second, pair.test.u, pair.test.p_value
        );
    }

    println!("Eps sweep of the first sample:");
    for point in analyzer.sweep_eps(&samples[0].points)? {
        println!(
            "  eps {:.2}: {:.3} clustered in {} clusters",
            point.eps, point.metrics.fraction_clustered, point.num_clusters
        );
    }

    if let Some(dir) = std::env::args().nth(1) {
        let path = std::path::Path::new(&dir).join("results.csv");
        save_dataset(&dataset, &path)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
