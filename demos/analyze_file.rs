//! Example: Analyze a single scan image
//!
//! Usage:
//!   cargo run --example analyze_file -- <scan.png> [seed]
//!
//! Runs the pixel heuristic on the file, prints the chart and summary, and
//! asks the assistant one question about the result.

use std::env;
use std::path::Path;

use pancrescan::io::decoder::decode_image_file;
use pancrescan::presentation::chart::{build_chart, render_text};
use pancrescan::presentation::chatbot::respond;
use pancrescan::{analyze_buffer, fallback_result, AnalysisConfig, RiskSummary};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = args.next().ok_or("usage: analyze_file <scan> [seed]")?;
    let seed = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(42);

    let config = AnalysisConfig::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let result = match decode_image_file(Path::new(&path), config.max_dimension) {
        Ok(buffer) => analyze_buffer(&buffer, &config, &mut rng)?,
        Err(e) if e.is_recoverable() => fallback_result(&e.to_string(), &mut rng),
        Err(e) => return Err(e.into()),
    };

    println!("Analysis {} ({:.2} ms)", result.analysis_id, result.metadata.processing_time_ms);
    if let Some(features) = &result.metadata.features {
        println!(
            "  brightness {:.3}, contrast {:.3}, dark {:.3}, irregular {:.3}",
            features.brightness, features.contrast, features.dark_regions, features.irregular_patterns
        );
    }
    println!();
    print!("{}", render_text(&build_chart(&result.probabilities), 30));

    if let Some(summary) = RiskSummary::from_result(&result) {
        println!();
        println!("Top finding: {} ({})", summary.highest, summary.highest_risk().label());
    }

    println!();
    println!("{}", respond("what is most likely?", Some(&result))?);
    Ok(())
}
