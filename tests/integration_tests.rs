//! Integration tests for the scan analysis engine

use std::collections::BTreeSet;

use image::{Rgba, RgbaImage};
use pancrescan::analysis::probability::{MAX_PROBABILITY, MIN_PROBABILITY};
use pancrescan::io::upload::UploadedFile;
use pancrescan::presentation::chatbot::{respond, FAQS};
use pancrescan::presentation::heatmap::{encode_png, OverlayConfig};
use pancrescan::presentation::ResultsSession;
use pancrescan::{analyze_image, AnalysisConfig, AnalysisService, Disease};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Encode a solid `size`x`size` PNG
fn solid_png(size: u32, rgba: [u8; 4]) -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(size, size, Rgba(rgba))).unwrap()
}

/// Left half black, right half white
fn split_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    encode_png(&img).unwrap()
}

fn top_disease(bytes: &[u8], seed: u64) -> Disease {
    let mut rng = StdRng::seed_from_u64(seed);
    let result = analyze_image(bytes, &AnalysisConfig::default(), &mut rng).unwrap();
    result.highest().unwrap().0
}

#[test]
fn test_probabilities_within_bounds() {
    let inputs = [
        solid_png(10, [255, 255, 255, 255]),
        solid_png(10, [0, 0, 0, 255]),
        solid_png(10, [128, 128, 128, 255]),
        solid_png(10, [255, 0, 0, 255]),
        split_png(64, 32),
    ];
    for (i, bytes) in inputs.iter().enumerate() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = analyze_image(bytes, &AnalysisConfig::default(), &mut rng).unwrap();
            assert_eq!(result.probabilities.len(), 4);
            assert!(!result.metadata.fallback);
            for (disease, p) in &result.probabilities {
                assert!(
                    (MIN_PROBABILITY..=MAX_PROBABILITY).contains(p),
                    "input {} seed {}: {} = {}",
                    i,
                    seed,
                    disease.key(),
                    p
                );
            }
        }
    }
}

#[test]
fn test_black_image_is_acute() {
    for seed in 0..10 {
        assert_eq!(top_disease(&solid_png(10, [0, 0, 0, 255]), seed), Disease::AcutePancreatitis);
    }
}

#[test]
fn test_dominant_disease_varies_across_seeds() {
    let white = solid_png(10, [255, 255, 255, 255]);
    let black = solid_png(10, [0, 0, 0, 255]);

    let mut seen = BTreeSet::new();
    for seed in 0..50 {
        seen.insert(top_disease(&white, seed));
        seen.insert(top_disease(&black, seed));
    }
    assert!(seen.len() > 1, "dominant diseases: {:?}", seen);
}

#[test]
fn test_undecodable_input_falls_back() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = analyze_image(b"\x00\x01 definitely not an image", &AnalysisConfig::default(), &mut rng)
            .unwrap();
        assert!(result.metadata.fallback);
        assert!(result.analysis_id.ends_with("_fallback"));
        assert_eq!(
            result.probabilities.values().filter(|p| **p > 0.8).count(),
            1,
            "seed {}: {:?}",
            seed,
            result.probabilities
        );
    }
}

#[test]
fn test_faq_questions_answer_exactly() {
    for faq in FAQS {
        assert_eq!(respond(faq.question, None).unwrap(), faq.answer);
    }
}

#[test]
fn test_result_json_shape() {
    let mut rng = StdRng::seed_from_u64(9);
    let result = analyze_image(&split_png(40, 40), &AnalysisConfig::default(), &mut rng).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    let probabilities = json["probabilities"].as_object().unwrap();
    for key in [
        "acute_pancreatitis",
        "chronic_pancreatitis",
        "pancreatic_cysts",
        "pancreatic_cancer",
    ] {
        assert!(probabilities.contains_key(key), "missing {}", key);
        assert!(json["explanations"][key].is_string());
    }
    assert!(json["analysis_id"].as_str().unwrap().starts_with("analysis_"));
}

#[tokio::test]
async fn test_upload_to_report_flow() {
    let dir = tempfile::tempdir().unwrap();
    let scan = dir.path().join("scan.png");
    std::fs::write(&scan, split_png(120, 90)).unwrap();

    let config = AnalysisConfig {
        seed: Some(3),
        ..AnalysisConfig::without_delay()
    };
    let mut service = AnalysisService::new(config).unwrap();
    let upload = UploadedFile::from_path(&scan).unwrap();
    let analysis = service.analyze_upload(&upload).await.unwrap();
    assert!(analysis.image_data_url.is_some());

    let mut session = ResultsSession::new(analysis.result, analysis.image_data_url);

    let chart = session.chart();
    assert_eq!(chart.len(), 4);
    assert!(chart.windows(2).all(|w| w[0].probability >= w[1].probability));

    let png = session.heatmap_png(OverlayConfig::default()).unwrap().unwrap();
    let overlay = image::load_from_memory(&png).unwrap();
    assert_eq!((overlay.width(), overlay.height()), (120, 90));

    let reply = session.send_message("explain my results").unwrap().text.clone();
    assert!(reply.starts_with("Your scan analysis shows probabilities"));

    let report = dir.path().join("report.pdf");
    session.download_report(&report).unwrap();
    assert!(std::fs::read(&report).unwrap().starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_dicom_upload_has_no_heatmap() {
    let dir = tempfile::tempdir().unwrap();
    let scan = dir.path().join("study.dcm");
    std::fs::write(&scan, vec![0u8; 512]).unwrap();

    let mut service = AnalysisService::new(AnalysisConfig::without_delay()).unwrap();
    let upload = UploadedFile::from_path(&scan).unwrap();
    let analysis = service.analyze_upload(&upload).await.unwrap();
    assert!(analysis.result.metadata.fallback);

    let session = ResultsSession::new(analysis.result, analysis.image_data_url);
    assert!(session.heatmap_png(OverlayConfig::default()).unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_png_still_reports() {
    let dir = tempfile::tempdir().unwrap();
    let scan = dir.path().join("scan.png");
    std::fs::write(&scan, b"\x89PNG\r\n\x1a\n truncated garbage").unwrap();

    let mut service = AnalysisService::new(AnalysisConfig::without_delay()).unwrap();
    let upload = UploadedFile::from_path(&scan).unwrap();
    let analysis = service.analyze_upload(&upload).await.unwrap();
    assert!(analysis.result.metadata.fallback);

    let mut session = ResultsSession::new(analysis.result, analysis.image_data_url);
    session.toggle_heatmap();
    assert!(session.heatmap_png(OverlayConfig::default()).unwrap().is_none());

    let report = dir.path().join("report.pdf");
    for _ in 0..2 {
        session.download_report(&report).unwrap();
        assert!(!session.is_generating_report());
    }
    assert!(std::fs::read(&report).unwrap().starts_with(b"%PDF"));
}
